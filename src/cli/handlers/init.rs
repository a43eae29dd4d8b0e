use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::store_io::{DATA_DIR, TASKS_FILE};

const CONFIG_TOML_TEMPLATE: &str = r##"[project]
name = "{name}"

# --- Task defaults ---
# Applied when a task is created without an explicit value.

[tasks]
default_category = "general"
default_priority = "medium"     # low, medium, high

# --- UI Customization ---
# Uncomment and edit to override defaults.

# [ui]
# show_key_hints = false
#
# [ui.colors]
# background = "#10141C"
# text = "#C8D0E0"
# text_bright = "#FFFFFF"
# highlight = "#4E9AF7"
# dim = "#5F6B80"
# red = "#FF5555"
# yellow = "#F1C232"
# green = "#50C878"
"##;

/// Infer a project name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    // -C picks the directory to initialize; default is the current one
    let target = match super::project_dir_override() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let data_dir = target.join(DATA_DIR);

    if data_dir.is_dir() && !args.force {
        return Err("taskman project already exists in ./taskman/ (use --force to reinitialize)".into());
    }

    let name = args.name.unwrap_or_else(|| {
        target
            .file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    fs::create_dir_all(&data_dir)?;
    fs::write(
        data_dir.join("config.toml"),
        CONFIG_TOML_TEMPLATE.replace("{name}", &name),
    )?;
    fs::write(data_dir.join(TASKS_FILE), "[]\n")?;

    println!("Initialized taskman project: {}", name);
    Ok(())
}
