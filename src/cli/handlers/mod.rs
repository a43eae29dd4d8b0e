mod init;
pub use init::cmd_init;

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store_io::{self, DATA_DIR, ProjectError};
use crate::model::config::Config;
use crate::model::store::TaskStore;
use crate::model::task::{TaskInput, TaskPatch};
use crate::ops::project::{parse_filter_mode, project};
use crate::ops::stats::compute_stats;

/// Global override for project directory (set by -C flag)
static PROJECT_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

fn project_dir_override() -> Option<PathBuf> {
    PROJECT_DIR_OVERRIDE.lock().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for load_project_cwd()
    if let Some(ref dir) = cli.project_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        PROJECT_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        None => unreachable!("no-subcommand case is routed to the TUI in main"),
        Some(cmd) => match cmd {
            // Init runs before project discovery
            Commands::Init(args) => cmd_init(args),

            // Write commands
            Commands::Add(args) => cmd_add(args, json),
            Commands::Edit(args) => cmd_edit(args),
            Commands::Toggle(args) => cmd_toggle(args),
            Commands::Delete(args) => cmd_delete(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Search(args) => cmd_search(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Stats => cmd_stats(json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A loaded project: config plus the rehydrated store
struct ProjectContext {
    data_dir: PathBuf,
    config: Config,
    store: TaskStore,
}

fn load_project_cwd() -> Result<ProjectContext, ProjectError> {
    let start = match project_dir_override() {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(ProjectError::IoError)?,
    };
    let root = store_io::discover_project(&start)?;
    let data_dir = root.join(DATA_DIR);
    let config = config_io::read_config(&data_dir)?;
    let store = TaskStore::from_tasks(store_io::load_tasks(&data_dir));
    Ok(ProjectContext {
        data_dir,
        config,
        store,
    })
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Persist the full collection; called immediately after every mutation
fn save(ctx: &ProjectContext) -> Result<(), ProjectError> {
    store_io::save_tasks(&ctx.data_dir, ctx.store.tasks())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_project_cwd()?;

    let priority = match args.priority.as_deref() {
        Some(s) => parse_priority(s)?,
        None => ctx.config.tasks.default_priority,
    };
    let due_date = args.due.as_deref().map(parse_due_date).transpose()?;
    let category = args
        .category
        .or_else(|| Some(ctx.config.tasks.default_category.clone()));

    let input = TaskInput {
        title: args.title,
        description: args.desc,
        priority,
        due_date,
        category,
    };
    let task = ctx.store.add(input, now()).clone();
    save(&ctx)?;

    if json {
        print_json(&task_to_json(&task, today()))?;
    } else {
        println!("added {}: {}", task.id, task.title);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_project_cwd()?;

    let due_date = if args.clear_due {
        Some(None)
    } else {
        match args.due.as_deref() {
            Some(s) => Some(Some(parse_due_date(s)?)),
            None => None,
        }
    };
    let patch = TaskPatch {
        title: args.title,
        description: args.desc,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        due_date,
        category: args.category,
    };
    if patch.is_empty() {
        return Err("nothing to change (pass at least one field flag)".into());
    }

    ctx.store.update(&args.id, patch, now())?;
    save(&ctx)?;
    println!("updated {}", args.id);
    Ok(())
}

fn cmd_toggle(args: ToggleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_project_cwd()?;
    let completed = ctx.store.toggle_complete(&args.id, now())?;
    save(&ctx)?;
    if completed {
        println!("completed {}", args.id);
    } else {
        println!("reopened {}", args.id);
    }
    Ok(())
}

fn cmd_delete(args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_project_cwd()?;

    if !args.yes {
        print!("delete {} task(s)? [y/N] ", args.ids.len());
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("aborted");
            return Ok(());
        }
    }

    let mut removed = 0;
    for id in &args.ids {
        if ctx.store.remove(id) {
            removed += 1;
        } else {
            // Deletion is idempotent: report, but not an error
            println!("no task with id {} (already gone)", id);
        }
    }
    save(&ctx)?;
    println!("deleted {} task(s)", removed);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_project_cwd()?;
    let filter = parse_filter_mode(&args.filter)?;
    let today = today();

    let visible = project(ctx.store.tasks(), filter, &args.search, today);

    if json {
        let tasks: Vec<_> = visible.iter().map(|t| task_to_json(t, today)).collect();
        return print_json(&tasks);
    }

    if visible.is_empty() {
        if args.search.is_empty() && ctx.store.is_empty() {
            println!("No tasks yet. Add your first with `tm add \"...\"`.");
        } else {
            println!("No matching tasks.");
        }
        return Ok(());
    }
    for task in visible {
        println!("{}", format_task_line(task, today));
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    cmd_list(
        ListArgs {
            filter: "all".into(),
            search: args.term,
        },
        json,
    )
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_project_cwd()?;
    let task = ctx
        .store
        .get(&args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;

    if json {
        print_json(&task_to_json(task, today()))?;
    } else {
        for line in format_task_detail(task, today()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_project_cwd()?;
    let stats = compute_stats(ctx.store.tasks(), today());
    if json {
        print_json(&stats_to_json(&stats))?;
    } else {
        println!("{} — {}", ctx.config.project.name, format_stats(&stats));
    }
    Ok(())
}
