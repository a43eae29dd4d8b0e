use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::task::{DEFAULT_CATEGORY, Priority};

/// Configuration from taskman/config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectInfo,
    #[serde(default)]
    pub tasks: TaskDefaults,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
}

/// Defaults applied by the form surfaces (CLI flags, TUI form) when the user
/// leaves a field blank. The store itself only defaults the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefaults {
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub default_priority: Priority,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        TaskDefaults {
            default_category: DEFAULT_CATEGORY.to_string(),
            default_priority: Priority::default(),
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot name (e.g. background = "#0C001B")
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
