use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ops::project::FilterMode;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Active status filter
    #[serde(default)]
    pub filter: FilterMode,
    /// Last committed search term
    #[serde(default)]
    pub search: String,
    /// Cursor index into the projected list
    #[serde(default)]
    pub cursor: usize,
    /// Scroll offset (first visible row)
    #[serde(default)]
    pub scroll_offset: usize,
}

/// Read .state.json from the data directory. Missing or malformed state is
/// simply ignored; it only tunes where the TUI starts.
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
