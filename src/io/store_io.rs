use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::task::Task;

/// Name of the directory that marks a taskman project root
pub const DATA_DIR: &str = "taskman";
/// The single storage slot holding the serialized task collection
pub const TASKS_FILE: &str = "tasks.json";

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("not a taskman project: no taskman/ directory found (run `tm init`)")]
    NotAProject,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the project root by walking up from the given directory, looking
/// for a `taskman/` subdirectory with a config file.
pub fn discover_project(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join("config.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

/// Read the whole task collection from `taskman/tasks.json`.
///
/// A missing or malformed file yields an empty collection rather than an
/// error: the persisted blob is disposable state, not user-authored input.
pub fn load_tasks(data_dir: &Path) -> Vec<Task> {
    let path = data_dir.join(TASKS_FILE);
    let Ok(content) = fs::read_to_string(&path) else {
        return Vec::new();
    };
    serde_json::from_str(&content).unwrap_or_default()
}

/// Write the whole task collection to `taskman/tasks.json`.
///
/// Every store mutation is followed by one of these calls; the write is
/// synchronous and atomic (temp file in the same directory, then rename).
pub fn save_tasks(data_dir: &Path, tasks: &[Task]) -> Result<(), ProjectError> {
    let path = data_dir.join(TASKS_FILE);
    let content = serde_json::to_string_pretty(tasks)?;
    atomic_write(&path, content.as_bytes()).map_err(|e| ProjectError::WriteError {
        path,
        source: e,
    })
}

/// Write `contents` to `path` via a temp file and rename, so a crash mid-write
/// never leaves a truncated tasks.json behind.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), std::io::Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::TaskStore;
    use crate::model::task::{Priority, TaskInput};
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_project(root: &Path) {
        let data_dir = root.join(DATA_DIR);
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("config.toml"), "[project]\nname = \"test\"\n").unwrap();
    }

    #[test]
    fn test_discover_project() {
        let tmp = TempDir::new().unwrap();
        create_test_project(tmp.path());

        let root = discover_project(tmp.path()).unwrap();
        assert_eq!(root, tmp.path());

        // Discovery also works from a subdirectory
        let sub = tmp.path().join("deep/nested");
        fs::create_dir_all(&sub).unwrap();
        let root = discover_project(&sub).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_discover_project_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_project(tmp.path()),
            Err(ProjectError::NotAProject)
        ));
    }

    #[test]
    fn save_and_load_round_trip_is_identity() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join(DATA_DIR);
        fs::create_dir_all(&data_dir).unwrap();

        let now = Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap();
        let mut store = TaskStore::new();
        store.add(
            TaskInput {
                title: "Write report".into(),
                ..Default::default()
            },
            now,
        );
        store.add(
            TaskInput {
                title: "Buy milk".into(),
                description: "2%".into(),
                priority: Priority::High,
                due_date: NaiveDate::from_ymd_opt(2026, 8, 29),
                category: Some("shopping".into()),
            },
            now,
        );
        let milk_id = store.tasks()[0].id.clone();
        store.toggle_complete(&milk_id, now).unwrap();

        save_tasks(&data_dir, store.tasks()).unwrap();
        let loaded = load_tasks(&data_dir);

        // Same ids, same field values, same order
        assert_eq!(loaded, store.tasks());
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(load_tasks(tmp.path()).is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(TASKS_FILE), "not json {{{").unwrap();
        assert!(load_tasks(tmp.path()).is_empty());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
