use std::fs;
use std::path::Path;

use crate::io::store_io::ProjectError;
use crate::model::config::Config;

/// Read and parse `taskman/config.toml`.
///
/// Unlike the tasks blob, the config is user-authored: a parse failure is a
/// hard error, not something to paper over.
pub fn read_config(data_dir: &Path) -> Result<Config, ProjectError> {
    let config_path = data_dir.join("config.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| ProjectError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&config_text)?;
    Ok(config)
}
