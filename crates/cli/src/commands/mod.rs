pub mod config_cmd;
pub mod doctor;
pub mod invite;
pub mod onboard;
pub mod play;
pub mod status;
pub mod submit;

use std::path::{Path, PathBuf};

use consequences_config::GameConfig;

/// The config file in use: `--config` when given, else the default location.
pub fn config_file(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| GameConfig::config_dir().join("config.toml"))
}

pub fn load_config(explicit: Option<&Path>) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let path = config_file(explicit);
    GameConfig::load_with_env(&path)
        .map_err(|e| format!("Failed to load config: {e}").into())
}

/// Header row of a fresh response log: the timestamp then one column per
/// category label.
pub fn response_header(config: &GameConfig) -> Vec<String> {
    std::iter::once("Timestamp".to_string())
        .chain(config.categories.labels.iter().cloned())
        .collect()
}
