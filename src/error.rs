use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    #[error("window effect error: {0}")]
    Vibrancy(#[from] window_vibrancy::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[source] toml::de::Error),

    #[error("unknown background type `{0}`")]
    UnknownBackground(String),

    #[error("{0}")]
    Effect(String),
}
