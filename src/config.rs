use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::background::BackgroundType;
use crate::error::{Error, Result};

const LOCAL_CONFIG_FILE: &str = "fluent_webview.toml";

fn default_title() -> String {
    "Fluent WebView".to_string()
}

fn default_url() -> String {
    "index.html".to_string()
}

fn default_background_type() -> BackgroundType {
    BackgroundType::AutoMica
}

fn default_width() -> f64 {
    900.0
}

fn default_height() -> f64 {
    600.0
}

fn default_greeting() -> Option<String> {
    Some("Hello World!".to_string())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_title")]
    pub title: String,
    /// Page inside the bundled frontend to open in the main window.
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_background_type")]
    pub background_type: BackgroundType,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Message box shown once the window is up. `None` skips it.
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            url: default_url(),
            background_type: default_background_type(),
            debug: false,
            width: default_width(),
            height: default_height(),
            greeting: default_greeting(),
        }
    }
}

impl Config {
    /// Loads the first config file found, or the defaults when there is none.
    pub fn load() -> Result<Self> {
        Self::load_first(&Self::search_paths())
    }

    /// Loads the first of `paths` that is an existing file.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self> {
        match paths.iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from(path),
            None => {
                log::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let cfg = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(cfg)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::ConfigParse)
    }

    /// `./fluent_webview.toml`, then `<config dir>/fluent-webview/config.toml`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(LOCAL_CONFIG_FILE));
        }
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("fluent-webview").join("config.toml"));
        }
        paths
    }
}
