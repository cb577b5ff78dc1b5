use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::chain::{ChainOverride, SEPOLIA_CHAIN_ID};

const APP_NAME: &str = "pocket";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Active chain id
    #[serde(default)]
    pub chain: Option<String>,

    /// Explorer API key sent with history queries
    #[serde(default)]
    pub explorer_api_key: Option<String>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Filter used when RUST_LOG is unset
    #[serde(default)]
    pub log_level: Option<String>,

    /// Endpoint overrides for built-in chains
    #[serde(default)]
    pub chains: Vec<ChainOverride>,
}

impl Config {
    pub fn chain_id(&self) -> &str {
        self.chain
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(SEPOLIA_CHAIN_ID)
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("info")
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join(format!("{APP_NAME}.log"))))
    }
}

/// Load the config file. A missing file gives the defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        return Ok(Config::default());
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("POCKET_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join(APP_NAME).join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join(APP_NAME).join("config.toml"));
    }

    directories::ProjectDirs::from("io", APP_NAME, APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join(APP_NAME));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join(APP_NAME));
    }
    directories::ProjectDirs::from("io", APP_NAME, APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
}
