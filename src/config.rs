use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PLUGINS_ROOT, PLUGINS_ROOT_ENV};
use crate::error::{Result, TagError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub loader: LoaderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory resource paths are resolved against
    pub data_dir: PathBuf,
    /// Plugin root below `data_dir`; `CharGen/Tags/<package>` is appended
    pub plugins_root: PathBuf,
    /// `plugins.txt` style load order file. Takes precedence over `packages`.
    pub load_order: Option<PathBuf>,
    pub packages: Vec<String>,
    /// Only resolve the identifiers listed in `known_forms`
    pub strict_forms: bool,
    pub known_forms: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            plugins_root: PathBuf::from(DEFAULT_PLUGINS_ROOT),
            load_order: None,
            packages: Vec::new(),
            strict_forms: false,
            known_forms: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Write JSON logs to `directory` in addition to the console
    pub file_output: bool,
    /// Filter used when `RUST_LOG` is not set
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "chargen_tags.log".to_string(),
            file_output: true,
            default_directive: "chargen_tags=info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            TagError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml(&config_content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`Config::load_from`], but a missing file yields the defaults
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load_from(config_path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var(PLUGINS_ROOT_ENV) {
            if !root.trim().is_empty() {
                self.loader.plugins_root = PathBuf::from(root.trim());
            }
        }
    }
}
