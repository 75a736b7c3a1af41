//! Application configuration.
//!
//! Read from `orcamento.toml` beside the executable unless a path is given on
//! the command line. Every key is optional:
//!
//! ```toml
//! template = "interface.xlsx"
//! scratch  = "interface_runtime.xlsx"
//! logo     = "logo.jpg"
//! backend  = "xlsx"
//!
//! [window]
//! title  = "Orçamento System"
//! width  = 920.0
//! height = 520.0
//!
//! [logging]
//! level     = "info"
//! directory = "logs"
//! stdout    = true
//!
//! [cells]
//! freight = "B6"
//! ```
//!
//! Relative paths are resolved against the directory holding the
//! configuration file (or the executable when there is none).

use std::{
    fs,
    path::{Path, PathBuf},
};

use orcamento_core::{CellMap, TemplatePaths};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "orcamento.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orçamento System".to_string(),
            width: 920.0,
            height: 520.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Any `EnvFilter` directive. `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, records are also appended to `<directory>/<app>.log`.
    pub directory: Option<PathBuf>,
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            stdout: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub template: PathBuf,
    pub scratch: PathBuf,
    pub logo: PathBuf,
    pub backend: String,
    pub window: WindowConfig,
    pub logging: LoggingConfig,
    pub cells: CellMap,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("interface.xlsx"),
            scratch: PathBuf::from("interface_runtime.xlsx"),
            logo: PathBuf::from("logo.jpg"),
            backend: "xlsx".to_string(),
            window: WindowConfig::default(),
            logging: LoggingConfig::default(),
            cells: CellMap::default(),
        }
    }
}

impl AppConfig {
    /// Loads an explicitly requested configuration file. Any failure is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.resolved_against(path.parent().unwrap_or(Path::new("."))))
    }

    /// Loads `orcamento.toml` from `base_dir` if present.
    ///
    /// A missing file silently yields the defaults. An unreadable or invalid
    /// file also yields the defaults; the error is returned alongside so the
    /// caller can log it once logging is up.
    pub fn discover(base_dir: &Path) -> (Self, Option<ConfigError>) {
        let path = base_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return (Self::default().resolved_against(base_dir), None);
        }
        match Self::load(&path) {
            Ok(config) => (config, None),
            Err(error) => (Self::default().resolved_against(base_dir), Some(error)),
        }
    }

    /// Makes every relative path absolute with respect to `base`.
    pub fn resolved_against(
        mut self,
        base: &Path,
    ) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.template);
        resolve(&mut self.scratch);
        resolve(&mut self.logo);
        if let Some(directory) = self.logging.directory.as_mut() {
            resolve(directory);
        }
        self
    }

    pub fn template_paths(&self) -> TemplatePaths {
        TemplatePaths {
            template: self.template.clone(),
            scratch: self.scratch.clone(),
        }
    }
}

/// Directory of the running executable, where bundled resources live.
pub fn resource_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
