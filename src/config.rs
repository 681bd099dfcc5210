//! Scanboard configuration.
//!
//! Loaded from `~/.scanboard/config.toml`. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Scanboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// The default reviewer identity.
    /// Used when neither `--as` nor `SCANBOARD_REVIEWER` is given.
    pub reviewer: Option<String>,

    /// Which agent tools carry the plan and the shell commands.
    pub tools: ToolNames,
}

/// Names of the tools whose traffic gets special treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ToolNames {
    /// The plan-writing tool: its input is the whole todo list.
    pub plan: String,

    /// The shell tool: its output arrives in a later update.
    pub shell: String,
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            plan: "TodoWrite".to_string(),
            shell: "Bash".to_string(),
        }
    }
}

impl Config {
    /// Load config from `~/.scanboard/config.toml`, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.reviewer = config.reviewer.filter(|r| !r.trim().is_empty());
        Ok(config)
    }

    /// The config file path: `~/.scanboard/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".scanboard").join("config.toml"))
    }
}
