use crate::error::{Error, Result};
use crate::transform::BACKUP_SUFFIX;
use crate::walk::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = ".remold.toml";

/// Optional per-directory defaults. Command-line flags always win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Suffix for backup files.
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,

    /// File name regex to include.
    #[serde(default = "default_include")]
    pub include: String,

    /// File or directory name regex to exclude.
    #[serde(default = "default_exclude")]
    pub exclude: String,

    /// Transform whole files instead of line by line.
    #[serde(default)]
    pub at_once: bool,

    /// Default output format: "text" or "json".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_suffix: default_backup_suffix(),
            include: default_include(),
            exclude: default_exclude(),
            at_once: false,
            format: default_format(),
        }
    }
}

fn default_backup_suffix() -> String {
    BACKUP_SUFFIX.to_string()
}

fn default_include() -> String {
    DEFAULT_INCLUDE.to_string()
}

fn default_exclude() -> String {
    DEFAULT_EXCLUDE.to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load `.remold.toml` from the working directory if present.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::Usage(format!("{}: {e}", path.display())))
    }
}
