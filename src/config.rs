use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const CONFIG_ENV: &str = "MOVAPP_CORE_CONFIG";
pub const STAGING_DIR_ENV: &str = "MOVAPP_STAGING_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "movapp-core.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub staging_dir: PathBuf,
    pub default_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            staging_dir: std::env::temp_dir().join("movapp-core").join("blobs"),
            default_category: "phrases".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))
    }

    /// Explicit path from the environment, then `movapp-core.toml` in the
    /// working directory, then defaults. The staging dir env var wins over
    /// any file.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(p) => Self::load_from_file(Path::new(&p))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(dir) = std::env::var_os(STAGING_DIR_ENV) {
            config.export.staging_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}
