use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_PATH_VAR: &str = "INSURA_UPLOADER_CONFIG";
pub const BASE_URL_VAR: &str = "INSURA_UPLOADER_BASE_URL";
pub const LOG_LEVEL_VAR: &str = "INSURA_UPLOADER_LOG";
const DEFAULT_CONFIG_FILE: &str = "insura_uploader.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    pub endpoint: EndpointConfig,
    pub selection: SelectionConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Scheme, host and optional path prefix of the analysis service
    pub base_url: String,
    pub upload_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub max_file_size_mb: u64,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerMode {
    /// Selecting a file opens the full viewer with list, preview and report
    Combined,
    /// File list in a sidebar, report panel toggled on its own
    Split,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub mode: ViewerMode,
    pub clear_selection_on_close: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            upload_path: "/upload".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            allowed_extensions: ["pdf", "doc", "docx", "png", "jpg", "jpeg", "tiff", "bmp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mode: ViewerMode::Split,
            clear_selection_on_close: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl UploaderConfig {
    /// Defaults, then the TOML file (if any), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::load_from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.endpoint.base_url = base_url.trim().to_string();
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level.trim().to_string();
        }
    }
}

impl EndpointConfig {
    /// Joins base URL and upload path, keeping any path prefix on the base.
    pub fn upload_url(&self) -> Result<Url, ConfigError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.upload_path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|source| ConfigError::InvalidUrl {
            url: joined,
            source,
        })
    }
}

impl SelectionConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}
