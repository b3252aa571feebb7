use crate::error::{CrmError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/v1";
const DEFAULT_PAGE_SIZE: usize = 10;

/// Overrides the data directory.
pub const HOME_ENV: &str = "CRMDESK_HOME";
/// Overrides `api_base_url` at load time.
pub const API_URL_ENV: &str = "CRMDESK_API_URL";

/// Client configuration, stored as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskConfig {
    /// Root of the backend API, e.g. `http://localhost:5000/api/v1`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token forwarded to the backend, when the deployment needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Rows per list page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Keys accepted by [`DeskConfig::get`] and [`DeskConfig::set`].
pub const CONFIG_KEYS: &[&str] = &["api-url", "api-token", "page-size"];

impl DeskConfig {
    /// Data directory: `$CRMDESK_HOME` if set, else the platform data dir.
    pub fn default_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        ProjectDirs::from("com", "crmdesk", "crmdesk")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| CrmError::Config("cannot determine a data directory".to_string()))
    }

    /// Load config from the given directory, or return defaults if not found.
    /// `$CRMDESK_API_URL` wins over the stored base URL.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let mut config = Self::load_file(config_dir)?;
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api_base_url = url.trim().to_string();
        }
        Ok(config)
    }

    /// Stored values only, without environment overrides.
    pub fn load_file<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: DeskConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory, creating it if needed.
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api-url" => Ok(self.api_base_url.clone()),
            "api-token" => Ok(self.api_token.clone().unwrap_or_default()),
            "page-size" => Ok(self.page_size.to_string()),
            other => Err(CrmError::Config(format!("unknown config key: {other}"))),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api-url" => {
                let url = value.trim().trim_end_matches('/');
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(CrmError::Config(format!(
                        "api-url must start with http:// or https://, got {value}"
                    )));
                }
                self.api_base_url = url.to_string();
            }
            "api-token" => {
                self.api_token = Some(value.trim().to_string()).filter(|t| !t.is_empty());
            }
            "page-size" => {
                let size: usize = value
                    .trim()
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| {
                        CrmError::Config(format!("page-size must be a positive number, got {value}"))
                    })?;
                self.page_size = size;
            }
            other => return Err(CrmError::Config(format!("unknown config key: {other}"))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeskConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api/v1");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = DeskConfig::load_file(temp_dir.path()).unwrap();
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("nested");

        let mut config = DeskConfig::default();
        config.set("page-size", "25").unwrap();
        config.set("api-token", "secret").unwrap();
        config.save(&nested).unwrap();

        let loaded = DeskConfig::load_file(&nested).unwrap();
        assert_eq!(loaded.page_size, 25);
        assert_eq!(loaded.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"page_size": 50}"#,
        )
        .unwrap();

        let loaded = DeskConfig::load_file(temp_dir.path()).unwrap();
        assert_eq!(loaded.page_size, 50);
        assert_eq!(loaded.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_set_normalizes_api_url() {
        let mut config = DeskConfig::default();
        config.set("api-url", "https://crm.example.com/api/v1/").unwrap();
        assert_eq!(config.get("api-url").unwrap(), "https://crm.example.com/api/v1");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = DeskConfig::default();
        assert!(config.set("api-url", "crm.example.com").is_err());
        assert!(config.set("page-size", "0").is_err());
        assert!(config.set("page-size", "ten").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn test_blank_token_clears() {
        let mut config = DeskConfig::default();
        config.set("api-token", "abc").unwrap();
        config.set("api-token", "  ").unwrap();
        assert_eq!(config.api_token, None);
        assert_eq!(config.get("api-token").unwrap(), "");
    }
}
