/// Runtime settings for the popup
use crate::error::TabGroupError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "com.esoxjem.oasis.tabGroups";
pub const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?domain=";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Slot in extension storage holding the group list
    pub storage_key: String,
    /// Prefix a hostname is appended to for favicon lookups
    pub favicon_service: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            favicon_service: DEFAULT_FAVICON_SERVICE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config, TabGroupError> {
        serde_json::from_str(json).map_err(TabGroupError::InvalidConfig)
    }

    /// Log level, falling back to info for unknown names
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
