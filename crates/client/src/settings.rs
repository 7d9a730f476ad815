// Client settings
//
// Channel implementations need the application's API credentials and a
// place to persist their connection session; both come from the shared
// configuration loader so they can be overridden via environment
// variables (Telelogin_ApiId, Telelogin_ApiHash, ...).

use std::path::PathBuf;
use thiserror::Error;

use telelogin_shared::config::Config;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "Telelogin_";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required configuration key: {0}")]
    MissingKey(&'static str),
}

/// Application identity registered with the account service
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_id: i32,
    pub api_hash: String,
}

/// Everything a channel implementation needs to come up
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api: ApiCredentials,
    /// Where the channel persists its connection session between runs
    pub session_path: PathBuf,
    /// Log directory; console-only logging when absent
    pub log_dir: Option<String>,
}

impl ClientSettings {
    pub fn from_config(config: &Config) -> Result<Self, SettingsError> {
        let api_id = config
            .get_i32("ApiId")
            .ok_or(SettingsError::MissingKey("ApiId"))?;
        let api_hash = config
            .get_string("ApiHash")
            .ok_or(SettingsError::MissingKey("ApiHash"))?;

        Ok(ClientSettings {
            api: ApiCredentials { api_id, api_hash },
            session_path: PathBuf::from(
                config.get_string_default("SessionPath", "sessions/telelogin.json"),
            ),
            log_dir: config.get_string("LogsDir"),
        })
    }
}
