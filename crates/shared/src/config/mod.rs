// Configuration module
//
// Reads INI-style configuration files with environment variable overrides.
// Keys are flat `Key = value` pairs; an environment variable named
// `<prefix><Key>` (dots replaced by underscores) wins over the file.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration file parser with environment variable override
#[derive(Debug, Default)]
pub struct Config {
    values: HashMap<String, String>,
    env_prefix: String,
}

impl Config {
    /// Load configuration from a file.
    /// `env_prefix` is prepended when checking environment variables
    /// (e.g. "Telelogin_").
    pub fn load(filename: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(Path::new(filename)).map_err(|source| {
                ConfigError::Unreadable {
                    path: filename.to_string(),
                    source,
                }
            })?;

        let mut config = Config {
            values: HashMap::new(),
            env_prefix: env_prefix.to_string(),
        };
        config.parse(&content);
        Ok(config)
    }

    /// Build a configuration from already-loaded content (used in tests and
    /// by embedders that keep their config elsewhere).
    pub fn from_content(content: &str, env_prefix: &str) -> Self {
        let mut config = Config {
            values: HashMap::new(),
            env_prefix: env_prefix.to_string(),
        };
        config.parse(content);
        config
    }

    fn parse(&mut self, content: &str) {
        for line in content.lines() {
            let trimmed = line.trim();

            // Skip empty lines, comments and section headers
            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || trimmed.starts_with(';')
                || trimmed.starts_with('[')
            {
                continue;
            }

            if let Some(eq_pos) = trimmed.find('=') {
                let key = trimmed[..eq_pos].trim().to_string();
                let mut value = trimmed[eq_pos + 1..].trim().to_string();

                // Strip quotes
                if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
                    value = value[1..value.len() - 1].to_string();
                }

                self.values.insert(key, value);
            }
        }
    }

    /// Check if a key is set
    pub fn is_set(&self, key: &str) -> bool {
        self.get_env_or_config(key).is_some()
    }

    /// Get a string value with a default
    pub fn get_string_default(&self, key: &str, default: &str) -> String {
        self.get_env_or_config(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a string value if present
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_env_or_config(key)
    }

    /// Get a boolean value with a default
    pub fn get_bool_default(&self, key: &str, default: bool) -> bool {
        match self.get_env_or_config(key) {
            Some(val) => {
                let lower = val.to_lowercase();
                matches!(lower.as_str(), "1" | "true" | "yes")
            }
            None => default,
        }
    }

    /// Get an integer value with a default
    pub fn get_i32_default(&self, key: &str, default: i32) -> i32 {
        match self.get_env_or_config(key) {
            Some(val) => val.parse().unwrap_or(default),
            None => default,
        }
    }

    /// Get an integer value if present and well-formed
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get_env_or_config(key).and_then(|v| v.parse().ok())
    }

    /// Try environment variable first, then config file
    fn get_env_or_config(&self, key: &str) -> Option<String> {
        if !self.env_prefix.is_empty() {
            let env_key = format!("{}{}", self.env_prefix, key.replace('.', "_"));
            if let Ok(val) = std::env::var(&env_key) {
                return Some(val);
            }
        }

        self.values.get(key).cloned()
    }
}
