//! INI file configuration adapter.
//!
//! Values can be overridden from the environment: with the default prefix,
//! `[sqlite] path` is shadowed by `TRADESIM_SQLITE_PATH`.

use crate::domain::error::TradesimError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub const ENV_PREFIX: &str = "TRADESIM";

pub struct FileConfigAdapter {
    config: Ini,
    env_prefix: Option<String>,
}

impl FileConfigAdapter {
    /// Load a file; environment overrides use [`ENV_PREFIX`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradesimError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TradesimError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self {
            config,
            env_prefix: Some(ENV_PREFIX.to_string()),
        })
    }

    /// Parse INI text. No environment overrides unless
    /// [`with_env_prefix`](Self::with_env_prefix) is called.
    pub fn from_string(content: &str) -> Result<Self, TradesimError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TradesimError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self {
            config,
            env_prefix: None,
        })
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    fn env_key(prefix: &str, section: &str, key: &str) -> String {
        format!("{prefix}_{section}_{key}").to_uppercase()
    }

    fn env_override(&self, section: &str, key: &str) -> Option<String> {
        let prefix = self.env_prefix.as_deref()?;
        std::env::var(Self::env_key(prefix, section, key)).ok()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.env_override(section, key)
            .or_else(|| self.config.get(section, key))
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
