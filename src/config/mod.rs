use crate::errors::{AppError, AppResult};
use crate::models::language::Language;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const ENV_DB: &str = "RCHECKIN_DB";
pub const ENV_BIND: &str = "RCHECKIN_BIND";
pub const ENV_PORT: &str = "RCHECKIN_PORT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: String,
    pub bind_address: String,
    pub port: u16,
    /// Check-in timestamps are taken in this fixed UTC offset.
    pub utc_offset_hours: i32,
    pub history_limit: usize,
    pub cache_ttl_secs: u64,
    /// Web login tokens stop working after this many hours.
    pub session_ttl_hours: i64,
    pub default_language: Language,
    pub users_sheet: String,
    /// scrypt cost, as log2(N).
    pub password_log_n: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 8501,
            utc_offset_hours: 8,
            history_limit: 100,
            cache_ttl_secs: 60,
            session_ttl_hours: 12,
            default_language: Language::default(),
            users_sheet: "users_login".to_string(),
            password_log_n: 15,
        }
    }
}

impl Config {
    /// `~/.rcheckin`, or `./.rcheckin` when there is no home directory.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rcheckin")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rcheckin.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rcheckin.sqlite")
    }

    /// Load the config file (defaults when absent), then apply environment overrides.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        cfg.apply_env(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Overrides from `RCHECKIN_*` variables, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.trim().is_empty()) {
            self.database = db;
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            self.bind_address = bind;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{ENV_PORT}={port} is not a port")))?;
        }
        Ok(())
    }

    /// Database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// Create the config directory and, unless `is_test`, write the config file.
    /// Returns the database path that was configured.
    pub fn init_all(&mut self, custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        if let Some(name) = custom_db {
            let p = expand_tilde(name);
            let p = if p.is_absolute() { p } else { dir.join(p) };
            self.database = p.to_string_lossy().to_string();
        }

        let db_path = self.database_path();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if !is_test {
            let yaml = self.to_yaml()?;
            fs::write(Self::config_file(), yaml).map_err(|_| AppError::ConfigSave)?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml("port: 9000\ndefault_language: en\n").unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.default_language, Language::En);
        assert_eq!(cfg.history_limit, 100);
        assert_eq!(cfg.utc_offset_hours, 8);
        assert_eq!(cfg.users_sheet, "users_login");
    }

    #[test]
    fn env_overrides_win() {
        let mut cfg = Config::default();
        cfg.apply_env(|k| match k {
            ENV_DB => Some("/tmp/x.sqlite".into()),
            ENV_PORT => Some("8080".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.bind_address, "127.0.0.1");
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_env(|k| (k == ENV_PORT).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
