use std::{fs, path::Path};

use gallery::DEFAULT_CAPACITY;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub capacity: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/tripbook.db".into(),
            capacity: DEFAULT_CAPACITY,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    capacity: Option<usize>,
    log_filter: Option<String>,
}

pub fn load_settings(config_path: &Path) -> Settings {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment overrides from `env`.
pub fn load_settings_with(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileConfig>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.database_url {
                    settings.database_url = v;
                }
                if let Some(v) = file_cfg.capacity {
                    settings.capacity = v;
                }
                if let Some(v) = file_cfg.log_filter {
                    settings.log_filter = v;
                }
            }
            Err(err) => warn!(
                path = %config_path.display(),
                error = %err,
                "ignoring malformed config file"
            ),
        }
    }

    for key in ["TRIPBOOK_DATABASE_URL", "APP__DATABASE_URL"] {
        if let Some(v) = env(key) {
            settings.database_url = v;
        }
    }

    for key in ["TRIPBOOK_CAPACITY", "APP__CAPACITY"] {
        if let Some(v) = env(key) {
            match v.parse::<usize>() {
                Ok(parsed) => settings.capacity = parsed,
                Err(_) => warn!(key, value = %v, "ignoring non-numeric capacity"),
            }
        }
    }

    if let Some(v) = env("TRIPBOOK_LOG") {
        settings.log_filter = v;
    }

    settings
}

/// Turns plain paths into `sqlite://` URLs; the store creates missing parent
/// directories itself.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
