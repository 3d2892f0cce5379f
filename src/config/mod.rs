use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, Result},
    points::DATE_FORMAT,
    utils::{
        paths::{app_data_dir, config_file_in, ensure_dir},
        persistence::write_json_atomic,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    #[serde(default = "Config::default_date_format")]
    pub date_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_account: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            date_format: Self::default_date_format(),
            last_opened_account: None,
        }
    }
}

impl Config {
    fn default_date_format() -> String {
        DATE_FORMAT.to_string()
    }

    /// Updates a single setting by name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "locale" => self.locale = value.to_string(),
            "date_format" => {
                if !is_valid_date_format(value) {
                    return Err(LedgerError::Config(format!(
                        "`{}` is not a valid date format",
                        value
                    )));
                }
                self.date_format = value.to_string();
            }
            other => {
                return Err(LedgerError::Config(format!("unknown setting `{}`", other)));
            }
        }
        Ok(())
    }
}

/// Whether `format` is a strftime pattern chrono can render.
pub fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        write_json_atomic(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("locale", "es-AR").unwrap();
        config.last_opened_account = Some("miles".into());
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!manager.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn rejects_unknown_settings() {
        let mut config = Config::default();
        assert!(matches!(config.set("theme", "dark"), Err(LedgerError::Config(_))));
        assert!(matches!(config.set("currency", "USD"), Err(LedgerError::Config(_))));
        assert!(matches!(config.set("date_format", "%Q"), Err(LedgerError::Config(_))));
        config.set("date_format", "%Y-%m-%d").unwrap();
    }
}
