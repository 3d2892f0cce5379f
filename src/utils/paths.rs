use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".money_calculator";
const ACCOUNTS_DIR: &str = "accounts";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.money_calculator`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("MONEY_CALCULATOR_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn accounts_dir_in(base: &Path) -> PathBuf {
    base.join(ACCOUNTS_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Lowercase, dash-separated file stem for an account name.
pub fn canonical_name(name: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !slug.is_empty() && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "account".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs() {
        assert_eq!(canonical_name("  Airline Miles 2001 "), "airline-miles-2001");
        assert_eq!(canonical_name("***"), "account");
    }
}
