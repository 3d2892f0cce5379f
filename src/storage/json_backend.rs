use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use super::StorageBackend;
use crate::{
    errors::{LedgerError, Result},
    points::PointsAccount,
    series::{IndexSeries, JsonSeries, MoneyAmountSeries},
    utils::{
        paths::{accounts_dir_in, app_data_dir, canonical_name, ensure_dir},
        persistence::write_json_atomic,
    },
};

const ACCOUNT_EXTENSION: &str = "json";

/// Stores each account as pretty JSON under `<root>/accounts/<slug>.json`.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    accounts_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        let accounts_dir = accounts_dir_in(&root);
        ensure_dir(&accounts_dir)?;
        Ok(Self { root, accounts_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn account_path(&self, name: &str) -> PathBuf {
        self.accounts_dir
            .join(format!("{}.{}", canonical_name(name), ACCOUNT_EXTENSION))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, account: &PointsAccount, name: &str) -> Result<()> {
        save_account_to_path(account, &self.account_path(name))
    }

    fn load(&self, name: &str) -> Result<PointsAccount> {
        let path = self.account_path(name);
        if !path.exists() {
            return Err(LedgerError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("account `{}` not found", name),
            )));
        }
        load_account_from_path(&path)
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.accounts_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ACCOUNT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Writes the account to disk atomically by staging to a temporary file.
pub fn save_account_to_path(account: &PointsAccount, path: &Path) -> Result<()> {
    write_json_atomic(account, path)?;
    info!(account = %account.name, path = %path.display(), "account saved");
    Ok(())
}

/// Loads an account snapshot from disk, returning structured errors on failure.
pub fn load_account_from_path(path: &Path) -> Result<PointsAccount> {
    let data = fs::read_to_string(path)?;
    let account: PointsAccount = serde_json::from_str(&data)?;
    info!(account = %account.name, movements = account.movements().len(), "account loaded");
    Ok(account)
}

pub fn read_series_file(path: &Path) -> Result<JsonSeries> {
    let data = fs::read_to_string(path)?;
    let series: JsonSeries = serde_json::from_str(&data)?;
    debug!(path = %path.display(), points = series.data.len(), "series file read");
    Ok(series)
}

pub fn read_index_series(path: &Path) -> Result<IndexSeries> {
    read_series_file(path)?.into_index_series()
}

/// Reads a money series, naming it after the file stem.
pub fn read_money_series(path: &Path) -> Result<MoneyAmountSeries> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("series")
        .to_string();
    read_series_file(path)?.into_money_series(name)
}

