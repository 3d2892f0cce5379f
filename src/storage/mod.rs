pub mod json_backend;

use std::path::Path;

use crate::{errors::Result, points::PointsAccount};

/// Abstraction over persistence backends capable of storing named points accounts.
pub trait StorageBackend: Send + Sync {
    fn save(&self, account: &PointsAccount, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<PointsAccount>;
    fn list(&self) -> Result<Vec<String>>;

    fn save_to_path(&self, account: &PointsAccount, path: &Path) -> Result<()> {
        json_backend::save_account_to_path(account, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<PointsAccount> {
        json_backend::load_account_from_path(path)
    }
}

pub use json_backend::{
    load_account_from_path, read_index_series, read_money_series, save_account_to_path,
    JsonStorage,
};
