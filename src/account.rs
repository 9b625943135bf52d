//! Ad account context: which advertising account every list and detail
//! fetch is scoped to.
//!
//! The selection lives only on the local machine, the terminal equivalent
//! of the dashboard's local storage entry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `account_status` value Meta uses for accounts that can run ads.
pub const ACCOUNT_STATUS_ACTIVE: i64 = 1;

const SELECTED_ACCOUNT_FILE: &str = "selected_account";

/// An advertising account as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdAccount {
    /// Graph id, usually `act_<account_id>`.
    pub id: String,
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub account_status: i64,
    #[serde(default)]
    pub amount_spent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

impl AdAccount {
    pub fn is_active(&self) -> bool {
        self.account_status == ACCOUNT_STATUS_ACTIVE
    }

    /// `Name (account_id)` for prompts and headers.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.account_id)
    }
}

/// Keep only accounts that can run ads.
pub fn active_accounts(accounts: Vec<AdAccount>) -> Vec<AdAccount> {
    accounts.into_iter().filter(AdAccount::is_active).collect()
}

/// Pick the account to scope requests to: the saved one if it is still
/// among `accounts`, otherwise the first.
pub fn resolve_selected<'a>(accounts: &'a [AdAccount], saved_id: Option<&str>) -> Option<&'a AdAccount> {
    saved_id
        .and_then(|id| accounts.iter().find(|a| a.account_id == id))
        .or_else(|| accounts.first())
}

/// On-disk store for the selected account id.
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SELECTED_ACCOUNT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved account id. A missing or empty file means none.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let id = content.trim();
        Ok((!id.is_empty()).then(|| id.to_string()))
    }

    pub fn save(&self, account_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        fs::write(&self.path, format!("{}\n", account_id))
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::debug!(account_id, path = %self.path.display(), "saved selected account");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove selected account file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn account(account_id: &str, status: i64) -> AdAccount {
        AdAccount {
            id: format!("act_{}", account_id),
            account_id: account_id.to_string(),
            name: format!("Account {}", account_id),
            currency: "BRL".to_string(),
            account_status: status,
            amount_spent: "0".to_string(),
            business_name: None,
        }
    }

    #[test]
    fn test_active_accounts_filters_status() {
        let accounts = vec![account("1", 1), account("2", 2), account("3", 1)];
        let active = active_accounts(accounts);
        let ids: Vec<_> = active.iter().map(|a| a.account_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_resolve_selected_prefers_saved() {
        let accounts = vec![account("1", 1), account("3", 1)];
        let selected = resolve_selected(&accounts, Some("3")).unwrap();
        assert_eq!(selected.account_id, "3");
    }

    #[test]
    fn test_resolve_selected_falls_back_to_first() {
        let accounts = vec![account("1", 1), account("3", 1)];
        assert_eq!(
            resolve_selected(&accounts, Some("missing")).unwrap().account_id,
            "1"
        );
        assert_eq!(resolve_selected(&accounts, None).unwrap().account_id, "1");
        assert!(resolve_selected(&[], Some("1")).is_none());
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(&dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), None);

        store.save("123456").unwrap();
        assert_eq!(store.load().unwrap(), Some("123456".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_store_treats_blank_file_as_none() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        fs::write(store.path(), "\n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
