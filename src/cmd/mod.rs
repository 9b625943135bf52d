//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module      | Commands handled                                          |
//! |-------------|-----------------------------------------------------------|
//! | `accounts`  | `Accounts`                                                |
//! | `campaigns` | `List`, `Show`, `Create`, `Pause`, `Activate`, `Toggle`, `Archive`, `Duplicate`, `Metrics` |
//! | `bulk`      | `Bulk`                                                    |
//! | `config`    | `Config`                                                  |
//! | `health`    | `Health`                                                  |

pub mod accounts;
pub mod bulk;
pub mod campaigns;
pub mod config;
pub mod health;

pub use accounts::cmd_accounts;
pub use bulk::cmd_bulk;
pub use campaigns::{
    cmd_archive, cmd_create, cmd_duplicate, cmd_list, cmd_metrics, cmd_set_status, cmd_show,
    cmd_toggle,
};
pub use config::cmd_config;
pub use health::cmd_health;

use anyhow::{Context, Result};
use dialoguer::Confirm;
use std::sync::Arc;

use adctl::account::AccountStore;
use adctl::api::BackendClient;
use adctl::board::BoardController;
use adctl::config::Config;
use adctl::ui::{self, icons::ACCOUNT};

pub(crate) fn backend(config: &Config) -> Result<Arc<BackendClient>> {
    let client = BackendClient::new(&config.backend_url, config.timeout())
        .context("Failed to create backend client")?;
    Ok(Arc::new(client))
}

/// Ask before a destructive action unless `--yes` was given. Without a
/// terminal the prompt fails and counts as "no".
pub(crate) fn confirm(config: &Config, prompt: &str) -> bool {
    if config.yes {
        return true;
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Build a controller scoped to the selected account and synced with the
/// backend, ready for one action.
pub(crate) async fn open_board(
    config: &Config,
    include_archived: bool,
) -> Result<BoardController<BackendClient>> {
    let mut ctl = BoardController::new(backend(config)?, config.controller_settings(include_archived));

    let saved = AccountStore::new(&config.data_dir).load()?;
    let preferred = config.account_override.clone().or(saved);
    ctl.load_accounts(preferred.as_deref())
        .await
        .context("Failed to load ad accounts")?;

    if let Some(wanted) = &config.account_override {
        let selected = ctl.board().account().map(|a| a.account_id.as_str());
        if selected != Some(wanted.as_str()) {
            anyhow::bail!("Ad account '{}' not found or not active", wanted);
        }
    }
    match ctl.board().account() {
        Some(account) => eprintln!("{}{}", ACCOUNT, account.display_name()),
        None => anyhow::bail!("No active ad accounts. Connect an account in the backend first."),
    }

    if let Err(err) = ctl.sync().await {
        ui::print_banner(ctl.board().banner());
        return Err(err).context("Failed to load campaigns");
    }
    Ok(ctl)
}

/// Print the banner left by a failed action and turn the error into the
/// command's result.
pub(crate) fn report_failure<A, E>(
    ctl: &BoardController<A>,
    err: E,
    what: &str,
) -> anyhow::Error
where
    A: adctl::api::CampaignApi,
    E: std::error::Error + Send + Sync + 'static,
{
    ui::print_banner(ctl.board().banner());
    anyhow::Error::new(err).context(what.to_string())
}
