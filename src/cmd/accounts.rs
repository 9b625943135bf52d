//! Ad account listing and selection — `adctl accounts`.

use anyhow::{Context, Result};

use adctl::account::{AccountStore, active_accounts};
use adctl::api::CampaignApi;
use adctl::config::Config;
use adctl::ui::{self, icons::CHECK};

use super::super::AccountsCommands;
use super::backend;

pub async fn cmd_accounts(config: &Config, command: Option<AccountsCommands>) -> Result<()> {
    let api = backend(config)?;
    let store = AccountStore::new(&config.data_dir);
    let accounts = active_accounts(
        api.list_accounts()
            .await
            .context("Failed to load ad accounts")?,
    );

    match command {
        None | Some(AccountsCommands::List) => {
            let saved = config.account_override.clone().or(store.load()?);
            let selected = adctl::account::resolve_selected(&accounts, saved.as_deref());
            print!(
                "{}",
                ui::render_accounts(&accounts, selected.map(|a| a.account_id.as_str()))
            );
        }
        Some(AccountsCommands::Select { account_id }) => {
            let Some(account) = accounts.iter().find(|a| a.account_id == account_id) else {
                anyhow::bail!("Ad account '{}' not found or not active", account_id);
            };
            store.save(&account.account_id)?;
            println!("{}Selected {}", CHECK, account.display_name());
        }
    }

    Ok(())
}
