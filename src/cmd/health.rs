//! Backend reachability check — `adctl health`.

use anyhow::{Context, Result};

use adctl::api::CampaignApi;
use adctl::config::Config;
use adctl::ui::icons::CHECK;

use super::backend;

pub async fn cmd_health(config: &Config) -> Result<()> {
    let api = backend(config)?;
    let status = api
        .health()
        .await
        .with_context(|| format!("Backend at {} is not reachable", api.base_url()))?;
    println!("{}{} ({})", CHECK, status, api.base_url());
    Ok(())
}
