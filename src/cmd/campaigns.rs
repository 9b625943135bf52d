//! Single-campaign commands and the campaign list.

use anyhow::{Context, Result};
use console::style;
use std::sync::Arc;

use adctl::api::CampaignApi;
use adctl::api::models::NewCampaign;
use adctl::campaign::{CampaignFilter, CampaignStatus, Objective};
use adctl::config::Config;
use adctl::details::load_details;
use adctl::ui::icons::{BELL, CHECK, COPY};
use adctl::ui::{self, BulkProgressUI};

use super::{backend, confirm, open_board, report_failure};

fn print_table<A: CampaignApi>(ctl: &adctl::board::BoardController<A>, filter: &CampaignFilter) {
    let board = ctl.board();
    print!(
        "{}",
        ui::render_campaigns(&board.filtered(filter), board.selection(), board.currency())
    );
}

pub async fn cmd_list(
    config: &Config,
    search: Option<String>,
    status: Option<&str>,
    include_archived: bool,
) -> Result<()> {
    let status: Option<CampaignStatus> = status.map(str::parse).transpose()?;
    let ctl = open_board(config, include_archived || status == Some(CampaignStatus::Archived)).await?;

    if let Some(count) = ctl.unread_alerts().await
        && count > 0
    {
        eprintln!("{}{} unread alert(s)", BELL, style(count).yellow().bold());
    }

    let filter = CampaignFilter { search, status };
    print_table(&ctl, &filter);
    Ok(())
}

pub async fn cmd_show(config: &Config, id: &str) -> Result<()> {
    let api = backend(config)?;
    let details = load_details(&*api, id)
        .await
        .with_context(|| format!("Failed to fetch campaign {}", id))?;
    ui::print_banner(details.ad_sets_error.as_deref());
    print!("{}", ui::render_details(&details, ""));
    Ok(())
}

pub async fn cmd_create(
    config: &Config,
    name: &str,
    objective: &str,
    daily_budget: Option<f64>,
    active: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Campaign name cannot be empty");
    }
    if daily_budget.is_some_and(|b| !b.is_finite() || b < 0.0) {
        anyhow::bail!("--daily-budget must be a non-negative amount");
    }
    let mut new = NewCampaign::new(name.trim(), objective.parse::<Objective>()?);
    new.daily_budget = daily_budget;
    if active {
        new.status = CampaignStatus::Active;
    }

    let mut ctl = open_board(config, false).await?;
    match ctl.create(&new).await {
        Ok(created) => {
            println!("{}Created {} ({})", CHECK, style(&created.name).bold(), created.id);
            print_table(&ctl, &CampaignFilter::default());
            Ok(())
        }
        Err(err) => Err(report_failure(&ctl, err, "Create failed")),
    }
}

pub async fn cmd_metrics(config: &Config, campaign: Option<&str>) -> Result<()> {
    let mut ctl = open_board(config, false).await?;
    match ctl.sync_metrics(campaign).await {
        Ok(metrics) => {
            print!("{}", ui::render_metrics(&metrics, ctl.board().currency()));
            Ok(())
        }
        Err(err) => Err(report_failure(&ctl, err, "Metrics sync failed")),
    }
}

pub async fn cmd_set_status(config: &Config, id: &str, status: CampaignStatus) -> Result<()> {
    let mut ctl = open_board(config, false).await?;
    if let Err(err) = ctl.set_status(id, status).await {
        return Err(report_failure(&ctl, err, "Status update failed"));
    }
    println!("{}{} is now {}", CHECK, id, style(status).bold());
    print_table(&ctl, &CampaignFilter::default());
    Ok(())
}

pub async fn cmd_toggle(config: &Config, id: &str) -> Result<()> {
    let mut ctl = open_board(config, false).await?;
    match ctl.toggle_status(id).await {
        Ok(status) => {
            println!("{}{} is now {}", CHECK, id, style(status).bold());
            print_table(&ctl, &CampaignFilter::default());
            Ok(())
        }
        Err(err) => Err(report_failure(&ctl, err, "Toggle failed")),
    }
}

pub async fn cmd_archive(config: &Config, id: &str) -> Result<()> {
    if !confirm(config, &format!("Archive campaign {}?", id)) {
        println!("Archive cancelled");
        return Ok(());
    }
    let mut ctl = open_board(config, false).await?;
    match ctl.archive(id).await {
        Ok(message) => {
            println!("{}{}", CHECK, message);
            print_table(&ctl, &CampaignFilter::default());
            Ok(())
        }
        Err(err) => Err(report_failure(&ctl, err, "Archive failed")),
    }
}

pub async fn cmd_duplicate(config: &Config, id: &str, count: u32) -> Result<()> {
    if count == 0 {
        anyhow::bail!("--count must be at least 1");
    }
    let progress = if console::Term::stderr().is_term() {
        BulkProgressUI::new()
    } else {
        BulkProgressUI::hidden()
    };
    let mut ctl = open_board(config, false)
        .await?
        .with_listener(Arc::new(progress));

    let outcome = if count == 1 {
        ctl.duplicate(id).await.map_err(anyhow::Error::new)
    } else {
        ctl.duplicate_copies(id, count).await.map_err(anyhow::Error::new)
    };
    let created = match outcome {
        Ok(created) => created,
        Err(err) => {
            ui::print_banner(ctl.board().banner());
            return Err(err.context("Duplicate failed"));
        }
    };

    println!(
        "{}{} cop{} of {} created",
        COPY,
        created,
        if created == 1 { "y" } else { "ies" },
        id
    );
    print_table(&ctl, &CampaignFilter::default());
    Ok(())
}
