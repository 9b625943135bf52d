//! Plain-text tables for campaigns and accounts.
//!
//! Renderers return strings so the command layer decides where they go.

use console::{Alignment, pad_str, style};

use crate::account::AdAccount;
use crate::api::models::CampaignInsights;
use crate::board::Selection;
use crate::campaign::{Campaign, CampaignStatus, format_minor_units};
use crate::details::CampaignDetails;
use crate::ui::icons::{ACTIVE, ARCHIVED, DRAFT, PAUSED};

const NAME_WIDTH: usize = 40;
const ID_WIDTH: usize = 18;

fn cell(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, Some("…")).into_owned()
}

fn status_cell(status: CampaignStatus) -> String {
    let padded = cell(status.as_str(), 9);
    let (icon, styled) = match status {
        CampaignStatus::Active => (ACTIVE, style(padded).green()),
        CampaignStatus::Paused => (PAUSED, style(padded).yellow()),
        CampaignStatus::Archived => (ARCHIVED, style(padded).dim()),
        CampaignStatus::Draft => (DRAFT, style(padded).blue()),
    };
    format!("{} {}", icon, styled)
}

/// Campaign list with a selection marker per row.
pub fn render_campaigns(campaigns: &[&Campaign], selection: &Selection, currency: &str) -> String {
    if campaigns.is_empty() {
        return format!("{}\n", style("No campaigns found.").dim());
    }

    let mut out = format!(
        "    {} {} {}    {} {}\n",
        style(cell("ID", ID_WIDTH)).bold(),
        style(cell("NAME", NAME_WIDTH)).bold(),
        style(cell("STATUS", 9)).bold(),
        style(cell("OBJECTIVE", 16)).bold(),
        style("BUDGET").bold(),
    );
    for campaign in campaigns {
        let marker = if selection.contains(&campaign.id) {
            "[x]"
        } else {
            "[ ]"
        };
        out.push_str(&format!(
            "{} {} {} {} {} {}\n",
            marker,
            cell(&campaign.id, ID_WIDTH),
            cell(&campaign.name, NAME_WIDTH),
            status_cell(campaign.status),
            cell(campaign.objective.label(), 16),
            campaign.display_budget(currency),
        ));
    }
    out
}

/// Detail view for one campaign.
pub fn render_campaign(campaign: &Campaign, currency: &str) -> String {
    let date = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let mut out = format!("{}\n", style(&campaign.name).bold());
    out.push_str(&format!("  ID:        {}\n", campaign.id));
    if let Some(meta_id) = &campaign.meta_id {
        out.push_str(&format!("  Meta ID:   {}\n", meta_id));
    }
    out.push_str(&format!("  Status:    {}\n", status_cell(campaign.status)));
    out.push_str(&format!("  Objective: {}\n", campaign.objective.label()));
    out.push_str(&format!("  Budget:    {}\n", campaign.display_budget(currency)));
    out.push_str(&format!("  Created:   {}\n", date(campaign.created_at)));
    out.push_str(&format!("  Updated:   {}\n", date(campaign.updated_at)));
    out
}

/// Metrics block for the detail view.
pub fn render_insights(insights: Option<&CampaignInsights>, currency: &str) -> String {
    let Some(i) = insights else {
        return format!("  {}\n", style("No metrics available.").dim());
    };
    let mut out = String::new();
    if let (Some(start), Some(stop)) = (&i.date_start, &i.date_stop) {
        out.push_str(&format!("  Period:      {} to {}\n", start, stop));
    }
    out.push_str(&format!("  Spend:       {}\n", i.display_spend(currency)));
    out.push_str(&format!("  Impressions: {}\n", i.impressions));
    out.push_str(&format!("  Clicks:      {} (CTR {:.2}%)\n", i.clicks, i.ctr));
    out.push_str(&format!("  CPC:         {:.2}\n", i.cpc));
    out.push_str(&format!("  Conversions: {}\n", i.conversions));
    if let Some(roas) = i.roas {
        out.push_str(&format!("  ROAS:        {:.2}x\n", roas));
    }
    out
}

/// Full detail view: campaign, metrics, then ad sets with their ads.
pub fn render_details(details: &CampaignDetails, currency: &str) -> String {
    let mut out = render_campaign(&details.campaign, currency);
    out.push_str(&format!("\n{}\n", style("Metrics (last 7 days)").bold()));
    out.push_str(&render_insights(details.insights.as_ref(), currency));

    out.push_str(&format!(
        "\n{} ({} ad set(s), {} ad(s))\n",
        style("Ad sets").bold(),
        details.ad_sets.len(),
        details.ad_count()
    ));
    if details.ad_sets.is_empty() && details.ad_sets_error.is_none() {
        out.push_str(&format!("  {}\n", style("No ad sets.").dim()));
    }
    for detail in &details.ad_sets {
        let set = &detail.ad_set;
        let budget = set
            .daily_budget_minor()
            .map(|b| format!("{}/day", format_minor_units(b, currency)))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {} {} {} {}\n",
            cell(&set.id, ID_WIDTH),
            cell(&set.name, NAME_WIDTH),
            cell(set.effective_status.as_deref().unwrap_or(&set.status), 9),
            budget,
        ));
        for ad in &detail.ads {
            let kind = ad
                .creative
                .as_ref()
                .and_then(|c| c.object_type.as_deref())
                .unwrap_or("-");
            out.push_str(&format!(
                "    - {} {} {} {}\n",
                cell(&ad.id, ID_WIDTH),
                cell(&ad.name, NAME_WIDTH - 4),
                cell(ad.effective_status.as_deref().unwrap_or(&ad.status), 9),
                kind,
            ));
        }
    }
    out
}

/// One row per campaign from a metrics sync.
pub fn render_metrics(metrics: &[CampaignInsights], currency: &str) -> String {
    if metrics.is_empty() {
        return format!("{}\n", style("No metrics returned.").dim());
    }
    let mut out = format!(
        "{} {} {} {} {}\n",
        style(cell("CAMPAIGN", ID_WIDTH)).bold(),
        style(cell("NAME", NAME_WIDTH)).bold(),
        style(cell("SPEND", 16)).bold(),
        style(cell("CLICKS", 8)).bold(),
        style("IMPRESSIONS").bold(),
    );
    for m in metrics {
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            cell(&m.campaign_id, ID_WIDTH),
            cell(&m.campaign_name, NAME_WIDTH),
            cell(&m.display_spend(currency), 16),
            cell(&m.clicks.to_string(), 8),
            m.impressions,
        ));
    }
    out
}

/// Account list; the selected account is marked with `*`.
pub fn render_accounts(accounts: &[AdAccount], selected: Option<&str>) -> String {
    if accounts.is_empty() {
        return format!("{}\n", style("No active ad accounts.").dim());
    }
    let mut out = String::new();
    for account in accounts {
        let marker = if Some(account.account_id.as_str()) == selected {
            style("*").green().bold().to_string()
        } else {
            " ".to_string()
        };
        let business = account
            .business_name
            .as_deref()
            .map(|b| format!(" {}", style(format!("[{}]", b)).dim()))
            .unwrap_or_default();
        out.push_str(&format!(
            "{} {} {} {}{}\n",
            marker,
            cell(&account.account_id, ID_WIDTH),
            cell(&account.name, NAME_WIDTH),
            account.currency,
            business,
        ));
    }
    out
}
