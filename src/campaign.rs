//! Campaign view model shared by the API client, the board, and the UI.
//!
//! The local list is a lossy cache of backend state: nothing here is
//! persisted, and every field can be overwritten by the next sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Active,
    Paused,
    Archived,
    Draft,
}

impl CampaignStatus {
    /// The status a toggle switches to. Only ACTIVE and PAUSED toggle.
    pub fn toggled(self) -> Option<CampaignStatus> {
        match self {
            CampaignStatus::Active => Some(CampaignStatus::Paused),
            CampaignStatus::Paused => Some(CampaignStatus::Active),
            CampaignStatus::Archived | CampaignStatus::Draft => None,
        }
    }

    /// Whether the backend accepts this value in a status update.
    pub fn is_settable(self) -> bool {
        matches!(self, CampaignStatus::Active | CampaignStatus::Paused)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::Paused => "PAUSED",
            CampaignStatus::Archived => "ARCHIVED",
            CampaignStatus::Draft => "DRAFT",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(CampaignStatus::Active),
            "PAUSED" => Ok(CampaignStatus::Paused),
            // Meta reports deleted campaigns separately; locally they are archived.
            "ARCHIVED" | "DELETED" => Ok(CampaignStatus::Archived),
            "DRAFT" => Ok(CampaignStatus::Draft),
            _ => anyhow::bail!(
                "Invalid campaign status '{}'. Valid values: ACTIVE, PAUSED, ARCHIVED, DRAFT",
                s
            ),
        }
    }
}

/// Marketing objective. Legacy or unknown objectives are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Objective {
    Traffic,
    Leads,
    Sales,
    Engagement,
    Awareness,
    AppPromotion,
    Other(String),
}

impl Objective {
    pub fn as_str(&self) -> &str {
        match self {
            Objective::Traffic => "OUTCOME_TRAFFIC",
            Objective::Leads => "OUTCOME_LEADS",
            Objective::Sales => "OUTCOME_SALES",
            Objective::Engagement => "OUTCOME_ENGAGEMENT",
            Objective::Awareness => "OUTCOME_AWARENESS",
            Objective::AppPromotion => "OUTCOME_APP_PROMOTION",
            Objective::Other(s) => s,
        }
    }

    /// Short label for tables.
    pub fn label(&self) -> &str {
        match self {
            Objective::Traffic => "Traffic",
            Objective::Leads => "Leads",
            Objective::Sales => "Sales",
            Objective::Engagement => "Engagement",
            Objective::Awareness => "Awareness",
            Objective::AppPromotion => "App promotion",
            Objective::Other(s) => s,
        }
    }
}

impl From<String> for Objective {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OUTCOME_TRAFFIC" => Objective::Traffic,
            "OUTCOME_LEADS" => Objective::Leads,
            "OUTCOME_SALES" => Objective::Sales,
            "OUTCOME_ENGAGEMENT" => Objective::Engagement,
            "OUTCOME_AWARENESS" => Objective::Awareness,
            "OUTCOME_APP_PROMOTION" => Objective::AppPromotion,
            _ => Objective::Other(s),
        }
    }
}

impl From<Objective> for String {
    fn from(o: Objective) -> Self {
        o.as_str().to_string()
    }
}

/// Parses an objective given on the command line. Accepts the full
/// `OUTCOME_*` name or its suffix in any case; unknown values are rejected
/// because the backend only creates campaigns with the six outcomes.
impl std::str::FromStr for Objective {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase().replace(['-', ' '], "_");
        let full = if upper.starts_with("OUTCOME_") {
            upper
        } else {
            format!("OUTCOME_{}", upper)
        };
        match Objective::from(full) {
            Objective::Other(_) => anyhow::bail!(
                "Invalid objective '{}'. Valid values: traffic, leads, sales, engagement, awareness, app_promotion",
                s
            ),
            objective => Ok(objective),
        }
    }
}

/// A campaign as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    /// Meta-side identifier, when the backend distinguishes it from `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_id: Option<String>,
    pub name: String,
    pub objective: Objective,
    pub status: CampaignStatus,
    /// Daily budget in minor currency units (cents).
    pub daily_budget: Option<i64>,
    /// Lifetime budget in minor currency units (cents).
    pub lifetime_budget: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Campaign {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: CampaignStatus) -> Self {
        Self {
            id: id.into(),
            meta_id: None,
            name: name.into(),
            objective: Objective::Traffic,
            status,
            daily_budget: None,
            lifetime_budget: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Budget shown in listings: daily if set, else lifetime.
    pub fn display_budget(&self, currency: &str) -> String {
        match (self.daily_budget, self.lifetime_budget) {
            (Some(daily), _) => format!("{}/day", format_minor_units(daily, currency)),
            (None, Some(lifetime)) => format!("{} total", format_minor_units(lifetime, currency)),
            (None, None) => "-".to_string(),
        }
    }
}

/// Format a minor-unit amount as major units, e.g. `15050` → `150.50 BRL`.
pub fn format_minor_units(minor: i64, currency: &str) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let amount = format!("{}{}.{:02}", sign, abs / 100, abs % 100);
    if currency.is_empty() {
        amount
    } else {
        format!("{} {}", amount, currency)
    }
}

/// Parse a budget string as sent by Meta (minor units, possibly empty).
pub fn parse_minor_units(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>().ok().filter(|v| *v > 0)
}

/// Parse timestamps in either RFC 3339 or Meta's `+0000` offset form.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Search and status filter applied to the campaign list.
#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    pub search: Option<String>,
    pub status: Option<CampaignStatus>,
}

impl CampaignFilter {
    pub fn matches(&self, campaign: &Campaign) -> bool {
        let matches_search = match &self.search {
            Some(q) => campaign.name.to_lowercase().contains(&q.to_lowercase()),
            None => true,
        };
        let matches_status = self.status.is_none_or(|s| campaign.status == s);
        matches_search && matches_status
    }

    pub fn apply<'a>(&self, campaigns: &'a [Campaign]) -> Vec<&'a Campaign> {
        campaigns.iter().filter(|c| self.matches(c)).collect()
    }
}
