//! Wire types for the backend API and their conversion into view models.
//!
//! Campaign payloads come in two shapes: the backend's own record
//! (`meta_id`, `created_at`) and the raw Meta object relayed by the sync
//! endpoint (`effective_status`, `created_time`). Both deserialize into
//! [`CampaignPayload`].

use serde::{Deserialize, Serialize};

use crate::account::AdAccount;
use crate::campaign::{
    Campaign, CampaignStatus, Objective, format_minor_units, parse_minor_units, parse_timestamp,
};

/// Budget amounts arrive as minor-unit strings from Meta and as numbers
/// from the backend's own records.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Amount {
    pub fn minor_units(&self) -> Option<i64> {
        match self {
            Amount::Integer(v) => Some(*v).filter(|v| *v > 0),
            Amount::Float(v) => Some(v.round() as i64).filter(|v| *v > 0),
            Amount::Text(s) => parse_minor_units(Some(s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignPayload {
    pub id: String,
    #[serde(default)]
    pub meta_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub effective_status: Option<String>,
    #[serde(default)]
    pub daily_budget: Option<Amount>,
    #[serde(default)]
    pub lifetime_budget: Option<Amount>,
    #[serde(default, alias = "created_time")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updated_time")]
    pub updated_at: Option<String>,
}

impl From<CampaignPayload> for Campaign {
    fn from(p: CampaignPayload) -> Self {
        let raw_status = p.status.as_deref().or(p.effective_status.as_deref());
        let status = match raw_status.map(str::parse::<CampaignStatus>) {
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                tracing::warn!(campaign = %p.id, error = %e, "unrecognised status, showing as paused");
                CampaignStatus::Paused
            }
            None => CampaignStatus::Draft,
        };

        Campaign {
            meta_id: p.meta_id.filter(|m| !m.is_empty() && *m != p.id),
            name: p.name,
            objective: Objective::from(p.objective.unwrap_or_default()),
            status,
            daily_budget: p.daily_budget.as_ref().and_then(Amount::minor_units),
            lifetime_budget: p.lifetime_budget.as_ref().and_then(Amount::minor_units),
            created_at: parse_timestamp(p.created_at.as_deref()),
            updated_at: parse_timestamp(p.updated_at.as_deref()),
            id: p.id,
        }
    }
}

/// Body of a status update.
#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: CampaignStatus,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DuplicateResponse {
    #[serde(default)]
    pub campaigns: Vec<CampaignPayload>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
pub struct SyncCampaignsResponse {
    #[serde(default)]
    pub campaigns_synced: u64,
    #[serde(default)]
    pub campaigns: Vec<CampaignPayload>,
}

#[derive(Debug, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub accounts: Vec<AdAccount>,
}

#[derive(Debug, Deserialize)]
pub struct UnreadCountResponse {
    #[serde(default)]
    pub unread_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

/// Body of a campaign creation request. Budgets go out in major units;
/// the backend converts them to cents before calling Meta.
#[derive(Debug, Clone, Serialize)]
pub struct NewCampaign {
    pub name: String,
    pub objective: Objective,
    pub status: CampaignStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_budget: Option<f64>,
}

impl NewCampaign {
    pub fn new(name: impl Into<String>, objective: Objective) -> Self {
        Self {
            name: name.into(),
            objective,
            status: CampaignStatus::Paused,
            daily_budget: None,
        }
    }

    /// Requested daily budget in minor units.
    pub fn daily_budget_minor(&self) -> Option<i64> {
        self.daily_budget
            .map(|major| (major * 100.0).round() as i64)
            .filter(|minor| *minor > 0)
    }
}

/// Delivery metrics for one campaign over a date range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CampaignInsights {
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub campaign_name: String,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_stop: Option<String>,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub cpc: f64,
    #[serde(default)]
    pub roas: Option<f64>,
}

impl CampaignInsights {
    /// Spend as `"12.34 BRL"`. Insights report spend in major units.
    pub fn display_spend(&self, currency: &str) -> String {
        format_minor_units((self.spend * 100.0).round() as i64, currency)
    }
}

/// Response of the metrics sync. With a campaign filter the backend returns
/// a single insights object instead of a list.
#[derive(Debug, Deserialize)]
pub struct MetricsSyncResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub metrics: Option<MetricsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MetricsPayload {
    Many(Vec<CampaignInsights>),
    One(CampaignInsights),
}

impl MetricsSyncResponse {
    pub fn into_metrics(self) -> Vec<CampaignInsights> {
        match self.metrics {
            Some(MetricsPayload::Many(list)) => list,
            Some(MetricsPayload::One(one)) => vec![one],
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdSet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub effective_status: Option<String>,
    #[serde(default)]
    pub daily_budget: Option<Amount>,
}

impl AdSet {
    pub fn daily_budget_minor(&self) -> Option<i64> {
        self.daily_budget.as_ref().and_then(Amount::minor_units)
    }
}

#[derive(Debug, Deserialize)]
pub struct AdSetListResponse {
    #[serde(default)]
    pub ad_sets: Vec<AdSet>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdCreative {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub object_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdInsights {
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub ctr: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ad {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub effective_status: Option<String>,
    #[serde(default)]
    pub creative: Option<AdCreative>,
    #[serde(default)]
    pub insights: Option<AdInsights>,
}

#[derive(Debug, Deserialize)]
pub struct AdListResponse {
    #[serde(default)]
    pub ads: Vec<Ad>,
    #[serde(default)]
    pub total: u64,
}

/// FastAPI error body. `detail` is a string for handled errors and a list
/// of objects for request validation failures.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
