//! Backend API access.
//!
//! [`CampaignApi`] is the seam between the optimistic board and the
//! network: [`BackendClient`] implements it over HTTP, tests implement it
//! in memory.

pub mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod models;

pub use client::BackendClient;

use async_trait::async_trait;

use crate::account::AdAccount;
use crate::campaign::{Campaign, CampaignStatus};
use crate::errors::ApiError;
use models::{Ad, AdSet, CampaignInsights, NewCampaign};

/// Single-shot operations against the campaign backend.
///
/// Every method issues exactly one request. None of them retry.
#[async_trait]
pub trait CampaignApi: Send + Sync {
    /// Set a campaign to ACTIVE or PAUSED.
    async fn update_status(&self, id: &str, status: CampaignStatus) -> Result<Campaign, ApiError>;

    /// Archive (delete) a campaign. Returns the backend's message.
    async fn archive(&self, id: &str) -> Result<String, ApiError>;

    /// Create `count` copies of a campaign and return the new campaigns.
    async fn duplicate(
        &self,
        id: &str,
        count: u32,
        ad_account_id: Option<&str>,
    ) -> Result<Vec<Campaign>, ApiError>;

    /// Pull the campaign list for an account from Meta through the backend.
    async fn sync_campaigns(
        &self,
        ad_account_id: Option<&str>,
        include_archived: bool,
    ) -> Result<Vec<Campaign>, ApiError>;

    async fn get_campaign(&self, id: &str) -> Result<Campaign, ApiError>;

    /// Create a campaign in the account (or the backend's default account).
    async fn create_campaign(
        &self,
        campaign: &NewCampaign,
        ad_account_id: Option<&str>,
    ) -> Result<Campaign, ApiError>;

    /// Last-7-days metrics for one campaign.
    async fn get_insights(&self, id: &str) -> Result<CampaignInsights, ApiError>;

    /// Refresh metrics from Meta, for one campaign or the whole account.
    async fn sync_metrics(
        &self,
        campaign_id: Option<&str>,
        ad_account_id: Option<&str>,
    ) -> Result<Vec<CampaignInsights>, ApiError>;

    async fn list_ad_sets(&self, campaign_id: &str) -> Result<Vec<AdSet>, ApiError>;

    async fn list_ads(&self, campaign_id: &str, ad_set_id: &str) -> Result<Vec<Ad>, ApiError>;

    async fn list_accounts(&self) -> Result<Vec<AdAccount>, ApiError>;

    async fn unread_alert_count(&self) -> Result<u64, ApiError>;

    async fn health(&self) -> Result<String, ApiError>;
}
