//! In-memory [`CampaignApi`] for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use super::CampaignApi;
use super::models::{Ad, AdSet, CampaignInsights, NewCampaign};
use crate::account::AdAccount;
use crate::campaign::{Campaign, CampaignStatus};
use crate::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UpdateStatus(String, CampaignStatus),
    Archive(String),
    Duplicate(String, u32),
    Sync,
    Get(String),
    Create(String),
    Insights(String),
    SyncMetrics(Option<String>),
    AdSets(String),
    Ads(String),
    Accounts,
    UnreadAlerts,
}

/// Backend double holding its own campaign list ("backend truth").
pub struct MockApi {
    campaigns: Mutex<Vec<Campaign>>,
    accounts: Mutex<Vec<AdAccount>>,
    calls: Mutex<Vec<(Call, Instant)>>,
    failing: Mutex<HashSet<String>>,
    sync_fails: AtomicBool,
    ad_sets: Mutex<HashMap<String, Vec<AdSet>>>,
    ads: Mutex<HashMap<String, Vec<Ad>>>,
    copies: AtomicUsize,
}

impl MockApi {
    pub fn new(campaigns: Vec<Campaign>) -> Self {
        Self {
            campaigns: Mutex::new(campaigns),
            accounts: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            sync_fails: AtomicBool::new(false),
            ad_sets: Mutex::new(HashMap::new()),
            ads: Mutex::new(HashMap::new()),
            copies: AtomicUsize::new(0),
        }
    }

    pub fn with_accounts(self, accounts: Vec<AdAccount>) -> Self {
        *self.accounts.lock().unwrap() = accounts;
        self
    }

    /// Make every request touching `id` fail with a 500.
    pub fn fail_on(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
        self.sync_fails.store(false, Ordering::SeqCst);
    }

    /// Make campaign syncs fail with a 503 until failures are cleared.
    pub fn fail_sync(&self) {
        self.sync_fails.store(true, Ordering::SeqCst);
    }

    pub fn with_ad_sets(self, campaign_id: &str, ad_sets: Vec<AdSet>) -> Self {
        self.ad_sets
            .lock()
            .unwrap()
            .insert(campaign_id.to_string(), ad_sets);
        self
    }

    pub fn with_ads(self, ad_set_id: &str, ads: Vec<Ad>) -> Self {
        self.ads.lock().unwrap().insert(ad_set_id.to_string(), ads);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    pub fn backend_campaigns(&self) -> Vec<Campaign> {
        self.campaigns.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }

    fn check(&self, id: &str, what: &str) -> Result<(), ApiError> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(ApiError::from_status(
                500,
                Some(format!("{} failed for {}", what, id)),
            ));
        }
        Ok(())
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, Some("Campaign not found".to_string()))
    }
}

#[async_trait]
impl CampaignApi for MockApi {
    async fn update_status(&self, id: &str, status: CampaignStatus) -> Result<Campaign, ApiError> {
        self.record(Call::UpdateStatus(id.to_string(), status));
        self.check(id, "update")?;
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(Self::not_found)?;
        campaign.status = status;
        Ok(campaign.clone())
    }

    async fn archive(&self, id: &str) -> Result<String, ApiError> {
        self.record(Call::Archive(id.to_string()));
        self.check(id, "archive")?;
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(Self::not_found)?;
        campaign.status = CampaignStatus::Archived;
        Ok("Campaign archived".to_string())
    }

    async fn duplicate(
        &self,
        id: &str,
        count: u32,
        _ad_account_id: Option<&str>,
    ) -> Result<Vec<Campaign>, ApiError> {
        self.record(Call::Duplicate(id.to_string(), count));
        self.check(id, "duplicate")?;
        let mut campaigns = self.campaigns.lock().unwrap();
        let source = campaigns
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(Self::not_found)?;
        let created: Vec<Campaign> = (0..count)
            .map(|_| {
                let n = self.copies.fetch_add(1, Ordering::SeqCst) + 1;
                let mut copy = source.clone();
                copy.id = format!("{}-copy-{}", id, n);
                copy.name = format!("{} (copy {})", source.name, n);
                copy.status = CampaignStatus::Paused;
                copy
            })
            .collect();
        for c in created.iter().rev() {
            campaigns.insert(0, c.clone());
        }
        Ok(created)
    }

    async fn sync_campaigns(
        &self,
        _ad_account_id: Option<&str>,
        include_archived: bool,
    ) -> Result<Vec<Campaign>, ApiError> {
        self.record(Call::Sync);
        if self.sync_fails.load(Ordering::SeqCst) {
            return Err(ApiError::from_status(503, Some("Meta API unavailable".to_string())));
        }
        Ok(self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .filter(|c| include_archived || c.status != CampaignStatus::Archived)
            .cloned()
            .collect())
    }

    async fn get_campaign(&self, id: &str) -> Result<Campaign, ApiError> {
        self.record(Call::Get(id.to_string()));
        self.campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_campaign(
        &self,
        campaign: &NewCampaign,
        _ad_account_id: Option<&str>,
    ) -> Result<Campaign, ApiError> {
        self.record(Call::Create(campaign.name.clone()));
        self.check(&campaign.name, "create")?;
        let n = self.copies.fetch_add(1, Ordering::SeqCst) + 1;
        let mut created = Campaign::new(format!("new-{}", n), &campaign.name, campaign.status);
        created.objective = campaign.objective.clone();
        created.daily_budget = campaign.daily_budget_minor();
        self.campaigns.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn get_insights(&self, id: &str) -> Result<CampaignInsights, ApiError> {
        self.record(Call::Insights(id.to_string()));
        self.check(&format!("insights:{}", id), "insights")?;
        let campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(Self::not_found)?;
        Ok(CampaignInsights {
            campaign_id: campaign.id.clone(),
            campaign_name: campaign.name.clone(),
            spend: 42.5,
            impressions: 1000,
            clicks: 50,
            ctr: 5.0,
            cpc: 0.85,
            ..CampaignInsights::default()
        })
    }

    async fn sync_metrics(
        &self,
        campaign_id: Option<&str>,
        _ad_account_id: Option<&str>,
    ) -> Result<Vec<CampaignInsights>, ApiError> {
        self.record(Call::SyncMetrics(campaign_id.map(str::to_string)));
        if self.sync_fails.load(Ordering::SeqCst) {
            return Err(ApiError::from_status(503, Some("Meta API unavailable".to_string())));
        }
        Ok(self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .filter(|c| campaign_id.is_none_or(|id| c.id == id))
            .map(|c| CampaignInsights {
                campaign_id: c.id.clone(),
                campaign_name: c.name.clone(),
                ..CampaignInsights::default()
            })
            .collect())
    }

    async fn list_ad_sets(&self, campaign_id: &str) -> Result<Vec<AdSet>, ApiError> {
        self.record(Call::AdSets(campaign_id.to_string()));
        self.check(campaign_id, "ad sets")?;
        Ok(self
            .ad_sets
            .lock()
            .unwrap()
            .get(campaign_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_ads(&self, _campaign_id: &str, ad_set_id: &str) -> Result<Vec<Ad>, ApiError> {
        self.record(Call::Ads(ad_set_id.to_string()));
        self.check(ad_set_id, "ads")?;
        Ok(self
            .ads
            .lock()
            .unwrap()
            .get(ad_set_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_accounts(&self) -> Result<Vec<AdAccount>, ApiError> {
        self.record(Call::Accounts);
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn unread_alert_count(&self) -> Result<u64, ApiError> {
        self.record(Call::UnreadAlerts);
        Err(ApiError::from_status(503, None))
    }

    async fn health(&self) -> Result<String, ApiError> {
        Ok("healthy".to_string())
    }
}
