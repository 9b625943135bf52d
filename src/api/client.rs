//! HTTP client for the campaign backend.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::CampaignApi;
use super::models::{
    AccountsResponse, Ad, AdListResponse, AdSet, AdSetListResponse, CampaignInsights,
    CampaignPayload, DuplicateResponse, ErrorBody, HealthResponse, MessageResponse,
    MetricsSyncResponse, NewCampaign, StatusUpdate, SyncCampaignsResponse, UnreadCountResponse,
};
use crate::account::AdAccount;
use crate::campaign::{Campaign, CampaignStatus};
use crate::errors::ApiError;

/// Default backend location when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// HTTP client for the campaign backend.
///
/// No timeout is applied unless one is configured: a hung request blocks
/// its caller, and with it the rest of any batch.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::ClientInit)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a 2xx JSON body, mapping everything else
    /// to [`ApiError`].
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "backend response");

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::into_detail);
            return Err(ApiError::from_status(status.as_u16(), detail));
        }

        response.json::<T>().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CampaignApi for BackendClient {
    async fn update_status(&self, id: &str, status: CampaignStatus) -> Result<Campaign, ApiError> {
        if !status.is_settable() {
            return Err(ApiError::UnsupportedStatus(status.to_string()));
        }
        let url = self.url(&format!("/api/campaigns/{}", id));
        let request = self.client.put(&url).json(&StatusUpdate { status });
        let payload: CampaignPayload = self.send(request, &url).await?;
        Ok(payload.into())
    }

    async fn archive(&self, id: &str) -> Result<String, ApiError> {
        let url = self.url(&format!("/api/campaigns/{}", id));
        let request = self.client.delete(&url);
        let body: MessageResponse = self.send(request, &url).await?;
        Ok(body.message)
    }

    async fn duplicate(
        &self,
        id: &str,
        count: u32,
        ad_account_id: Option<&str>,
    ) -> Result<Vec<Campaign>, ApiError> {
        let url = self.url(&format!("/api/campaigns/{}/duplicate", id));
        let mut query = vec![("count", count.to_string())];
        if let Some(account) = ad_account_id {
            query.push(("ad_account_id", account.to_string()));
        }
        let request = self.client.post(&url).query(&query);
        let body: DuplicateResponse = self.send(request, &url).await?;
        debug!(
            source = id,
            created = body.campaigns.len(),
            total = body.total,
            page = body.page,
            limit = body.limit,
            "duplicated campaign"
        );
        Ok(body.campaigns.into_iter().map(Campaign::from).collect())
    }

    async fn sync_campaigns(
        &self,
        ad_account_id: Option<&str>,
        include_archived: bool,
    ) -> Result<Vec<Campaign>, ApiError> {
        let url = self.url("/api/sync/campaigns");
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(account) = ad_account_id {
            query.push(("ad_account_id", account.to_string()));
        }
        if include_archived {
            query.push(("include_archived", "true".to_string()));
        }
        let request = self.client.post(&url).query(&query);
        let body: SyncCampaignsResponse = self.send(request, &url).await?;
        debug!(synced = body.campaigns_synced, "synced campaigns");
        Ok(body.campaigns.into_iter().map(Campaign::from).collect())
    }

    async fn get_campaign(&self, id: &str) -> Result<Campaign, ApiError> {
        let url = self.url(&format!("/api/campaigns/{}", id));
        let payload: CampaignPayload = self.send(self.client.get(&url), &url).await?;
        Ok(payload.into())
    }

    async fn create_campaign(
        &self,
        campaign: &NewCampaign,
        ad_account_id: Option<&str>,
    ) -> Result<Campaign, ApiError> {
        let url = self.url("/api/campaigns");
        let mut request = self.client.post(&url).json(campaign);
        if let Some(account) = ad_account_id {
            request = request.query(&[("ad_account_id", account)]);
        }
        let payload: CampaignPayload = self.send(request, &url).await?;
        Ok(payload.into())
    }

    async fn get_insights(&self, id: &str) -> Result<CampaignInsights, ApiError> {
        let url = self.url(&format!("/api/campaigns/{}/insights", id));
        self.send(self.client.get(&url), &url).await
    }

    async fn sync_metrics(
        &self,
        campaign_id: Option<&str>,
        ad_account_id: Option<&str>,
    ) -> Result<Vec<CampaignInsights>, ApiError> {
        let url = self.url("/api/sync/metrics");
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(campaign) = campaign_id {
            query.push(("campaign_id", campaign));
        }
        if let Some(account) = ad_account_id {
            query.push(("ad_account_id", account));
        }
        let request = self.client.post(&url).query(&query);
        let body: MetricsSyncResponse = self.send(request, &url).await?;
        if !body.success {
            debug!("metrics sync reported success=false");
        }
        Ok(body.into_metrics())
    }

    async fn list_ad_sets(&self, campaign_id: &str) -> Result<Vec<AdSet>, ApiError> {
        let url = self.url(&format!("/api/campaigns/{}/ad-sets", campaign_id));
        let body: AdSetListResponse = self.send(self.client.get(&url), &url).await?;
        debug!(campaign_id, total = body.total, "fetched ad sets");
        Ok(body.ad_sets)
    }

    async fn list_ads(&self, campaign_id: &str, ad_set_id: &str) -> Result<Vec<Ad>, ApiError> {
        let url = self.url(&format!(
            "/api/campaigns/{}/ad-sets/{}/ads",
            campaign_id, ad_set_id
        ));
        let body: AdListResponse = self.send(self.client.get(&url), &url).await?;
        debug!(ad_set_id, total = body.total, "fetched ads");
        Ok(body.ads)
    }

    async fn list_accounts(&self) -> Result<Vec<AdAccount>, ApiError> {
        let url = self.url("/api/sync/accounts");
        let body: AccountsResponse = self.send(self.client.get(&url), &url).await?;
        if !body.success {
            debug!("accounts endpoint reported success=false");
        }
        Ok(body.accounts)
    }

    async fn unread_alert_count(&self) -> Result<u64, ApiError> {
        let url = self.url("/api/alerts/unread-count");
        let body: UnreadCountResponse = self.send(self.client.get(&url), &url).await?;
        Ok(body.unread_count)
    }

    async fn health(&self) -> Result<String, ApiError> {
        let url = self.url("/health");
        let body: HealthResponse = self.send(self.client.get(&url), &url).await?;
        Ok(body.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = BackendClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_new_rejects_non_http_url() {
        let err = BackendClient::new("localhost:8000", None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_update_status_rejects_unsettable_status_without_request() {
        // Port 9 (discard) is never contacted: validation happens first.
        let client = BackendClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client
            .update_status("c1", CampaignStatus::Archived)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedStatus(_)));
    }
}
