//! Campaign detail view: the campaign itself, its recent metrics, and its
//! ad sets with their ads.
//!
//! Only the campaign is required. Metrics are a non-critical extra and an
//! ad set whose ads cannot be listed is shown without them.

use tracing::{debug, warn};

use crate::api::CampaignApi;
use crate::api::models::{Ad, AdSet, CampaignInsights};
use crate::campaign::Campaign;
use crate::errors::ApiError;

#[derive(Debug, Clone)]
pub struct AdSetDetail {
    pub ad_set: AdSet,
    pub ads: Vec<Ad>,
}

#[derive(Debug, Clone)]
pub struct CampaignDetails {
    pub campaign: Campaign,
    pub insights: Option<CampaignInsights>,
    pub ad_sets: Vec<AdSetDetail>,
    /// Set when the ad set list could not be loaded.
    pub ad_sets_error: Option<String>,
}

impl CampaignDetails {
    pub fn ad_count(&self) -> usize {
        self.ad_sets.iter().map(|s| s.ads.len()).sum()
    }
}

/// Load everything the detail view shows for one campaign.
///
/// The campaign and its metrics are fetched together; ad sets and then the
/// ads of each ad set follow one request at a time.
pub async fn load_details<A: CampaignApi + ?Sized>(
    api: &A,
    id: &str,
) -> Result<CampaignDetails, ApiError> {
    let (campaign, insights) = tokio::join!(api.get_campaign(id), api.get_insights(id));
    let campaign = campaign?;
    let insights = match insights {
        Ok(insights) => Some(insights),
        Err(err) => {
            debug!(id, error = %err, "campaign insights unavailable");
            None
        }
    };

    let (ad_sets, ad_sets_error) = match api.list_ad_sets(id).await {
        Ok(ad_sets) => (ad_sets, None),
        Err(err) => {
            warn!(id, error = %err, "failed to load ad sets");
            (Vec::new(), Some(format!("Failed to load ad sets: {}", err)))
        }
    };

    let mut detailed = Vec::with_capacity(ad_sets.len());
    for ad_set in ad_sets {
        let ads = api.list_ads(id, &ad_set.id).await.unwrap_or_else(|err| {
            debug!(ad_set = %ad_set.id, error = %err, "ads unavailable for ad set");
            Vec::new()
        });
        detailed.push(AdSetDetail { ad_set, ads });
    }

    Ok(CampaignDetails {
        campaign,
        insights,
        ad_sets: detailed,
        ad_sets_error,
    })
}
