//! Optimistic mutations against the board, backed by a [`CampaignApi`].
//!
//! Every mutating operation follows the same shape: snapshot the list,
//! change it locally, send the request(s), and put the snapshot back if
//! anything fails. The controller is borrowed mutably for the whole
//! operation, so a second action cannot start while one is in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{CampaignBoard, DEFAULT_MIN_SELECTION};
use crate::account::{AdAccount, active_accounts, resolve_selected};
use crate::api::CampaignApi;
use crate::api::models::{CampaignInsights, NewCampaign};
use crate::bulk::{
    BulkAction, BulkProgress, DEFAULT_BULK_DELAY, DEFAULT_DUPLICATE_DELAY, ItemEffect,
    ProgressListener, SequenceObserver, Sequencer, SilentProgress, Step,
};
use crate::campaign::{Campaign, CampaignStatus};
use crate::errors::{ApiError, BulkError};

/// Knobs for the controller, usually taken from the `[bulk]` config section.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub bulk_delay: Duration,
    pub duplicate_delay: Duration,
    pub min_selection: usize,
    /// Re-sync the list from the backend after a failed batch is rolled back.
    pub reconcile_on_failure: bool,
    pub include_archived: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            bulk_delay: DEFAULT_BULK_DELAY,
            duplicate_delay: DEFAULT_DUPLICATE_DELAY,
            min_selection: DEFAULT_MIN_SELECTION,
            reconcile_on_failure: false,
            include_archived: false,
        }
    }
}

/// Drives a [`CampaignBoard`] through backend operations.
pub struct BoardController<A: CampaignApi> {
    api: Arc<A>,
    board: CampaignBoard,
    settings: ControllerSettings,
    listener: Arc<dyn ProgressListener>,
    cancel: Option<CancellationToken>,
}

impl<A: CampaignApi> BoardController<A> {
    pub fn new(api: Arc<A>, settings: ControllerSettings) -> Self {
        Self {
            api,
            board: CampaignBoard::new(settings.min_selection),
            settings,
            listener: Arc::new(SilentProgress),
            cancel: None,
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn ProgressListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn board(&self) -> &CampaignBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut CampaignBoard {
        &mut self.board
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    fn account_id(&self) -> Option<String> {
        self.board.account().map(|a| a.account_id.clone())
    }

    fn sequencer(&self, delay: Duration) -> Sequencer {
        let sequencer = Sequencer::new(delay);
        match &self.cancel {
            Some(token) => sequencer.with_cancellation(token.clone()),
            None => sequencer,
        }
    }

    // ── loading ─────────────────────────────────────────────────────────

    /// Fetch ad accounts, keep the active ones, and scope the board to the
    /// preferred account (or the first active one).
    pub async fn load_accounts(
        &mut self,
        preferred: Option<&str>,
    ) -> Result<Vec<AdAccount>, ApiError> {
        let accounts = active_accounts(self.api.list_accounts().await?);
        let selected = resolve_selected(&accounts, preferred).cloned();
        match &selected {
            Some(account) => debug!(account = %account.account_id, "account selected"),
            None => warn!("no active ad accounts available"),
        }
        self.board.set_account(selected);
        Ok(accounts)
    }

    /// Replace the list with the backend's view of the current account.
    pub async fn sync(&mut self) -> Result<usize, ApiError> {
        let account = self.account_id();
        match self
            .api
            .sync_campaigns(account.as_deref(), self.settings.include_archived)
            .await
        {
            Ok(campaigns) => {
                let count = campaigns.len();
                self.board.replace_campaigns(campaigns);
                debug!(count, "campaigns synced");
                Ok(count)
            }
            Err(err) => {
                self.board
                    .show_error(format!("Failed to load campaigns: {}", err));
                Err(err)
            }
        }
    }

    /// Best-effort re-sync. A failure leaves the current list in place.
    pub async fn reconcile(&mut self) -> bool {
        let account = self.account_id();
        match self
            .api
            .sync_campaigns(account.as_deref(), self.settings.include_archived)
            .await
        {
            Ok(campaigns) => {
                self.board.replace_campaigns(campaigns);
                info!("list reconciled with backend");
                true
            }
            Err(err) => {
                warn!(error = %err, "reconcile failed; keeping local list");
                false
            }
        }
    }

    /// Unread alert count for the header badge. Failures are swallowed.
    pub async fn unread_alerts(&self) -> Option<u64> {
        match self.api.unread_alert_count().await {
            Ok(count) => Some(count),
            Err(err) => {
                debug!(error = %err, "unread alert count unavailable");
                None
            }
        }
    }

    /// Ask the backend to refresh metrics from Meta for one campaign or
    /// for the whole account.
    pub async fn sync_metrics(
        &mut self,
        campaign_id: Option<&str>,
    ) -> Result<Vec<CampaignInsights>, ApiError> {
        let account = self.account_id();
        match self.api.sync_metrics(campaign_id, account.as_deref()).await {
            Ok(metrics) => {
                info!(count = metrics.len(), "metrics synced");
                Ok(metrics)
            }
            Err(err) => {
                self.board
                    .show_error(format!("Failed to sync metrics: {}", err));
                Err(err)
            }
        }
    }

    // ── single-item actions ─────────────────────────────────────────────

    pub async fn set_status(&mut self, id: &str, status: CampaignStatus) -> Result<(), ApiError> {
        let snapshot = self.board.snapshot();
        self.board.dismiss_error();
        self.board.set_status(id, status);

        match self.api.update_status(id, status).await {
            Ok(updated) => {
                info!(id, status = %updated.status, "campaign status updated");
                Ok(())
            }
            Err(err) => {
                self.board.restore(snapshot);
                self.board
                    .show_error(format!("Failed to update campaign status: {}", err));
                warn!(id, error = %err, "status update failed, rolled back");
                Err(err)
            }
        }
    }

    /// Flip ACTIVE ↔ PAUSED. Returns the new status.
    pub async fn toggle_status(&mut self, id: &str) -> Result<CampaignStatus, ApiError> {
        let current = match self.board.campaign(id) {
            Some(campaign) => campaign.status,
            None => self.api.get_campaign(id).await?.status,
        };
        let next = current
            .toggled()
            .ok_or_else(|| ApiError::UnsupportedStatus(current.to_string()))?;
        self.set_status(id, next).await?;
        Ok(next)
    }

    /// Archive one campaign. It leaves the list immediately.
    pub async fn archive(&mut self, id: &str) -> Result<String, ApiError> {
        let snapshot = self.board.snapshot();
        self.board.dismiss_error();
        self.board.remove(id);

        match self.api.archive(id).await {
            Ok(message) => {
                info!(id, "campaign archived");
                Ok(message)
            }
            Err(err) => {
                self.board.restore(snapshot);
                self.board
                    .show_error(format!("Failed to archive campaign: {}", err));
                warn!(id, error = %err, "archive failed, rolled back");
                Err(err)
            }
        }
    }

    /// Create one copy of a campaign and put it at the top of the list.
    pub async fn duplicate(&mut self, id: &str) -> Result<usize, ApiError> {
        self.board.dismiss_error();
        let account = self.account_id();
        match self.api.duplicate(id, 1, account.as_deref()).await {
            Ok(created) => {
                let count = created.len();
                self.board.prepend(created);
                info!(id, count, "campaign duplicated");
                Ok(count)
            }
            Err(err) => {
                self.board
                    .show_error(format!("Failed to duplicate campaign: {}", err));
                Err(err)
            }
        }
    }

    /// Create a campaign and put it at the top of the list.
    ///
    /// The id only exists once the backend answers, so nothing is shown
    /// before the request succeeds.
    pub async fn create(&mut self, new: &NewCampaign) -> Result<Campaign, ApiError> {
        self.board.dismiss_error();
        let account = self.account_id();
        match self.api.create_campaign(new, account.as_deref()).await {
            Ok(mut created) => {
                // The backend echoes the budget in major units.
                if let Some(minor) = new.daily_budget_minor() {
                    created.daily_budget = Some(minor);
                }
                self.board.prepend(vec![created.clone()]);
                info!(id = %created.id, "campaign created");
                Ok(created)
            }
            Err(err) => {
                self.board
                    .show_error(format!("Failed to create campaign: {}", err));
                warn!(name = %new.name, error = %err, "campaign creation failed");
                Err(err)
            }
        }
    }

    /// Create `count` copies of one campaign, one request per copy, paced
    /// by the duplicate delay. A failure restores the list as it was before
    /// the first copy.
    pub async fn duplicate_copies(&mut self, id: &str, count: u32) -> Result<usize, BulkError> {
        let copies: Vec<String> = (0..count).map(|_| id.to_string()).collect();
        let snapshot = self.board.snapshot();
        self.board.dismiss_error();
        *self.board.progress_mut() = BulkProgress::start(copies.len(), BulkAction::Duplicate.label());
        self.listener.started(self.board.progress());

        let sequencer = self.sequencer(self.settings.duplicate_delay);
        let api = Arc::clone(&self.api);
        let account = self.account_id();
        let op = move |source: &String| {
            let api = Arc::clone(&api);
            let source = source.clone();
            let account = account.clone();
            async move {
                execute(api.as_ref(), BulkAction::Duplicate, &source, account.as_deref()).await
            }
        };

        let mut observer = BoardObserver {
            board: &mut self.board,
            listener: self.listener.as_ref(),
        };
        let result = sequencer.run(&copies, op, &mut observer).await;

        self.board.progress_mut().reset();
        match result {
            Ok(done) => {
                self.listener.finished(true);
                info!(id, copies = done, "campaign copies created");
                Ok(done)
            }
            Err(err) => {
                self.board.restore(snapshot);
                self.board
                    .show_error(format!("Failed to duplicate campaign: {}", err));
                self.listener.finished(false);
                warn!(id, error = %err, "duplicate copies failed, rolled back");
                Err(err)
            }
        }
    }

    // ── bulk ────────────────────────────────────────────────────────────

    /// Run the confirmed bulk action over the selection.
    ///
    /// Each item's effect lands on the list as soon as its request succeeds.
    /// On the first failure the batch stops, the list is restored to its
    /// pre-batch snapshot (except for duplicates), and the banner shows the
    /// error. The selection survives a failure so the user can retry.
    pub async fn run_bulk(&mut self) -> Result<usize, BulkError> {
        let (action, ids) = self.board.begin_running()?;
        let snapshot = self.board.snapshot();
        info!(action = action.verb(), count = ids.len(), "bulk action started");
        self.listener.started(self.board.progress());

        let sequencer = self.sequencer(
            action.delay(self.settings.bulk_delay, self.settings.duplicate_delay),
        );
        let api = Arc::clone(&self.api);
        let account = self.account_id();
        let op = move |id: &String| {
            let api = Arc::clone(&api);
            let id = id.clone();
            let account = account.clone();
            async move { execute(api.as_ref(), action, &id, account.as_deref()).await }
        };

        let mut observer = BoardObserver {
            board: &mut self.board,
            listener: self.listener.as_ref(),
        };
        let result = sequencer.run(&ids, op, &mut observer).await;

        match result {
            Ok(done) => {
                self.board.finish_running(true);
                self.listener.finished(true);
                info!(action = action.verb(), done, "bulk action finished");
                Ok(done)
            }
            Err(err) => {
                if action.restores_snapshot_on_failure() {
                    self.board.restore(snapshot);
                }
                self.board
                    .show_error(format!("Failed to {} campaigns: {}", action.verb(), err));
                self.board.finish_running(false);
                self.listener.finished(false);
                warn!(action = action.verb(), error = %err, "bulk action failed");

                if self.settings.reconcile_on_failure {
                    self.reconcile().await;
                }
                Err(err)
            }
        }
    }
}

/// Issue the request for one item of a batch and describe its local effect.
async fn execute<A: CampaignApi + ?Sized>(
    api: &A,
    action: BulkAction,
    id: &str,
    account: Option<&str>,
) -> Result<ItemEffect, ApiError> {
    match action {
        BulkAction::Pause | BulkAction::Activate => {
            let status = action
                .target_status()
                .ok_or_else(|| ApiError::UnsupportedStatus(action.to_string()))?;
            api.update_status(id, status).await?;
            Ok(ItemEffect::SetStatus(status))
        }
        BulkAction::Archive => {
            api.archive(id).await?;
            Ok(ItemEffect::Remove)
        }
        BulkAction::Duplicate => {
            let created = api.duplicate(id, 1, account).await?;
            Ok(ItemEffect::Prepend(created))
        }
    }
}

struct BoardObserver<'a> {
    board: &'a mut CampaignBoard,
    listener: &'a dyn ProgressListener,
}

impl SequenceObserver<String, ItemEffect> for BoardObserver<'_> {
    fn on_success(&mut self, item: &String, effect: ItemEffect) {
        if !self.board.apply(item, effect) {
            debug!(%item, "item not in local list");
        }
    }

    fn on_progress(&mut self, step: Step) {
        self.board.progress_mut().set_current(step.current);
        self.listener.advanced(self.board.progress());
    }
}
