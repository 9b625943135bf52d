//! In-memory state behind the campaigns screen.
//!
//! One [`CampaignBoard`] owns the campaign list, the selection set, the
//! bulk progress record, the error banner and the bulk-action phase. It is
//! mutated only by its owner; nothing here talks to the network.

use crate::account::AdAccount;
use crate::bulk::{BulkAction, BulkProgress, ItemEffect};
use crate::campaign::{Campaign, CampaignFilter, CampaignStatus};
use crate::errors::BulkError;

/// Minimum selection size that shows the bulk-action bar.
pub const DEFAULT_MIN_SELECTION: usize = 2;

/// Where the bulk-action flow currently stands.
///
/// `Idle → Selecting → Confirming → Running → Idle/Selecting`. Declining
/// the confirmation returns to `Selecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkPhase {
    Idle,
    Selecting,
    Confirming(BulkAction),
    Running(BulkAction),
}

/// Ordered set of selected campaign ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Add an id at the end. Returns `false` if it was already selected.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Snapshot of the list taken before an optimistic mutation.
#[derive(Debug, Clone)]
pub struct Snapshot(Vec<Campaign>);

impl Snapshot {
    pub fn campaigns(&self) -> &[Campaign] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct CampaignBoard {
    campaigns: Vec<Campaign>,
    selection: Selection,
    progress: BulkProgress,
    phase: BulkPhase,
    banner: Option<String>,
    account: Option<AdAccount>,
    min_selection: usize,
}

impl CampaignBoard {
    pub fn new(min_selection: usize) -> Self {
        Self {
            campaigns: Vec::new(),
            selection: Selection::default(),
            progress: BulkProgress::default(),
            phase: BulkPhase::Idle,
            banner: None,
            account: None,
            min_selection: min_selection.max(1),
        }
    }

    pub fn with_campaigns(campaigns: Vec<Campaign>) -> Self {
        Self {
            campaigns,
            ..Self::default()
        }
    }

    // ── list ────────────────────────────────────────────────────────────

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn campaign(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn filtered(&self, filter: &CampaignFilter) -> Vec<&Campaign> {
        filter.apply(&self.campaigns)
    }

    /// Replace the whole list with fresh backend data. Selected ids that no
    /// longer exist are dropped from the selection.
    pub fn replace_campaigns(&mut self, campaigns: Vec<Campaign>) {
        self.campaigns = campaigns;
        let existing: Vec<String> = self
            .selection
            .ids()
            .iter()
            .filter(|id| self.campaigns.iter().any(|c| &c.id == *id))
            .cloned()
            .collect();
        self.selection = Selection { ids: existing };
        self.refresh_selection_phase();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.campaigns.clone())
    }

    /// Put the list back exactly as it was when `snapshot` was taken.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.campaigns = snapshot.0;
    }

    /// Apply one item's local effect. Returns `false` when the id is not
    /// in the list (nothing to change).
    pub fn apply(&mut self, id: &str, effect: ItemEffect) -> bool {
        match effect {
            ItemEffect::SetStatus(status) => self.set_status(id, status),
            ItemEffect::Remove => self.remove(id),
            ItemEffect::Prepend(created) => {
                let added = !created.is_empty();
                self.prepend(created);
                added
            }
        }
    }

    pub fn set_status(&mut self, id: &str, status: CampaignStatus) -> bool {
        match self.campaigns.iter_mut().find(|c| c.id == id) {
            Some(campaign) => {
                campaign.status = status;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.campaigns.len();
        self.campaigns.retain(|c| c.id != id);
        self.campaigns.len() != before
    }

    /// Insert campaigns at the front, keeping their relative order.
    pub fn prepend(&mut self, created: Vec<Campaign>) {
        self.campaigns.splice(0..0, created);
    }

    // ── selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn min_selection(&self) -> usize {
        self.min_selection
    }

    /// Select a campaign that is in the list. Ignored while a bulk action is
    /// confirming or running.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.controls_enabled() || self.campaign(id).is_none() {
            return false;
        }
        let inserted = self.selection.insert(id);
        self.refresh_selection_phase();
        inserted
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        let removed = self.selection.remove(id);
        self.refresh_selection_phase();
        removed
    }

    /// Whether the bulk-action bar is shown.
    pub fn bulk_bar_visible(&self) -> bool {
        self.selection.len() >= self.min_selection
    }

    // ── bulk phase ──────────────────────────────────────────────────────

    pub fn phase(&self) -> BulkPhase {
        self.phase
    }

    /// Bulk and row controls are disabled while a batch runs.
    pub fn controls_enabled(&self) -> bool {
        !matches!(
            self.phase,
            BulkPhase::Running(_) | BulkPhase::Confirming(_)
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, BulkPhase::Running(_))
    }

    /// Ask for confirmation of a bulk action on the current selection.
    pub fn request_bulk(&mut self, action: BulkAction) -> Result<(), BulkError> {
        match self.phase {
            BulkPhase::Running(_) => return Err(BulkError::AlreadyRunning),
            BulkPhase::Confirming(_) => {}
            BulkPhase::Idle | BulkPhase::Selecting => {
                if !self.bulk_bar_visible() {
                    return Err(BulkError::NotEnoughSelected {
                        selected: self.selection.len(),
                        min: self.min_selection,
                    });
                }
            }
        }
        self.phase = BulkPhase::Confirming(action);
        Ok(())
    }

    /// The user declined the confirmation.
    pub fn cancel_bulk(&mut self) {
        if matches!(self.phase, BulkPhase::Confirming(_)) {
            self.phase = BulkPhase::Idle;
            self.refresh_selection_phase();
        }
    }

    /// Move from `Confirming` to `Running` and start the progress record.
    /// Returns the confirmed action and the ids to process.
    pub(crate) fn begin_running(&mut self) -> Result<(BulkAction, Vec<String>), BulkError> {
        let action = match self.phase {
            BulkPhase::Confirming(action) => action,
            BulkPhase::Running(_) => return Err(BulkError::AlreadyRunning),
            BulkPhase::Idle | BulkPhase::Selecting => return Err(BulkError::NotConfirming),
        };
        let ids = self.selection.ids().to_vec();
        self.phase = BulkPhase::Running(action);
        self.banner = None;
        self.progress = BulkProgress::start(ids.len(), action.label());
        Ok((action, ids))
    }

    /// Leave `Running`. Always resets progress; clears the selection only
    /// when the batch succeeded.
    pub(crate) fn finish_running(&mut self, succeeded: bool) {
        self.progress.reset();
        if succeeded {
            self.selection.clear();
        }
        self.phase = BulkPhase::Idle;
        self.refresh_selection_phase();
    }

    fn refresh_selection_phase(&mut self) {
        if let BulkPhase::Idle | BulkPhase::Selecting = self.phase {
            self.phase = if self.bulk_bar_visible() {
                BulkPhase::Selecting
            } else {
                BulkPhase::Idle
            };
        }
    }

    // ── progress ────────────────────────────────────────────────────────

    pub fn progress(&self) -> &BulkProgress {
        &self.progress
    }

    pub(crate) fn progress_mut(&mut self) -> &mut BulkProgress {
        &mut self.progress
    }

    // ── banner ──────────────────────────────────────────────────────────

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.banner = None;
    }

    // ── account ─────────────────────────────────────────────────────────

    pub fn account(&self) -> Option<&AdAccount> {
        self.account.as_ref()
    }

    /// Switch account scope. The list belongs to the old account, so it is
    /// emptied along with the selection until the next sync.
    pub fn set_account(&mut self, account: Option<AdAccount>) {
        let changed = self.account.as_ref().map(|a| &a.account_id)
            != account.as_ref().map(|a| &a.account_id);
        self.account = account;
        if changed {
            self.campaigns.clear();
            self.selection.clear();
            self.refresh_selection_phase();
        }
    }

    pub fn currency(&self) -> &str {
        self.account.as_ref().map(|a| a.currency.as_str()).unwrap_or("")
    }
}

impl Default for CampaignBoard {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SELECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> CampaignBoard {
        CampaignBoard::with_campaigns(vec![
            Campaign::new("c1", "Black Friday", CampaignStatus::Active),
            Campaign::new("c2", "Leads", CampaignStatus::Active),
            Campaign::new("c3", "Awareness", CampaignStatus::Paused),
        ])
    }

    fn ids(board: &CampaignBoard) -> Vec<&str> {
        board.campaigns().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_selection_keeps_insertion_order_without_duplicates() {
        let mut b = board();
        assert!(b.select("c3"));
        assert!(b.select("c1"));
        assert!(!b.select("c3"));
        assert!(!b.select("missing"));
        assert_eq!(b.selection().ids(), &["c3".to_string(), "c1".to_string()]);
    }

    #[test]
    fn test_bulk_bar_needs_two_selected() {
        let mut b = board();
        b.select("c1");
        assert!(!b.bulk_bar_visible());
        assert_eq!(b.phase(), BulkPhase::Idle);
        b.select("c2");
        assert!(b.bulk_bar_visible());
        assert_eq!(b.phase(), BulkPhase::Selecting);
        b.deselect("c2");
        assert_eq!(b.phase(), BulkPhase::Idle);
    }

    #[test]
    fn test_request_bulk_rejects_small_selection() {
        let mut b = board();
        b.select("c1");
        let err = b.request_bulk(BulkAction::Pause).unwrap_err();
        assert!(matches!(
            err,
            BulkError::NotEnoughSelected { selected: 1, min: 2 }
        ));
    }

    #[test]
    fn test_confirm_cancel_returns_to_selecting() {
        let mut b = board();
        b.select("c1");
        b.select("c2");
        b.request_bulk(BulkAction::Archive).unwrap();
        assert_eq!(b.phase(), BulkPhase::Confirming(BulkAction::Archive));
        assert!(!b.controls_enabled());
        b.cancel_bulk();
        assert_eq!(b.phase(), BulkPhase::Selecting);
        assert_eq!(b.selection().len(), 2);
    }

    #[test]
    fn test_running_disables_controls_and_finish_resets_progress() {
        let mut b = board();
        b.select("c1");
        b.select("c2");
        b.request_bulk(BulkAction::Pause).unwrap();
        let (action, ids) = b.begin_running().unwrap();
        assert_eq!(action, BulkAction::Pause);
        assert_eq!(ids, vec!["c1".to_string(), "c2".to_string()]);
        assert!(b.is_running());
        assert_eq!(b.progress().total, 2);
        assert_eq!(b.progress().label, "Pausing");

        assert!(!b.select("c3"));
        assert!(matches!(
            b.request_bulk(BulkAction::Pause),
            Err(BulkError::AlreadyRunning)
        ));

        b.finish_running(false);
        assert_eq!(*b.progress(), BulkProgress::default());
        assert_eq!(b.selection().len(), 2);
        assert_eq!(b.phase(), BulkPhase::Selecting);

        b.request_bulk(BulkAction::Pause).unwrap();
        b.begin_running().unwrap();
        b.finish_running(true);
        assert!(b.selection().is_empty());
        assert_eq!(b.phase(), BulkPhase::Idle);
    }

    #[test]
    fn test_begin_running_requires_confirmation() {
        let mut b = board();
        assert!(matches!(b.begin_running(), Err(BulkError::NotConfirming)));
    }

    #[test]
    fn test_snapshot_restore_is_exact() {
        let mut b = board();
        let snap = b.snapshot();
        b.set_status("c1", CampaignStatus::Paused);
        b.remove("c2");
        b.prepend(vec![Campaign::new("c9", "Copy", CampaignStatus::Paused)]);
        assert_ne!(b.campaigns(), snap.campaigns());
        b.restore(snap.clone());
        assert_eq!(b.campaigns(), snap.campaigns());
    }

    #[test]
    fn test_apply_effects() {
        let mut b = board();
        assert!(b.apply("c1", ItemEffect::SetStatus(CampaignStatus::Paused)));
        assert_eq!(b.campaign("c1").unwrap().status, CampaignStatus::Paused);

        assert!(b.apply("c2", ItemEffect::Remove));
        assert_eq!(ids(&b), vec!["c1", "c3"]);

        assert!(b.apply(
            "c1",
            ItemEffect::Prepend(vec![
                Campaign::new("n1", "Copy 1", CampaignStatus::Paused),
                Campaign::new("n2", "Copy 2", CampaignStatus::Paused),
            ])
        ));
        assert_eq!(ids(&b), vec!["n1", "n2", "c1", "c3"]);

        assert!(!b.apply("missing", ItemEffect::Remove));
    }

    #[test]
    fn test_replace_campaigns_prunes_selection() {
        let mut b = board();
        b.select("c1");
        b.select("c2");
        b.replace_campaigns(vec![Campaign::new("c1", "Black Friday", CampaignStatus::Active)]);
        assert_eq!(b.selection().ids(), &["c1".to_string()]);
        assert_eq!(b.phase(), BulkPhase::Idle);
    }

    #[test]
    fn test_account_switch_clears_list() {
        let mut b = board();
        b.select("c1");
        b.set_account(Some(AdAccount {
            id: "act_1".into(),
            account_id: "1".into(),
            name: "Main".into(),
            currency: "BRL".into(),
            account_status: 1,
            amount_spent: "0".into(),
            business_name: None,
        }));
        assert!(b.campaigns().is_empty());
        assert!(b.selection().is_empty());
        assert_eq!(b.currency(), "BRL");
    }

    #[test]
    fn test_banner() {
        let mut b = board();
        assert!(b.banner().is_none());
        b.show_error("Failed to pause campaigns");
        assert_eq!(b.banner(), Some("Failed to pause campaigns"));
        b.dismiss_error();
        assert!(b.banner().is_none());
    }
}
