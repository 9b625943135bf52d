use std::time::Duration;

use crate::campaign::{Campaign, CampaignStatus};

/// Operations that can be applied to a multi-campaign selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Pause,
    Activate,
    Archive,
    Duplicate,
}

impl BulkAction {
    /// Progress label shown while the batch runs.
    pub fn label(self) -> &'static str {
        match self {
            BulkAction::Pause => "Pausing",
            BulkAction::Activate => "Activating",
            BulkAction::Archive => "Archiving",
            BulkAction::Duplicate => "Duplicating",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            BulkAction::Pause => "pause",
            BulkAction::Activate => "activate",
            BulkAction::Archive => "archive",
            BulkAction::Duplicate => "duplicate",
        }
    }

    /// Gap between consecutive requests for this action.
    pub fn delay(self, bulk_delay: Duration, duplicate_delay: Duration) -> Duration {
        match self {
            BulkAction::Duplicate => duplicate_delay,
            _ => bulk_delay,
        }
    }

    /// Whether a mid-batch failure restores the pre-batch list.
    ///
    /// Duplicates are independent new objects, so copies already prepended
    /// stay in the list when a later item fails.
    pub fn restores_snapshot_on_failure(self) -> bool {
        !matches!(self, BulkAction::Duplicate)
    }

    pub fn target_status(self) -> Option<CampaignStatus> {
        match self {
            BulkAction::Pause => Some(CampaignStatus::Paused),
            BulkAction::Activate => Some(CampaignStatus::Active),
            BulkAction::Archive | BulkAction::Duplicate => None,
        }
    }
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

impl std::str::FromStr for BulkAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pause" => Ok(BulkAction::Pause),
            "activate" => Ok(BulkAction::Activate),
            "archive" | "delete" => Ok(BulkAction::Archive),
            "duplicate" => Ok(BulkAction::Duplicate),
            _ => anyhow::bail!(
                "Invalid bulk action '{}'. Valid values: pause, activate, archive, duplicate",
                s
            ),
        }
    }
}

/// Local change applied to the list once one item's request succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEffect {
    /// Set the item's status in place.
    SetStatus(CampaignStatus),
    /// Drop the item from the list.
    Remove,
    /// Put newly created campaigns at the front of the list.
    Prepend(Vec<Campaign>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("PAUSE".parse::<BulkAction>().unwrap(), BulkAction::Pause);
        assert_eq!("delete".parse::<BulkAction>().unwrap(), BulkAction::Archive);
        assert!("explode".parse::<BulkAction>().is_err());
    }

    #[test]
    fn test_duplicate_uses_its_own_delay() {
        let bulk = Duration::from_millis(500);
        let dup = Duration::from_millis(300);
        assert_eq!(BulkAction::Pause.delay(bulk, dup), bulk);
        assert_eq!(BulkAction::Archive.delay(bulk, dup), bulk);
        assert_eq!(BulkAction::Duplicate.delay(bulk, dup), dup);
    }

    #[test]
    fn test_only_duplicate_keeps_partial_results() {
        assert!(BulkAction::Pause.restores_snapshot_on_failure());
        assert!(BulkAction::Activate.restores_snapshot_on_failure());
        assert!(BulkAction::Archive.restores_snapshot_on_failure());
        assert!(!BulkAction::Duplicate.restores_snapshot_on_failure());
    }

    #[test]
    fn test_target_status() {
        assert_eq!(
            BulkAction::Pause.target_status(),
            Some(CampaignStatus::Paused)
        );
        assert_eq!(
            BulkAction::Activate.target_status(),
            Some(CampaignStatus::Active)
        );
        assert_eq!(BulkAction::Archive.target_status(), None);
    }
}
