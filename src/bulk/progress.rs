use serde::Serialize;

/// Transient record of a running batch.
///
/// Created when a batch starts and reset to `{0, 0, ""}` when it ends,
/// whether it succeeded or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkProgress {
    pub current: usize,
    pub total: usize,
    pub label: String,
}

impl BulkProgress {
    pub fn start(total: usize, label: impl Into<String>) -> Self {
        Self {
            current: 0,
            total,
            label: label.into(),
        }
    }

    /// Record the position reported by the sequencer. Never moves past `total`.
    pub fn set_current(&mut self, current: usize) {
        self.current = current.min(self.total);
    }

    /// `current / total × 100`, rounded down. Zero when idle.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.current * 100) / self.total) as u8
    }

    pub fn is_active(&self) -> bool {
        self.total > 0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Receives progress updates while a batch runs.
///
/// The terminal progress bar implements this; the default methods let
/// listeners ignore the start and finish events.
pub trait ProgressListener: Send + Sync {
    fn started(&self, _progress: &BulkProgress) {}

    fn advanced(&self, progress: &BulkProgress);

    fn finished(&self, _succeeded: bool) {}
}

/// Listener that drops every update.
pub struct SilentProgress;

impl ProgressListener for SilentProgress {
    fn advanced(&self, _progress: &BulkProgress) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        let mut p = BulkProgress::start(4, "Pausing");
        assert_eq!(p.percent(), 0);
        p.set_current(1);
        assert_eq!(p.percent(), 25);
        p.set_current(3);
        assert_eq!(p.percent(), 75);
        p.set_current(4);
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn test_current_never_exceeds_total() {
        let mut p = BulkProgress::start(2, "Archiving");
        p.set_current(5);
        assert_eq!(p.current, 2);
    }

    #[test]
    fn test_reset_returns_to_zero_record() {
        let mut p = BulkProgress::start(3, "Duplicating");
        p.set_current(2);
        assert!(p.is_active());
        p.reset();
        assert_eq!(p, BulkProgress::default());
        assert_eq!((p.current, p.total, p.label.as_str()), (0, 0, ""));
        assert_eq!(p.percent(), 0);
    }

    #[test]
    fn test_listener_only_needs_advanced() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting(AtomicUsize);
        impl ProgressListener for Counting {
            fn advanced(&self, _progress: &BulkProgress) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let listener = Counting(AtomicUsize::new(0));
        let p = BulkProgress::start(1, "Pausing");
        listener.started(&p);
        listener.advanced(&p);
        listener.finished(true);
        assert_eq!(listener.0.load(Ordering::SeqCst), 1);
    }
}
