//! Bulk execution primitives: the sequencer, the actions it runs, and the
//! progress record the UI renders.

pub mod action;
pub mod progress;
pub mod sequencer;

pub use action::{BulkAction, ItemEffect};
pub use progress::{BulkProgress, ProgressListener, SilentProgress};
pub use sequencer::{
    DEFAULT_BULK_DELAY, DEFAULT_DUPLICATE_DELAY, SequenceObserver, Sequencer, Step,
};
