//! The campaigns screen: list state, selection, bulk phase and the
//! controller that runs optimistic mutations against the backend.

pub mod controller;
pub mod state;

pub use controller::{BoardController, ControllerSettings};
pub use state::{BulkPhase, CampaignBoard, DEFAULT_MIN_SELECTION, Selection, Snapshot};
