//! adctl: campaign management for Meta ad accounts.
//!
//! The library holds the client-side orchestration core: a rate-limited
//! sequencer for bulk actions, an optimistic campaign board with snapshot
//! rollback, and the HTTP client for the campaign backend. The `adctl`
//! binary is a terminal front end over it.

pub mod account;
pub mod api;
pub mod board;
pub mod bulk;
pub mod campaign;
pub mod config;
pub mod details;
pub mod errors;
pub mod logging;
pub mod ui;

pub use errors::{ApiError, BulkError};
