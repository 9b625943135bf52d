//! Terminal rendering for the campaigns screen.

pub mod banner;
pub mod icons;
pub mod progress;
pub mod table;

pub use banner::{print_banner, render_banner};
pub use progress::BulkProgressUI;
pub use table::{
    render_accounts, render_campaign, render_campaigns, render_details, render_insights,
    render_metrics,
};
