pub mod matcher;
pub mod orchestrator;
pub mod staging;

pub use matcher::{classify, match_records};
pub use orchestrator::{PendingSync, Refreshed, SyncPlan, SyncReport, SyncService};
pub use staging::RemoteStaging;
