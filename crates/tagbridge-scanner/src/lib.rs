pub mod config;
pub mod tree_scanner;
pub mod walker;

pub use config::ScannerConfig;
pub use tree_scanner::TreeScanner;
pub use walker::{ListingSource, LocalListing, RemoteListing, WalkConfig, WalkItem, walk};
