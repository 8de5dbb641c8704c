pub mod audio_format;
pub mod device;
pub mod directory;
pub mod rating;
pub mod record;
pub mod sync;

pub use audio_format::AudioFormat;
pub use device::{DeviceEvent, DeviceSession};
pub use directory::{DirEntry, DirectoryNode, compare_names, sort_entries, sort_nodes};
pub use rating::Rating;
pub use record::FileRecord;
pub use sync::{RunPhase, SyncDirection, SyncPair, SyncPhase, SyncPreview, SyncRunProgress};
