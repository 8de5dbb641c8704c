pub mod events;
pub mod progress;
pub mod scanner;
pub mod tag_codec;
pub mod transport;

pub use events::DeviceEvents;
pub use progress::{ChannelReporter, NoopReporter, ProgressReporter};
pub use scanner::{DirectoryScanner, ScanError, ScanReport, Side};
pub use tag_codec::{TagCodec, TagPatch};
pub use transport::{DeviceDiscovery, DeviceTransport};
