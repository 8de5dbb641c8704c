pub mod codec;
pub mod error;
pub mod popm;
pub mod tag_keys;

pub use codec::LoftyTagCodec;
pub use error::TagReadError;
