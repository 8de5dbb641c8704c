pub mod io;
pub mod listing;
pub mod stamp;

pub use listing::read_entries;
