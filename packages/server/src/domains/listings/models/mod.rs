pub mod listing;

pub use listing::*;
