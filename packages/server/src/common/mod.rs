// Shared building blocks used across domains and the HTTP layer

pub mod entity_ids;
pub mod id;
pub mod normalize;
pub mod pagination;
pub mod slug;

pub use entity_ids::*;
