// Listings domain - directory entries, resolution, moderation

pub mod models;
pub mod moderation;
pub mod resolver;
