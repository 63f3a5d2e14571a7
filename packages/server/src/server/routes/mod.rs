// HTTP routes
pub mod admin;
pub mod auth_pages;
pub mod blog;
pub mod health;
pub mod listings;
pub mod seo;
pub mod static_files;

pub use health::*;
