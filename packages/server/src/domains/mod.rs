// Domain modules

pub mod auth;
pub mod listings;
pub mod member;
pub mod posts;
