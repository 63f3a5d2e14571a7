// Auth domain - verification of hosted identity provider tokens

pub mod jwt;

pub use jwt::{Claims, JwtService};
