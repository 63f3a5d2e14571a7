// MCP Directory - API and page server
//
// Users browse and submit server/client listings for the protocol, admins
// moderate submissions, and a small blog publishes articles. Storage is
// PostgreSQL; identity comes from a hosted OAuth provider whose tokens are
// verified here.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
