//! Typed ID definitions for all domain entities.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::common::{ListingId, MemberId, PostId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let listing_id: ListingId = ListingId::from_i64(1);
//! let post_id: PostId = PostId::from_i64(1);
//!
//! // This would be a compile error:
//! // let wrong: PostId = listing_id;
//! ```

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Listing entities (server and client directory entries).
pub struct Listing;

/// Marker type for BlogPost entities.
pub struct BlogPost;

/// Marker type for Member entities (users).
pub struct Member;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Listing entities.
pub type ListingId = Id<Listing>;

/// Typed ID for BlogPost entities.
pub type PostId = Id<BlogPost>;

/// Typed ID for Member entities.
pub type MemberId = Id<Member>;
