//! Cache Module
//!
//! Provides in-memory memoization with per-entry TTL expiration.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, MAX_TTL};
pub use key::generate_key;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// TTL used when none is configured (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;
