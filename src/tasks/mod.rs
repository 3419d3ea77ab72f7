//! Background Tasks Module
//!
//! Timers that run for the lifetime of the process.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at configured intervals
//! - Analytics Flush: Sends queued events at configured intervals

mod cleanup;
mod flush;

pub use cleanup::spawn_cleanup_task;
pub use flush::spawn_flush_task;
