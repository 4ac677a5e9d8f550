//! Channel state cache for the querypay channel protocol.
//!
//! The cache maps channel ids to the most recent channel result returned
//! by the wallet. It is owned by whoever drives the channels (usually a
//! `ChannelManager`) and never evicts entries.
//!
//! # Example
//!
//! ```
//! use querypay_store::{ChannelCache, MemoryChannelCache};
//!
//! let cache = MemoryChannelCache::with_capacity(16);
//! assert!(cache.is_empty().unwrap());
//! ```
//!
//! # Trait-Based Design
//!
//! [`ChannelCache`] is a trait so callers can swap in another backing
//! store. [`MemoryChannelCache`] is the default.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryChannelCache;
pub use traits::ChannelCache;
