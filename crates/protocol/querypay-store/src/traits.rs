//! Storage traits.

use std::sync::Arc;

use querypay_types::{ChannelId, ChannelResult};

use crate::error::Result;

/// Process-local cache of the latest known channel results.
///
/// Entries are immutable snapshots: writers replace an entry wholesale and
/// readers share it through an `Arc`. Entries live as long as the cache.
pub trait ChannelCache: Send + Sync {
    /// Get the cached result for a channel.
    ///
    /// Returns `None` if the channel has not been cached.
    fn get(&self, channel_id: &ChannelId) -> Result<Option<Arc<ChannelResult>>>;

    /// Store a result under its own channel id, replacing any previous entry.
    ///
    /// Returns the shared snapshot now held by the cache.
    fn insert(&self, result: ChannelResult) -> Result<Arc<ChannelResult>>;

    /// Check if a channel is cached.
    fn contains(&self, channel_id: &ChannelId) -> Result<bool>;

    /// Number of cached channels.
    fn len(&self) -> Result<usize>;

    /// Whether the cache holds no channels.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Ids of all cached channels.
    fn channel_ids(&self) -> Result<Vec<ChannelId>>;
}
