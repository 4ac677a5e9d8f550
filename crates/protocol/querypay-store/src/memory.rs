//! In-memory channel cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use querypay_types::{ChannelId, ChannelResult};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::ChannelCache;

/// `HashMap`-backed channel cache guarded by a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryChannelCache {
    entries: RwLock<HashMap<ChannelId, Arc<ChannelResult>>>,
}

impl MemoryChannelCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache pre-sized for `capacity` channels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }
}

impl ChannelCache for MemoryChannelCache {
    fn get(&self, channel_id: &ChannelId) -> Result<Option<Arc<ChannelResult>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::lock_poisoned("channel cache lock poisoned"))?;
        Ok(entries.get(channel_id).cloned())
    }

    fn insert(&self, result: ChannelResult) -> Result<Arc<ChannelResult>> {
        let channel_id = result.channel_id;
        let entry = Arc::new(result);
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::lock_poisoned("channel cache lock poisoned"))?;
        entries.insert(channel_id, Arc::clone(&entry));
        debug!(
            channel_id = %channel_id,
            status = %entry.status,
            turn_num = entry.turn_num,
            "Cached channel result"
        );
        Ok(entry)
    }

    fn contains(&self, channel_id: &ChannelId) -> Result<bool> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::lock_poisoned("channel cache lock poisoned"))?;
        Ok(entries.contains_key(channel_id))
    }

    fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::lock_poisoned("channel cache lock poisoned"))?;
        Ok(entries.len())
    }

    fn channel_ids(&self) -> Result<Vec<ChannelId>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::lock_poisoned("channel cache lock poisoned"))?;
        let mut ids: Vec<ChannelId> = entries.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
