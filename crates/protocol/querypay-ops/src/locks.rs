//! Per-channel mutual exclusion.
//!
//! Every operation that resolves a channel, drives the wallet and updates
//! the cache holds the channel's lock for the whole sequence. Operations on
//! different channels never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use querypay_types::ChannelId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::{OpsError, OpsResult};

/// Lazily created async locks keyed by channel id.
///
/// Locks are never evicted. The async locks are not reentrant: code that
/// already holds a channel's guard must not lock it again.
#[derive(Debug, Default)]
pub struct ChannelLocks {
    locks: Mutex<HashMap<ChannelId, Arc<AsyncMutex<()>>>>,
}

impl ChannelLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a channel.
    pub async fn lock(&self, channel_id: &ChannelId) -> OpsResult<OwnedMutexGuard<()>> {
        let lock = self.lock_for(channel_id)?;
        Ok(lock.lock_owned().await)
    }

    /// Number of channels that have been locked at least once.
    pub fn len(&self) -> OpsResult<usize> {
        Ok(self.table()?.len())
    }

    /// Whether no channel has been locked yet.
    pub fn is_empty(&self) -> OpsResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock_for(&self, channel_id: &ChannelId) -> OpsResult<Arc<AsyncMutex<()>>> {
        let mut locks = self.table()?;
        Ok(Arc::clone(locks.entry(*channel_id).or_default()))
    }

    fn table(&self) -> OpsResult<MutexGuard<'_, HashMap<ChannelId, Arc<AsyncMutex<()>>>>> {
        self.locks
            .lock()
            .map_err(|_| OpsError::internal("channel lock table poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querypay_crypto::hash_with_domain;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_channel_serializes() {
        let locks = Arc::new(ChannelLocks::new());
        let id = hash_with_domain(0x10, b"a");

        let guard = locks.lock(&id).await.unwrap();
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move { locks.lock(&id).await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap().unwrap();
        assert_eq!(locks.len().unwrap(), 1);
    }

    #[test]
    fn test_empty_table() {
        let locks = ChannelLocks::new();
        assert!(locks.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_table_is_reported() {
        let locks = Arc::new(ChannelLocks::new());
        let poisoner = Arc::clone(&locks);
        let _ = std::thread::spawn(move || {
            let _table = poisoner.locks.lock().unwrap();
            panic!("poison the lock table");
        })
        .join();

        assert!(matches!(locks.len(), Err(OpsError::Internal(_))));
        assert!(matches!(locks.is_empty(), Err(OpsError::Internal(_))));
    }

    #[tokio::test]
    async fn test_distinct_channels_independent() {
        let locks = ChannelLocks::new();
        let a = hash_with_domain(0x10, b"a");
        let b = hash_with_domain(0x10, b"b");

        let _guard_a = locks.lock(&a).await.unwrap();
        let guard_b = tokio::time::timeout(Duration::from_millis(100), locks.lock(&b)).await;
        assert!(guard_b.is_ok());
        assert_eq!(locks.len().unwrap(), 2);
    }
}
