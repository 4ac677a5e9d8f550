//! The channel manager.
//!
//! `ChannelManager` owns everything the lifecycle controller and the
//! settlement layer share: the wallet handle, the transition function, the
//! channel cache and the per-channel locks. Its operations are split across
//! [`crate::lifecycle`] and [`crate::settlement`].

use std::sync::Arc;

use querypay_econ::{AttestationTransition, StateTransition};
use querypay_store::{ChannelCache, MemoryChannelCache};
use querypay_types::{ChannelId, ChannelResult};
use querypay_wallet::{Wallet, WalletError};
use tracing::debug;

use crate::config::OpsConfig;
use crate::error::{OpsError, OpsResult};
use crate::locks::ChannelLocks;

/// Drives query channels on behalf of the provider.
///
/// Generic over:
/// - `T`: the application state transition
/// - `C`: the channel cache
///
/// All operations take `&self`; share the manager across tasks with an
/// `Arc`. Operations on the same channel are serialized, operations on
/// different channels run concurrently.
pub struct ChannelManager<T = AttestationTransition, C = MemoryChannelCache>
where
    T: StateTransition,
    C: ChannelCache,
{
    /// The wallet that owns channel state.
    pub(crate) wallet: Arc<dyn Wallet>,
    /// Application state transition.
    pub(crate) transition: T,
    /// Latest known channel results.
    pub(crate) cache: C,
    /// Per-channel locks.
    pub(crate) locks: ChannelLocks,
    /// Operations configuration.
    pub(crate) config: OpsConfig,
}

/// Channel manager with the query attestation transition and in-memory cache.
pub type DefaultChannelManager = ChannelManager<AttestationTransition, MemoryChannelCache>;

impl DefaultChannelManager {
    /// Create a manager with default configuration.
    pub fn new(wallet: Arc<dyn Wallet>) -> Self {
        Self::with_config(wallet, OpsConfig::default())
    }

    /// Create a manager with the given configuration.
    pub fn with_config(wallet: Arc<dyn Wallet>, config: OpsConfig) -> Self {
        let cache = MemoryChannelCache::with_capacity(config.initial_cache_capacity);
        Self::with_components(wallet, AttestationTransition::new(), cache, config)
    }
}

impl<T, C> ChannelManager<T, C>
where
    T: StateTransition,
    C: ChannelCache,
{
    /// Create a manager from explicit components.
    pub fn with_components(
        wallet: Arc<dyn Wallet>,
        transition: T,
        cache: C,
        config: OpsConfig,
    ) -> Self {
        Self {
            wallet,
            transition,
            cache,
            locks: ChannelLocks::new(),
            config,
        }
    }

    /// Get the operations configuration.
    pub fn config(&self) -> &OpsConfig {
        &self.config
    }

    /// Get the channel cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Get the wallet.
    pub fn wallet(&self) -> &Arc<dyn Wallet> {
        &self.wallet
    }

    /// Get the latest known result for a channel.
    ///
    /// Served from the cache when possible; otherwise fetched from the
    /// wallet and cached.
    pub async fn get_channel_result(
        &self,
        channel_id: &ChannelId,
    ) -> OpsResult<Arc<ChannelResult>> {
        let _guard = self.locks.lock(channel_id).await?;
        self.resolve_channel(channel_id)
            .await?
            .ok_or(OpsError::ChannelNotFound(*channel_id))
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Resolve a channel from the cache, falling back to the wallet.
    ///
    /// Returns `None` if the wallet does not know the channel. Callers must
    /// hold the channel's lock.
    pub(crate) async fn resolve_channel(
        &self,
        channel_id: &ChannelId,
    ) -> OpsResult<Option<Arc<ChannelResult>>> {
        if let Some(cached) = self.cache.get(channel_id)? {
            debug!(channel_id = %channel_id, "Channel cache hit");
            return Ok(Some(cached));
        }

        debug!(channel_id = %channel_id, "Channel cache miss, fetching from wallet");
        let fetched = match self.wallet.get_state(channel_id).await {
            Ok(fetched) => fetched,
            Err(WalletError::ChannelNotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        match fetched {
            Some(result) => Ok(Some(self.cache_result(result)?)),
            None => Ok(None),
        }
    }

    /// Replace the cached result for a channel.
    pub(crate) fn cache_result(&self, result: ChannelResult) -> OpsResult<Arc<ChannelResult>> {
        Ok(self.cache.insert(result)?)
    }
}
