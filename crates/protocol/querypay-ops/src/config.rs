//! Configuration types for the operations layer.

/// Default number of channels the cache is pre-sized for.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Configuration for channel operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsConfig {
    /// Number of channels the in-memory cache is pre-sized for.
    pub initial_cache_capacity: usize,
    /// Use the wallet's post-fund state directly when a joined channel
    /// holds no funds.
    ///
    /// When false, every join goes through an explicit funding call.
    pub zero_value_shortcut: bool,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            initial_cache_capacity: DEFAULT_CACHE_CAPACITY,
            zero_value_shortcut: true,
        }
    }
}

impl OpsConfig {
    /// Set the initial cache capacity.
    pub fn with_initial_cache_capacity(mut self, capacity: usize) -> Self {
        self.initial_cache_capacity = capacity;
        self
    }

    /// Enable or disable the zero-value funding shortcut.
    pub fn with_zero_value_shortcut(mut self, enabled: bool) -> Self {
        self.zero_value_shortcut = enabled;
        self
    }
}
