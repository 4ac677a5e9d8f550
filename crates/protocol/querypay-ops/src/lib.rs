//! Channel operations for the querypay channel protocol.
//!
//! This crate is the provider-side orchestration layer. It combines the
//! wallet, the query transition and the channel cache to drive query
//! channels through their lifecycle and settle queries on them.
//!
//! # Module Organization
//!
//! - [`error`] - Operation error types
//! - [`config`] - Operations configuration
//! - [`locks`] - Per-channel async locks
//! - [`manager`] - The `ChannelManager` and its cache access
//! - [`lifecycle`] - Inbound message handling (join, fund, close)
//! - [`settlement`] - Query attestation and decline
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use querypay_ops::DefaultChannelManager;
//! use querypay_types::Attestation;
//!
//! let manager = DefaultChannelManager::new(Arc::new(wallet));
//!
//! // A payer proposed a channel; reply with the setup states
//! if let Some(reply) = manager.handle_inbound_message(&proposal).await? {
//!     transport.send(reply).await?;
//! }
//!
//! // Later, answer a query on the running channel
//! let update = manager
//!     .provide_attestation(&channel_id, Attestation::new("Qm123", "0xabc"))
//!     .await?;
//! transport.send(update).await?;
//! ```
//!
//! # Concurrency
//!
//! Every operation that reads and then mutates a channel holds that
//! channel's lock for the whole sequence. Operations on different channels
//! run in parallel. Nothing is retried internally; wallet failures reach
//! the caller, who can consult [`OpsError::is_transient`].

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod locks;
pub mod manager;
pub mod settlement;

// Error types
pub use error::{OpsError, OpsResult};

// Configuration
pub use config::{OpsConfig, DEFAULT_CACHE_CAPACITY};

// Manager
pub use lifecycle::ProtocolTransition;
pub use locks::ChannelLocks;
pub use manager::{ChannelManager, DefaultChannelManager};
