//! Data structures for the querypay channel protocol.
//!
//! This crate provides the types shared by every querypay crate. It
//! contains no business logic, only type definitions with serialization
//! support.
//!
//! # Module Organization
//!
//! - [`enums`] - Channel status and query state types
//! - [`constants`] - Protocol constants (framing, setup turns)
//! - [`error`] - Protocol error codes
//! - [`channel`] - Channel constants, allocations, signed states, results
//! - [`query`] - Attestations and query app data
//!
//! # Example
//!
//! ```
//! use querypay_crypto::Address;
//! use querypay_types::{calculate_channel_id, ChannelConstants};
//!
//! let constants = ChannelConstants::new(
//!     1,
//!     vec![Address([1u8; 20]), Address([2u8; 20])],
//!     0,
//!     86_400,
//! );
//!
//! assert_eq!(calculate_channel_id(&constants), constants.channel_id());
//! ```

/// Crate version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod channel;
pub mod constants;
pub mod enums;
pub mod error;
pub mod query;

/// Token amount in the smallest unit.
pub type Amount = u64;

pub use channel::{
    calculate_channel_id, Allocation, AllocationItem, ChannelConstants, ChannelId, ChannelResult,
    SignedState, StateSignature,
};
pub use constants::*;
pub use enums::{ChannelStatus, QueryStateType};
pub use error::ErrorCode;
pub use query::{Attestation, QueryAppData};
