//! Wallet interface for the querypay channel protocol.
//!
//! The wallet is the component that holds keys and channel history. The
//! channel core drives it through the [`Wallet`] trait, so production code
//! can plug in a real signing wallet while tests use a deterministic mock.
//!
//! # Architecture
//!
//! ```text
//! querypay-ops                querypay-wallet
//! ┌──────────────────┐       ┌───────────────────────┐
//! │ ChannelManager   │ ────► │ Wallet (trait)        │
//! │  lifecycle       │       │   push_message        │
//! │  settlement      │       │   join_channel        │
//! └──────────────────┘       │   update_channel_...  │
//!                            │   get_state           │
//!                            └───────────────────────┘
//! ```

mod error;
mod traits;
mod types;

pub use error::{WalletError, WalletResult};
pub use traits::Wallet;
pub use types::{FundingRequest, PushMessageResult, UpdateChannelRequest, WalletOutput};
