//! Query payment accounting for the querypay channel protocol.
//!
//! This crate computes the next application state of a query channel
//! when the provider answers or declines a query:
//!
//! - [`StateTransition`]: the pure transition seam the channel core calls
//! - [`AttestationTransition`]: the default micropayment accounting
//!
//! # Example
//!
//! ```
//! use querypay_crypto::Address;
//! use querypay_econ::{encode_app_data, AttestationTransition, StateTransition, TransitionRequest};
//! use querypay_types::{Allocation, AllocationItem, Attestation, QueryAppData};
//!
//! let app_data = encode_app_data(&QueryAppData::requested("QmRequest", 10)).unwrap();
//! let allocation = Allocation::new(
//!     Address::default(),
//!     vec![
//!         AllocationItem::new(Address([1u8; 20]), 100),
//!         AllocationItem::new(Address([2u8; 20]), 0),
//!     ],
//! );
//!
//! let next = AttestationTransition::new()
//!     .compute_next_state(
//!         &app_data,
//!         &[allocation],
//!         &TransitionRequest::attest(Attestation::new("Qm123", "0xabc")),
//!     )
//!     .unwrap();
//! assert_eq!(next.allocation.items[1].amount, 10);
//! ```

pub mod attestation;
pub mod error;
pub mod transition;

pub use attestation::{
    decode_app_data, encode_app_data, AttestationTransition, PAYER_INDEX, PROVIDER_INDEX,
};
pub use error::{EconError, EconResult};
pub use transition::{NextState, StateTransition, TransitionRequest};
