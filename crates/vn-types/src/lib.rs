//! Entity model for the VoiceNet ledger.
//!
//! This crate provides the record types persisted by the store and
//! manipulated by ledger operations. Every other VoiceNet crate depends on
//! `vn-types`. Types carry shape only: cross-field rules (the voice/DAT
//! pairing, quota checks) are enforced by the ledger.
//!
//! # Key Types
//!
//! - [`VoiceAsset`]: A minted voice together with its usage policy
//! - [`DatToken`]: The Data Anchoring Token paired 1:1 with a voice
//! - [`AgentPolicy`]: Commercial-use permission and usage quota
//! - [`RoyaltyEvent`]: Immutable record of tokens accrued by one synthesis
//! - [`TokenAmount`]: Fixed-point token amount with four decimal places
//! - [`Timestamp`]: Milliseconds since the UNIX epoch

pub mod amount;
pub mod asset;
pub mod error;
pub mod id;
pub mod policy;
pub mod royalty;
pub mod temporal;

pub use amount::TokenAmount;
pub use asset::{DatMetadata, DatToken, SampleRef, VoiceAsset, VoiceMetadata};
pub use error::TypeError;
pub use id::{ChallengeId, DatId, RoyaltyId, VoiceId};
pub use policy::AgentPolicy;
pub use royalty::RoyaltyEvent;
pub use temporal::Timestamp;
