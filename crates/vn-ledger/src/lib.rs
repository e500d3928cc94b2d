//! Asset and royalty ledger for VoiceNet.
//!
//! This crate is the heart of VoiceNet. It provides:
//! - Minting a voice together with its paired Data Anchoring Token (DAT)
//! - Policy-gated synthesis that counts usage and accrues a royalty
//! - The royalty formula, in exact fixed-point arithmetic
//! - Read projections (listings, owner portfolio) and a pairing validator
//! - In-memory voice challenges scored by text similarity
//!
//! # Quick Start
//!
//! ```rust
//! use vn_ledger::{MintRequest, SynthesisRequest, VoiceLedger};
//! use vn_store::InMemoryCollectionStore;
//!
//! let ledger = VoiceLedger::new(InMemoryCollectionStore::new());
//! let minted = ledger
//!     .mint(MintRequest {
//!         owner_address: "0xowner".into(),
//!         title: "Narrator".into(),
//!         description: None,
//!         royalty_bps: 1_000,
//!         commercial_use_allowed: false,
//!         monthly_quota: 10,
//!         terms: "personal use".into(),
//!         sample: None,
//!     })
//!     .unwrap();
//!
//! let receipt = ledger
//!     .synthesize_with_policy(SynthesisRequest {
//!         voice_id: minted.voice.id,
//!         requester_address: "0xlistener".into(),
//!         text: "x".repeat(250),
//!         commercial_use: false,
//!     })
//!     .unwrap();
//! assert_eq!(receipt.royalty.amount_tokens.to_string(), "0.0600");
//! ```

pub mod challenge;
pub mod error;
pub mod ledger;
pub mod projection;
pub mod request;
pub mod royalty;
pub mod validation;

pub use challenge::{
    Challenge, ChallengeBook, ChallengeError, ChallengeOutcome, ChallengeResult,
    DEFAULT_THRESHOLD,
};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use ledger::{sync_policy, VoiceLedger};
pub use projection::{OwnerPortfolio, VoiceEarnings};
pub use request::{MintReceipt, MintRequest, SampleHandle, SynthesisReceipt, SynthesisRequest};
pub use royalty::{billable_units, compute_royalty};
pub use validation::{PairingValidator, ValidationReport, Violation, ViolationKind};
