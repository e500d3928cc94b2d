//! Usage policy gate for the VoiceNet ledger.
//!
//! Every synthesis request must pass through the gate before the ledger
//! records usage or accrues a royalty. The gate runs an ordered pipeline of
//! stages (commercial-use, then quota) and stops at the first denial, so
//! the reported violation always reflects the earliest failing check.
//!
//! # Quick Start
//!
//! ```rust
//! use vn_gate::{GateConfig, UsageGate, UsageRequest};
//! use vn_types::{AgentPolicy, VoiceId};
//!
//! let gate = UsageGate::with_default_stages(GateConfig::default());
//! let request = UsageRequest {
//!     voice_id: VoiceId::new(),
//!     requester_address: "0xabc".into(),
//!     commercial_use: false,
//!     text_length: 42,
//! };
//! let policy = AgentPolicy::new(false, 1, "personal use only");
//! let result = gate.evaluate(&request, &policy).unwrap();
//! assert!(result.is_admitted());
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

// Re-exports for convenience.
pub use config::GateConfig;
pub use error::GateError;
pub use gate::{GateResult, UsageGate, Verdict};
pub use stage::{
    GateContext, GateStage, PolicyViolation, StageDecision, StageResult, UsageRequest,
};
pub use stages::{CommercialUseStage, QuotaStage};
