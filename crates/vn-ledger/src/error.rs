use vn_gate::{GateError, PolicyViolation};
use vn_store::StoreError;
use vn_types::{DatId, VoiceId};

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("voice not found: {0}")]
    VoiceNotFound(VoiceId),

    /// The voice exists but its paired DAT does not. Mint always writes
    /// both, so this means the persisted state is damaged.
    #[error("DAT {dat} not found for voice {voice}")]
    DatNotFound { voice: VoiceId, dat: DatId },

    #[error("policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    #[error("royalty bps {0} outside [0, 10000]")]
    InvalidRoyaltyBps(u32),

    #[error("store write failed: {0}")]
    StoreWriteFailed(#[from] StoreError),

    #[error("gate error: {0}")]
    Gate(#[from] GateError),
}

/// Coarse classification of [`LedgerError`] for callers that only need to
/// know how to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PolicyViolation,
    Persistence,
    InvalidInput,
    Internal,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VoiceNotFound(_) | Self::DatNotFound { .. } => ErrorKind::NotFound,
            Self::Policy(_) => ErrorKind::PolicyViolation,
            Self::StoreWriteFailed(_) => ErrorKind::Persistence,
            Self::InvalidRoyaltyBps(_) => ErrorKind::InvalidInput,
            Self::Gate(_) => ErrorKind::Internal,
        }
    }

    /// Returns `true` for commercial-use and quota denials.
    pub fn is_policy_violation(&self) -> bool {
        self.kind() == ErrorKind::PolicyViolation
    }

    /// The policy violation, if this error is one.
    pub fn violation(&self) -> Option<&PolicyViolation> {
        match self {
            Self::Policy(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
