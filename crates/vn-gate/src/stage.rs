use std::time::Duration;

use vn_types::{AgentPolicy, VoiceId};

use crate::error::GateError;

// ---------------------------------------------------------------------------
// UsageRequest
// ---------------------------------------------------------------------------

/// A request to use a voice, evaluated by the gate pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageRequest {
    /// The voice being used.
    pub voice_id: VoiceId,
    /// Who is asking.
    pub requester_address: String,
    /// Whether the output is for commercial use.
    pub commercial_use: bool,
    /// Length of the text to synthesize, in characters.
    pub text_length: u64,
}

// ---------------------------------------------------------------------------
// PolicyViolation
// ---------------------------------------------------------------------------

/// Why a usage request was denied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    /// Commercial use was requested but the policy forbids it.
    #[error("commercial use is not allowed by the DAT policy")]
    CommercialUseDenied,

    /// The quota for the current window is used up.
    #[error("monthly quota exceeded for this voice ({used}/{quota})")]
    QuotaExceeded { used: u32, quota: u32 },

    /// Denial from a stage added by the embedding application.
    #[error("denied by '{stage}': {reason}")]
    Custom { stage: String, reason: String },
}

impl PolicyViolation {
    /// Human-readable reason.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

// ---------------------------------------------------------------------------
// StageDecision / StageResult
// ---------------------------------------------------------------------------

/// What one stage decided about a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    Pass,
    Deny(PolicyViolation),
}

impl StageDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Trace entry for one stage that ran.
#[derive(Clone, Debug)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// Set only for denials.
    pub reason: Option<String>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// State shared by the stages of one evaluation.
pub struct GateContext {
    /// Policy of the voice being used, as persisted before this request.
    pub policy: AgentPolicy,
    /// Stages that already ran, in order.
    pub previous_stages: Vec<StageResult>,
}

impl GateContext {
    pub fn new(policy: AgentPolicy) -> Self {
        Self {
            policy,
            previous_stages: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// One check in the usage pipeline.
///
/// Implementations must not mutate anything: the ledger records usage only
/// after every stage has passed. Object-safe, so a gate holds its stages as
/// `Box<dyn GateStage>`.
pub trait GateStage: Send + Sync {
    /// Unique within a gate, e.g. `"quota"`.
    fn name(&self) -> &str;

    /// Decide on `request`. An `Err` means the stage could not decide.
    fn evaluate(
        &self,
        request: &UsageRequest,
        context: &GateContext,
    ) -> Result<StageDecision, GateError>;
}
