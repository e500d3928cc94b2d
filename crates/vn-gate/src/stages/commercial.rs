use crate::error::GateError;
use crate::stage::{GateContext, GateStage, PolicyViolation, StageDecision, UsageRequest};

/// Commercial-use permission stage.
///
/// Denies commercial requests against a policy that does not allow them.
/// Non-commercial requests always pass, regardless of the policy flag.
pub struct CommercialUseStage;

impl GateStage for CommercialUseStage {
    fn name(&self) -> &str {
        "commercial-use"
    }

    fn evaluate(
        &self,
        request: &UsageRequest,
        context: &GateContext,
    ) -> Result<StageDecision, GateError> {
        if request.commercial_use && !context.policy.commercial_use_allowed {
            return Ok(StageDecision::Deny(PolicyViolation::CommercialUseDenied));
        }
        Ok(StageDecision::Pass)
    }
}
