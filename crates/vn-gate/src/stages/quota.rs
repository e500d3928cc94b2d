use crate::error::GateError;
use crate::stage::{GateContext, GateStage, PolicyViolation, StageDecision, UsageRequest};

/// Usage quota stage.
///
/// Passes while the recorded usage is below the quota. The check runs
/// before the ledger increments the counter, so a quota of `n` admits
/// exactly `n` requests.
pub struct QuotaStage;

impl GateStage for QuotaStage {
    fn name(&self) -> &str {
        "quota"
    }

    fn evaluate(
        &self,
        _request: &UsageRequest,
        context: &GateContext,
    ) -> Result<StageDecision, GateError> {
        let policy = &context.policy;
        if policy.has_remaining_quota() {
            Ok(StageDecision::Pass)
        } else {
            Ok(StageDecision::Deny(PolicyViolation::QuotaExceeded {
                used: policy.usage_count_this_month,
                quota: policy.monthly_quota,
            }))
        }
    }
}
