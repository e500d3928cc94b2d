use std::time::{Duration, Instant};

use vn_types::AgentPolicy;

use crate::config::GateConfig;
use crate::error::GateError;
use crate::stage::{
    GateContext, GateStage, PolicyViolation, StageDecision, StageResult, UsageRequest,
};
use crate::stages::{CommercialUseStage, QuotaStage};

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

/// Final decision of the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Every stage passed.
    Admitted,
    /// A stage denied the request.
    Denied(PolicyViolation),
}

/// Decision plus a per-stage trace.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub verdict: Verdict,
    /// Stages that ran, in order. Stages after a denial are absent.
    pub stage_results: Vec<StageResult>,
    pub elapsed: Duration,
}

impl GateResult {
    pub fn is_admitted(&self) -> bool {
        matches!(self.verdict, Verdict::Admitted)
    }

    /// The violation that denied the request, if any.
    pub fn violation(&self) -> Option<&PolicyViolation> {
        match &self.verdict {
            Verdict::Admitted => None,
            Verdict::Denied(violation) => Some(violation),
        }
    }

    /// Convert into `Ok(())` when admitted, or the violation.
    pub fn into_result(self) -> Result<(), PolicyViolation> {
        match self.verdict {
            Verdict::Admitted => Ok(()),
            Verdict::Denied(violation) => Err(violation),
        }
    }
}

// ---------------------------------------------------------------------------
// UsageGate
// ---------------------------------------------------------------------------

/// The usage gate: an ordered pipeline of stages that every synthesis
/// request must pass before the ledger records any usage.
pub struct UsageGate {
    stages: Vec<Box<dyn GateStage>>,
    config: GateConfig,
}

impl UsageGate {
    /// An empty pipeline that admits everything until stages are added.
    pub fn new(config: GateConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Create a gate with the built-in stages enabled by `config`, in order:
    /// CommercialUse -> Quota
    pub fn with_default_stages(config: GateConfig) -> Self {
        let mut stages: Vec<Box<dyn GateStage>> = Vec::new();
        if config.enforce_commercial_use {
            stages.push(Box::new(CommercialUseStage));
        }
        if config.enforce_quota {
            stages.push(Box::new(QuotaStage));
        }
        Self { stages, config }
    }

    /// Append a stage. Fails if a stage with the same name is installed.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) -> Result<(), GateError> {
        if self.stages.iter().any(|s| s.name() == stage.name()) {
            return Err(GateError::Config(format!(
                "duplicate stage name '{}'",
                stage.name()
            )));
        }
        self.stages.push(stage);
        Ok(())
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in evaluation order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run `request` through every stage against `policy`, stopping at the
    /// first denial.
    ///
    /// The policy is not modified; counting the usage is the caller's job.
    pub fn evaluate(
        &self,
        request: &UsageRequest,
        policy: &AgentPolicy,
    ) -> Result<GateResult, GateError> {
        let pipeline_start = Instant::now();
        let mut context = GateContext::new(policy.clone());
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(request, &context)?;
            let elapsed = stage_start.elapsed();

            let reason = match &decision {
                StageDecision::Pass => None,
                StageDecision::Deny(violation) => Some(violation.reason()),
            };

            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: decision.is_pass(),
                reason,
                elapsed,
            };

            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Deny(violation) = decision {
                tracing::debug!(
                    stage = stage.name(),
                    voice = %request.voice_id,
                    reason = %violation,
                    "usage request denied"
                );
                return Ok(GateResult {
                    verdict: Verdict::Denied(violation),
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        Ok(GateResult {
            verdict: Verdict::Admitted,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}

impl Default for UsageGate {
    fn default() -> Self {
        Self::with_default_stages(GateConfig::default())
    }
}

impl std::fmt::Debug for UsageGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageGate")
            .field("stages", &self.stage_names())
            .field("config", &self.config)
            .finish()
    }
}
