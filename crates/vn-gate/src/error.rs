/// Errors that can occur during gate evaluation.
///
/// A denial is not an error: stages report denials through
/// [`StageDecision::Deny`](crate::StageDecision::Deny). These variants cover
/// a stage or pipeline that could not reach a decision at all.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// A stage could not evaluate the request.
    #[error("gate stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },

    /// The pipeline was assembled incorrectly.
    #[error("invalid gate configuration: {0}")]
    Config(String),
}

impl GateError {
    pub fn stage_failed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageFailed {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
