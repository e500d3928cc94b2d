//! Built-in gate stages.

pub mod commercial;
pub mod quota;

pub use commercial::CommercialUseStage;
pub use quota::QuotaStage;
