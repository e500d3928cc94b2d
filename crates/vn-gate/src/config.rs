use serde::{Deserialize, Serialize};

/// Configuration for the usage gate pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Install the commercial-use stage.
    pub enforce_commercial_use: bool,
    /// Install the quota stage.
    pub enforce_quota: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enforce_commercial_use: true,
            enforce_quota: true,
        }
    }
}

impl GateConfig {
    /// A configuration with no built-in checks, for local demos.
    pub fn permissive() -> Self {
        Self {
            enforce_commercial_use: false,
            enforce_quota: false,
        }
    }
}
