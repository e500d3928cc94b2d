use serde::{Deserialize, Serialize};

/// Usage policy attached to a voice and mirrored on its DAT.
///
/// `usage_count_this_month < monthly_quota` is the admission test for a
/// further synthesis. It is checked before the increment, so it is a gate
/// rather than a structural invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPolicy {
    /// Whether commercial synthesis requests are permitted.
    pub commercial_use_allowed: bool,
    /// Number of accepted synthesis requests per policy window.
    pub monthly_quota: u32,
    /// Accepted synthesis requests counted so far.
    pub usage_count_this_month: u32,
    /// Free-form, human-readable terms.
    pub terms: String,
}

impl AgentPolicy {
    /// A fresh policy with no recorded usage.
    pub fn new(commercial_use_allowed: bool, monthly_quota: u32, terms: impl Into<String>) -> Self {
        Self {
            commercial_use_allowed,
            monthly_quota,
            usage_count_this_month: 0,
            terms: terms.into(),
        }
    }

    /// Returns `true` if another synthesis would be admitted by the quota.
    pub fn has_remaining_quota(&self) -> bool {
        self.usage_count_this_month < self.monthly_quota
    }

    /// Remaining admissions in the current window.
    pub fn remaining(&self) -> u32 {
        self.monthly_quota.saturating_sub(self.usage_count_this_month)
    }
}
