use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{DatId, VoiceId};
use crate::policy::AgentPolicy;
use crate::temporal::Timestamp;

/// Descriptive metadata for a voice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Opaque handle to a stored voice sample.
///
/// The ledger never dereferences it; callers that hold the audio decide what
/// it points at (a path, an object key, a URL).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleRef(String);

impl SampleRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SampleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleRef({})", self.0)
    }
}

/// A minted voice.
///
/// Owns exactly one [`DatToken`], created in the same mint and never
/// re-parented.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAsset {
    pub id: VoiceId,
    pub owner_address: String,
    pub created_at: Timestamp,
    /// Royalty share in basis points (10000 = 100%).
    pub royalty_bps: u16,
    pub dat_id: DatId,
    pub usage_policy: AgentPolicy,
    pub metadata: VoiceMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_ref: Option<SampleRef>,
}

/// Metadata carried on a DAT for display next to the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatMetadata {
    pub voice_title: String,
    pub usage_terms: String,
}

/// Data Anchoring Token: ownership and usage policy record for a voice.
///
/// `voice_id` is a back-reference to the owning [`VoiceAsset`].
/// `usage_policy` is a copy of the voice's policy and must be kept equal to
/// it by every mutator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatToken {
    pub id: DatId,
    pub owner_address: String,
    pub voice_id: VoiceId,
    pub royalty_bps: u16,
    pub usage_policy: AgentPolicy,
    pub metadata: DatMetadata,
}

impl DatToken {
    /// Returns `true` if this token is the pair of `voice` in both directions.
    pub fn is_paired_with(&self, voice: &VoiceAsset) -> bool {
        self.id == voice.dat_id && self.voice_id == voice.id
    }
}
