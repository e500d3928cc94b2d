use serde::Serialize;
use vn_types::{DatToken, RoyaltyEvent, SampleRef, VoiceAsset, VoiceId};

/// Reference to the audio sample supplied at mint time.
///
/// The ledger keeps only the file name and an opaque handle; it never reads
/// the audio itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleHandle {
    pub file_name: String,
    pub reference: Option<SampleRef>,
}

impl SampleHandle {
    pub fn named(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            reference: None,
        }
    }
}

/// Input to [`VoiceLedger::mint`](crate::VoiceLedger::mint).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintRequest {
    pub owner_address: String,
    pub title: String,
    pub description: Option<String>,
    /// Accepted range is `0..=10000`; anything else is rejected.
    pub royalty_bps: u32,
    pub commercial_use_allowed: bool,
    pub monthly_quota: u32,
    pub terms: String,
    pub sample: Option<SampleHandle>,
}

/// Input to [`VoiceLedger::synthesize_with_policy`](crate::VoiceLedger::synthesize_with_policy).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub voice_id: VoiceId,
    pub requester_address: String,
    pub text: String,
    pub commercial_use: bool,
}

impl SynthesisRequest {
    /// Text length in UTF-16 code units. Characters outside the Basic
    /// Multilingual Plane count twice.
    pub fn text_length(&self) -> u64 {
        self.text.encode_utf16().count() as u64
    }
}

/// The voice and DAT produced by a successful mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MintReceipt {
    pub voice: VoiceAsset,
    pub dat: DatToken,
}

/// The royalty recorded for an accepted synthesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SynthesisReceipt {
    pub royalty: RoyaltyEvent,
}
