use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::id::{DatId, RoyaltyId, VoiceId};
use crate::temporal::Timestamp;

/// Tokens accrued to a voice owner by one accepted synthesis.
///
/// Created once per successful synthesis and never mutated. Only a full
/// store reset removes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyEvent {
    pub id: RoyaltyId,
    pub voice_id: VoiceId,
    pub dat_id: DatId,
    pub requester_address: String,
    pub amount_tokens: TokenAmount,
    pub timestamp: Timestamp,
    /// Length of the synthesized text in UTF-16 code units.
    pub usage_text_length: u64,
}
