use std::collections::HashSet;

use serde::Serialize;
use vn_types::{RoyaltyEvent, TokenAmount, VoiceAsset, VoiceId};

/// Per-voice earnings row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceEarnings {
    pub voice_id: VoiceId,
    pub title: String,
    pub synthesis_count: u64,
    pub total_tokens: TokenAmount,
}

/// Everything one owner holds: voices, the royalties those voices earned,
/// and the totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerPortfolio {
    pub owner_address: String,
    pub voices: Vec<VoiceAsset>,
    /// Newest first, in the order they were supplied.
    pub royalties: Vec<RoyaltyEvent>,
    pub earnings: Vec<VoiceEarnings>,
    pub total_tokens: TokenAmount,
}

impl OwnerPortfolio {
    /// Project the holdings of `owner_address` out of the full collections.
    ///
    /// Addresses compare case-insensitively (`0xABC` owns what `0xabc`
    /// minted). Voice order and royalty order are preserved.
    pub fn build(owner_address: &str, voices: &[VoiceAsset], royalties: &[RoyaltyEvent]) -> Self {
        let owner = owner_address.trim();
        let voices: Vec<VoiceAsset> = voices
            .iter()
            .filter(|v| v.owner_address.eq_ignore_ascii_case(owner))
            .cloned()
            .collect();
        let owned: HashSet<VoiceId> = voices.iter().map(|v| v.id).collect();
        let royalties: Vec<RoyaltyEvent> = royalties
            .iter()
            .filter(|r| owned.contains(&r.voice_id))
            .cloned()
            .collect();

        let earnings = voices
            .iter()
            .map(|voice| {
                let earned = royalties.iter().filter(|r| r.voice_id == voice.id);
                VoiceEarnings {
                    voice_id: voice.id,
                    title: voice.metadata.title.clone(),
                    synthesis_count: earned.clone().count() as u64,
                    total_tokens: earned.map(|r| r.amount_tokens).sum(),
                }
            })
            .collect::<Vec<_>>();
        let total_tokens: TokenAmount = earnings.iter().map(|e| e.total_tokens).sum();

        Self {
            owner_address: owner.to_string(),
            voices,
            royalties,
            earnings,
            total_tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
