use std::collections::{HashMap, HashSet};

use serde::Serialize;
use vn_types::{DatToken, RoyaltyEvent, VoiceAsset};

/// Result of a pairing check over the persisted collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub voice_count: u64,
    pub dat_count: u64,
    pub royalty_count: u64,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations of the given kind.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Id of the record the violation was found on.
    pub subject: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A voice whose `datId` names no DAT.
    MissingDat,
    /// A DAT whose `voiceId` names no voice.
    OrphanDat,
    /// Voice and DAT exist but do not point at each other.
    BrokenBackReference,
    /// The DAT's policy or royalty share differs from its voice.
    PolicyDivergence,
    /// A royalty event for a voice that no longer exists.
    UnattributedRoyalty,
    /// The same id appears twice in one collection.
    DuplicateId,
}

/// Voice/DAT pairing validator.
pub struct PairingValidator;

impl PairingValidator {
    /// Check the mint invariants over a snapshot of the three collections.
    ///
    /// Every voice must have exactly one DAT that points back at it, with an
    /// identical policy and royalty share, and every royalty must be
    /// attributable to a known voice.
    pub fn validate(
        voices: &[VoiceAsset],
        dats: &[DatToken],
        royalties: &[RoyaltyEvent],
    ) -> ValidationReport {
        let mut violations = Vec::new();

        let mut voice_ids = HashSet::new();
        for voice in voices {
            if !voice_ids.insert(voice.id) {
                violations.push(Violation {
                    kind: ViolationKind::DuplicateId,
                    subject: voice.id.to_string(),
                    description: "voice id appears more than once".into(),
                });
            }
        }

        let mut dats_by_id: HashMap<_, &DatToken> = HashMap::new();
        for dat in dats {
            if dats_by_id.insert(dat.id, dat).is_some() {
                violations.push(Violation {
                    kind: ViolationKind::DuplicateId,
                    subject: dat.id.to_string(),
                    description: "DAT id appears more than once".into(),
                });
            }
        }

        for voice in voices {
            let Some(dat) = dats_by_id.get(&voice.dat_id) else {
                violations.push(Violation {
                    kind: ViolationKind::MissingDat,
                    subject: voice.id.to_string(),
                    description: format!("voice references missing DAT {}", voice.dat_id),
                });
                continue;
            };

            if dat.voice_id != voice.id {
                violations.push(Violation {
                    kind: ViolationKind::BrokenBackReference,
                    subject: dat.id.to_string(),
                    description: format!(
                        "DAT points at voice {}, expected {}",
                        dat.voice_id, voice.id
                    ),
                });
            }

            if dat.usage_policy != voice.usage_policy || dat.royalty_bps != voice.royalty_bps {
                violations.push(Violation {
                    kind: ViolationKind::PolicyDivergence,
                    subject: dat.id.to_string(),
                    description: "DAT policy does not match its voice".into(),
                });
            }
        }

        for dat in dats {
            if !voice_ids.contains(&dat.voice_id) {
                violations.push(Violation {
                    kind: ViolationKind::OrphanDat,
                    subject: dat.id.to_string(),
                    description: format!("DAT references missing voice {}", dat.voice_id),
                });
            }
        }

        for royalty in royalties {
            if !voice_ids.contains(&royalty.voice_id) {
                violations.push(Violation {
                    kind: ViolationKind::UnattributedRoyalty,
                    subject: royalty.id.to_string(),
                    description: format!("royalty for unknown voice {}", royalty.voice_id),
                });
            }
        }

        ValidationReport {
            voice_count: voices.len() as u64,
            dat_count: dats.len() as u64,
            royalty_count: royalties.len() as u64,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vn_types::{
        AgentPolicy, DatId, DatMetadata, RoyaltyId, Timestamp, TokenAmount, VoiceId,
        VoiceMetadata,
    };

    fn pair() -> (VoiceAsset, DatToken) {
        let voice_id = VoiceId::new();
        let dat_id = DatId::new();
        let policy = AgentPolicy::new(false, 2, "terms");
        let voice = VoiceAsset {
            id: voice_id,
            owner_address: "0xabc".into(),
            created_at: Timestamp::from_millis(1),
            royalty_bps: 250,
            dat_id,
            usage_policy: policy.clone(),
            metadata: VoiceMetadata {
                title: "Narrator".into(),
                description: None,
            },
            sample_file_name: None,
            sample_ref: None,
        };
        let dat = DatToken {
            id: dat_id,
            owner_address: "0xabc".into(),
            voice_id,
            royalty_bps: 250,
            usage_policy: policy,
            metadata: DatMetadata {
                voice_title: "Narrator".into(),
                usage_terms: "terms".into(),
            },
        };
        (voice, dat)
    }

    #[test]
    fn consistent_collections_are_valid() {
        let (voice, dat) = pair();
        let report = PairingValidator::validate(&[voice], &[dat], &[]);
        assert!(report.is_valid());
        assert_eq!(report.voice_count, 1);
        assert_eq!(report.dat_count, 1);
    }

    #[test]
    fn missing_and_orphan_dats_detected() {
        let (voice_a, _) = pair();
        let (_, dat_b) = pair();
        let report = PairingValidator::validate(&[voice_a], &[dat_b], &[]);
        assert_eq!(report.count(ViolationKind::MissingDat), 1);
        assert_eq!(report.count(ViolationKind::OrphanDat), 1);
        assert!(!report.is_valid());
    }

    #[test]
    fn back_reference_mismatch_detected() {
        let (voice_a, mut dat_a) = pair();
        let (voice_b, _) = pair();
        dat_a.voice_id = voice_b.id;
        let report = PairingValidator::validate(&[voice_a, voice_b], &[dat_a], &[]);
        assert_eq!(report.count(ViolationKind::BrokenBackReference), 1);
        // voice_b's DAT is missing too
        assert_eq!(report.count(ViolationKind::MissingDat), 1);
    }

    #[test]
    fn policy_divergence_detected() {
        let (voice, mut dat) = pair();
        dat.usage_policy.usage_count_this_month = 1;
        let report = PairingValidator::validate(&[voice], &[dat], &[]);
        assert_eq!(report.count(ViolationKind::PolicyDivergence), 1);
    }

    #[test]
    fn unattributed_royalty_and_duplicates_detected() {
        let (voice, dat) = pair();
        let royalty = RoyaltyEvent {
            id: RoyaltyId::new(),
            voice_id: VoiceId::new(),
            dat_id: DatId::new(),
            requester_address: "0x1".into(),
            amount_tokens: TokenAmount::ZERO,
            timestamp: Timestamp::from_millis(1),
            usage_text_length: 1,
        };
        let report = PairingValidator::validate(
            &[voice.clone(), voice],
            &[dat],
            &[royalty],
        );
        assert_eq!(report.count(ViolationKind::UnattributedRoyalty), 1);
        assert_eq!(report.count(ViolationKind::DuplicateId), 1);
    }
}
