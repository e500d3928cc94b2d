use std::mem;

use vn_gate::{UsageGate, UsageRequest};
use vn_store::{Collection, CollectionStore, CollectionStoreExt};
use vn_types::{
    AgentPolicy, DatId, DatMetadata, DatToken, RoyaltyEvent, RoyaltyId, Timestamp, VoiceAsset,
    VoiceId, VoiceMetadata,
};

use crate::error::{LedgerError, LedgerResult};
use crate::projection::OwnerPortfolio;
use crate::request::{MintReceipt, MintRequest, SynthesisReceipt, SynthesisRequest};
use crate::royalty::{compute_royalty, MAX_ROYALTY_BPS};
use crate::validation::{PairingValidator, ValidationReport};

/// Copy the voice's policy onto its DAT.
///
/// Every mutator that touches a policy goes through here so the two copies
/// cannot drift. A difference in anything but the usage counter means some
/// earlier write bypassed this function; it is logged and overwritten.
pub fn sync_policy(voice: &VoiceAsset, dat: &mut DatToken) {
    let previous = mem::replace(&mut dat.usage_policy, voice.usage_policy.clone());
    if !policies_agree_except_usage(&previous, &voice.usage_policy) {
        tracing::warn!(
            voice = %voice.id,
            dat = %dat.id,
            "DAT policy diverged from voice policy; repaired from voice"
        );
    }
}

fn policies_agree_except_usage(a: &AgentPolicy, b: &AgentPolicy) -> bool {
    a.commercial_use_allowed == b.commercial_use_allowed
        && a.monthly_quota == b.monthly_quota
        && a.terms == b.terms
}

/// The VoiceNet ledger: voices, their DATs, and accrued royalties over an
/// injected [`CollectionStore`].
///
/// Each operation is a single read-modify-write cycle against the store.
/// Operations are not isolated from one another; callers that synthesize
/// against the same voice concurrently must serialize those calls.
pub struct VoiceLedger<S: CollectionStore> {
    store: S,
    gate: UsageGate,
}

impl<S: CollectionStore> VoiceLedger<S> {
    /// Create a ledger with the default gate (commercial-use, then quota).
    pub fn new(store: S) -> Self {
        Self::with_gate(store, UsageGate::default())
    }

    pub fn with_gate(store: S, gate: UsageGate) -> Self {
        Self { store, gate }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gate(&self) -> &UsageGate {
        &self.gate
    }

    // -----------------------------------------------------------------------
    // Mint
    // -----------------------------------------------------------------------

    /// Register a voice and its paired DAT.
    pub fn mint(&self, request: MintRequest) -> LedgerResult<MintReceipt> {
        let royalty_bps = u16::try_from(request.royalty_bps)
            .ok()
            .filter(|bps| *bps <= MAX_ROYALTY_BPS)
            .ok_or(LedgerError::InvalidRoyaltyBps(request.royalty_bps))?;

        let voice_id = VoiceId::new();
        let dat_id = DatId::new();
        let policy = AgentPolicy::new(
            request.commercial_use_allowed,
            request.monthly_quota,
            request.terms.clone(),
        );
        let (sample_file_name, sample_ref) = match request.sample {
            Some(sample) => (Some(sample.file_name), sample.reference),
            None => (None, None),
        };

        let dat = DatToken {
            id: dat_id,
            owner_address: request.owner_address.clone(),
            voice_id,
            royalty_bps,
            usage_policy: policy.clone(),
            metadata: DatMetadata {
                voice_title: request.title.clone(),
                usage_terms: request.terms,
            },
        };
        let voice = VoiceAsset {
            id: voice_id,
            owner_address: request.owner_address,
            created_at: Timestamp::now(),
            royalty_bps,
            dat_id,
            usage_policy: policy,
            metadata: VoiceMetadata {
                title: request.title,
                description: request.description,
            },
            sample_file_name,
            sample_ref,
        };

        // DATs first: a DAT without its voice is unreachable, a voice
        // without its DAT fails every synthesis.
        let mut dats: Vec<DatToken> = self.store.read(Collection::Dats);
        dats.push(dat.clone());
        self.store.write(Collection::Dats, &dats)?;

        let mut voices: Vec<VoiceAsset> = self.store.read(Collection::Voices);
        voices.push(voice.clone());
        self.store.write(Collection::Voices, &voices)?;

        tracing::info!(
            voice = %voice.id,
            dat = %dat.id,
            owner = %voice.owner_address,
            royalty_bps,
            "voice minted"
        );
        Ok(MintReceipt { voice, dat })
    }

    // -----------------------------------------------------------------------
    // Synthesis
    // -----------------------------------------------------------------------

    /// Check a synthesis request against the voice's policy and, if it is
    /// admitted, count the usage and accrue a royalty.
    ///
    /// Nothing is written when the request is denied. Writes go voices,
    /// then DATs, then royalties; a failure after the voice write leaves the
    /// usage counted, the DAT's copy of the policy stale, and no royalty
    /// recorded. `verify` reports the stale DAT as a policy divergence.
    pub fn synthesize_with_policy(
        &self,
        request: SynthesisRequest,
    ) -> LedgerResult<SynthesisReceipt> {
        let text_length = request.text_length();
        let mut voices: Vec<VoiceAsset> = self.store.read(Collection::Voices);
        let voice_idx = voices
            .iter()
            .position(|v| v.id == request.voice_id)
            .ok_or(LedgerError::VoiceNotFound(request.voice_id))?;

        let mut dats: Vec<DatToken> = self.store.read(Collection::Dats);
        let dat_idx = self.locate_dat(&dats, &voices[voice_idx])?;

        let usage = UsageRequest {
            voice_id: request.voice_id,
            requester_address: request.requester_address.clone(),
            commercial_use: request.commercial_use,
            text_length,
        };
        let outcome = self.gate.evaluate(&usage, &voices[voice_idx].usage_policy)?;
        if let Err(violation) = outcome.into_result() {
            tracing::warn!(
                voice = %request.voice_id,
                requester = %request.requester_address,
                reason = %violation,
                "synthesis denied"
            );
            return Err(violation.into());
        }

        let voice = &mut voices[voice_idx];
        voice.usage_policy.usage_count_this_month =
            voice.usage_policy.usage_count_this_month.saturating_add(1);
        sync_policy(voice, &mut dats[dat_idx]);
        let voice = voice.clone();

        self.store.write(Collection::Voices, &voices)?;
        self.store.write(Collection::Dats, &dats)?;

        let royalty = RoyaltyEvent {
            id: RoyaltyId::new(),
            voice_id: voice.id,
            dat_id: voice.dat_id,
            requester_address: request.requester_address,
            amount_tokens: compute_royalty(text_length, voice.royalty_bps),
            timestamp: Timestamp::now(),
            usage_text_length: text_length,
        };
        let mut royalties: Vec<RoyaltyEvent> = self.store.read(Collection::Royalties);
        royalties.insert(0, royalty.clone());
        self.store.write(Collection::Royalties, &royalties)?;

        tracing::info!(
            voice = %voice.id,
            royalty = %royalty.id,
            amount = %royalty.amount_tokens,
            used = voice.usage_policy.usage_count_this_month,
            quota = voice.usage_policy.monthly_quota,
            "synthesis accepted"
        );
        Ok(SynthesisReceipt { royalty })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All voices, in mint order.
    pub fn list_voices(&self) -> Vec<VoiceAsset> {
        self.store.read(Collection::Voices)
    }

    /// All DATs, in mint order.
    pub fn list_dats(&self) -> Vec<DatToken> {
        self.store.read(Collection::Dats)
    }

    /// All royalty events, newest first.
    pub fn list_royalties(&self) -> Vec<RoyaltyEvent> {
        let mut royalties: Vec<RoyaltyEvent> = self.store.read(Collection::Royalties);
        royalties.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        royalties
    }

    pub fn get_voice(&self, voice_id: VoiceId) -> Option<VoiceAsset> {
        self.list_voices().into_iter().find(|v| v.id == voice_id)
    }

    /// The DAT paired with `voice_id`.
    pub fn get_dat_for_voice(&self, voice_id: VoiceId) -> LedgerResult<DatToken> {
        let voice = self
            .get_voice(voice_id)
            .ok_or(LedgerError::VoiceNotFound(voice_id))?;
        let mut dats = self.list_dats();
        let idx = self.locate_dat(&dats, &voice)?;
        Ok(dats.swap_remove(idx))
    }

    /// Voices owned by `owner_address` and the royalties they earned.
    pub fn portfolio(&self, owner_address: &str) -> OwnerPortfolio {
        OwnerPortfolio::build(owner_address, &self.list_voices(), &self.list_royalties())
    }

    /// Check the persisted collections for broken voice/DAT pairings.
    pub fn verify(&self) -> ValidationReport {
        PairingValidator::validate(&self.list_voices(), &self.list_dats(), &self.list_royalties())
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Zero the usage counter of one voice and its DAT.
    ///
    /// The ledger never resets counters by itself; a scheduler that owns the
    /// policy window calls this.
    pub fn reset_usage(&self, voice_id: VoiceId) -> LedgerResult<VoiceAsset> {
        let mut voices: Vec<VoiceAsset> = self.store.read(Collection::Voices);
        let voice_idx = voices
            .iter()
            .position(|v| v.id == voice_id)
            .ok_or(LedgerError::VoiceNotFound(voice_id))?;
        let mut dats: Vec<DatToken> = self.store.read(Collection::Dats);
        let dat_idx = self.locate_dat(&dats, &voices[voice_idx])?;

        let voice = &mut voices[voice_idx];
        voice.usage_policy.usage_count_this_month = 0;
        sync_policy(voice, &mut dats[dat_idx]);
        let voice = voice.clone();

        self.store.write(Collection::Voices, &voices)?;
        self.store.write(Collection::Dats, &dats)?;

        tracing::info!(voice = %voice_id, "usage counter reset");
        Ok(voice)
    }

    /// Clear every collection.
    pub fn reset(&self) -> LedgerResult<()> {
        self.store.reset()?;
        tracing::info!("ledger reset");
        Ok(())
    }

    fn locate_dat(&self, dats: &[DatToken], voice: &VoiceAsset) -> LedgerResult<usize> {
        dats.iter().position(|d| d.id == voice.dat_id).ok_or_else(|| {
            tracing::error!(
                voice = %voice.id,
                dat = %voice.dat_id,
                "voice references a DAT that does not exist; mint pairing is broken"
            );
            LedgerError::DatNotFound {
                voice: voice.id,
                dat: voice.dat_id,
            }
        })
    }
}

impl<S: CollectionStore> std::fmt::Debug for VoiceLedger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceLedger")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
