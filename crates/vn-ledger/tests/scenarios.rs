//! End-to-end ledger scenarios, run against both store backends.

use vn_gate::PolicyViolation;
use vn_ledger::{
    ErrorKind, LedgerError, MintReceipt, MintRequest, SampleHandle, SynthesisRequest, VoiceLedger,
};
use vn_store::{
    open_store, Collection, CollectionStore, FileCollectionStore, StoreBackend,
};
use vn_types::{TokenAmount, VoiceId};

type DynLedger = VoiceLedger<Box<dyn CollectionStore>>;

/// Run `scenario` once over a volatile store and once over a file store in
/// a fresh temporary directory.
fn for_each_backend(scenario: impl Fn(&DynLedger)) {
    let memory = open_store(&StoreBackend::Memory).expect("memory store");
    scenario(&VoiceLedger::new(memory));

    let dir = tempfile::tempdir().expect("tempdir");
    let file = open_store(&StoreBackend::File {
        root: dir.path().join("ledger"),
    })
    .expect("file store");
    scenario(&VoiceLedger::new(file));
}

fn mint(ledger: &DynLedger, commercial: bool, quota: u32, bps: u32) -> MintReceipt {
    ledger
        .mint(MintRequest {
            owner_address: "0xOwner".into(),
            title: "Test Voice".into(),
            description: None,
            royalty_bps: bps,
            commercial_use_allowed: commercial,
            monthly_quota: quota,
            terms: "demo terms".into(),
            sample: Some(SampleHandle::named("sample.wav")),
        })
        .expect("mint")
}

fn synthesize(
    ledger: &DynLedger,
    voice_id: VoiceId,
    text: &str,
    commercial: bool,
) -> Result<vn_ledger::SynthesisReceipt, LedgerError> {
    ledger.synthesize_with_policy(SynthesisRequest {
        voice_id,
        requester_address: "0xRequester".into(),
        text: text.into(),
        commercial_use: commercial,
    })
}

#[test]
fn mint_produces_bidirectional_pairing() {
    for_each_backend(|ledger| {
        let MintReceipt { voice, dat } = mint(ledger, true, 5, 500);
        assert_eq!(voice.dat_id, dat.id);
        assert_eq!(dat.voice_id, voice.id);
        assert_eq!(voice.usage_policy, dat.usage_policy);
        assert!(ledger.verify().is_valid());
    });
}

#[test]
fn quota_one_then_denied_and_commercial_denied_on_fresh_voice() {
    for_each_backend(|ledger| {
        let limited = mint(ledger, false, 1, 1_000);

        let receipt = synthesize(ledger, limited.voice.id, &"a".repeat(250), false)
            .expect("first synthesis within quota");
        assert_eq!(receipt.royalty.amount_tokens, TokenAmount::from_units(600));

        let err = synthesize(ledger, limited.voice.id, "again", false).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&PolicyViolation::QuotaExceeded { used: 1, quota: 1 })
        );

        let fresh = mint(ledger, false, 1, 1_000);
        let err = synthesize(ledger, fresh.voice.id, "ad copy", true).unwrap_err();
        assert_eq!(err.violation(), Some(&PolicyViolation::CommercialUseDenied));
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);

        let fresh_voice = ledger.get_voice(fresh.voice.id).expect("fresh voice");
        assert_eq!(fresh_voice.usage_policy.usage_count_this_month, 0);
        assert_eq!(ledger.list_royalties().len(), 1);
    });
}

#[test]
fn n_successes_then_quota_exceeded() {
    for_each_backend(|ledger| {
        let minted = mint(ledger, true, 4, 200);
        for expected in 1..=4u32 {
            synthesize(ledger, minted.voice.id, "line", false).expect("within quota");
            let voice = ledger.get_voice(minted.voice.id).expect("voice");
            let dat = ledger.get_dat_for_voice(minted.voice.id).expect("dat");
            assert_eq!(voice.usage_policy.usage_count_this_month, expected);
            assert_eq!(dat.usage_policy, voice.usage_policy);
        }
        let err = synthesize(ledger, minted.voice.id, "line", false).unwrap_err();
        assert!(err.is_policy_violation());
        assert!(ledger.verify().is_valid());
    });
}

#[test]
fn commercial_denied_regardless_of_remaining_quota() {
    for_each_backend(|ledger| {
        let minted = mint(ledger, false, 100, 500);
        for _ in 0..3 {
            let err = synthesize(ledger, minted.voice.id, "promo", true).unwrap_err();
            assert_eq!(err.violation(), Some(&PolicyViolation::CommercialUseDenied));
        }
        let voice = ledger.get_voice(minted.voice.id).expect("voice");
        assert_eq!(voice.usage_policy.usage_count_this_month, 0);
    });
}

#[test]
fn empty_text_bills_one_unit() {
    for_each_backend(|ledger| {
        let minted = mint(ledger, true, 5, 10_000);
        let receipt = synthesize(ledger, minted.voice.id, "", false).expect("synthesis");
        assert_eq!(receipt.royalty.amount_tokens.to_string(), "0.2000");
        assert_eq!(receipt.royalty.usage_text_length, 0);
    });
}

#[test]
fn royalties_newest_first_across_voices() {
    for_each_backend(|ledger| {
        let a = mint(ledger, true, 5, 500);
        let b = mint(ledger, true, 5, 500);
        let first = synthesize(ledger, a.voice.id, "one", false).expect("first");
        let second = synthesize(ledger, b.voice.id, "two", false).expect("second");

        let listed = ledger.list_royalties();
        assert_eq!(listed[0].id, second.royalty.id);
        assert_eq!(listed[1].id, first.royalty.id);
    });
}

#[test]
fn reset_empties_all_collections() {
    for_each_backend(|ledger| {
        let minted = mint(ledger, true, 5, 500);
        synthesize(ledger, minted.voice.id, "hello", false).expect("synthesis");

        ledger.reset().expect("reset");
        assert!(ledger.list_voices().is_empty());
        assert!(ledger.list_dats().is_empty());
        assert!(ledger.list_royalties().is_empty());
        ledger.reset().expect("second reset");
    });
}

#[test]
fn reset_usage_restores_admission() {
    for_each_backend(|ledger| {
        let minted = mint(ledger, true, 1, 500);
        synthesize(ledger, minted.voice.id, "x", false).expect("first");
        assert!(synthesize(ledger, minted.voice.id, "x", false).is_err());

        ledger.reset_usage(minted.voice.id).expect("reset usage");
        let dat = ledger.get_dat_for_voice(minted.voice.id).expect("dat");
        assert_eq!(dat.usage_policy.usage_count_this_month, 0);
        synthesize(ledger, minted.voice.id, "x", false).expect("admitted after reset");
    });
}

#[test]
fn portfolio_collects_owner_earnings() {
    for_each_backend(|ledger| {
        let minted = mint(ledger, true, 5, 10_000);
        synthesize(ledger, minted.voice.id, "", false).expect("one");
        synthesize(ledger, minted.voice.id, "", false).expect("two");

        let portfolio = ledger.portfolio("0xowner");
        assert_eq!(portfolio.voices.len(), 1);
        assert_eq!(portfolio.royalties.len(), 2);
        assert_eq!(portfolio.total_tokens.to_string(), "0.4000");
    });
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let voice_id = {
        let ledger = VoiceLedger::new(FileCollectionStore::open(dir.path()).expect("open"));
        let minted = ledger
            .mint(MintRequest {
                owner_address: "0xOwner".into(),
                title: "Durable".into(),
                description: None,
                royalty_bps: 1_000,
                commercial_use_allowed: true,
                monthly_quota: 3,
                terms: "t".into(),
                sample: None,
            })
            .expect("mint");
        ledger
            .synthesize_with_policy(SynthesisRequest {
                voice_id: minted.voice.id,
                requester_address: "0xRequester".into(),
                text: "persist me".into(),
                commercial_use: true,
            })
            .expect("synthesis");
        minted.voice.id
    };

    let reopened = VoiceLedger::new(FileCollectionStore::open(dir.path()).expect("reopen"));
    let voice = reopened.get_voice(voice_id).expect("voice after reopen");
    assert_eq!(voice.usage_policy.usage_count_this_month, 1);
    assert_eq!(reopened.list_dats().len(), 1);
    assert_eq!(reopened.list_royalties().len(), 1);
    assert!(reopened.verify().is_valid());
}

#[test]
fn malformed_collection_reads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileCollectionStore::open(dir.path()).expect("open");
    std::fs::write(store.path_for(Collection::Voices), "{not json").expect("corrupt");

    let ledger = VoiceLedger::new(store);
    assert!(ledger.list_voices().is_empty());
    let err = ledger
        .synthesize_with_policy(SynthesisRequest {
            voice_id: VoiceId::new(),
            requester_address: "0x1".into(),
            text: "hi".into(),
            commercial_use: false,
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::VoiceNotFound(_)));
}
