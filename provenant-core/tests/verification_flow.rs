//! End-to-end verification pipeline tests.
//!
//! These tests drive the public ledger API the way the UI layer does:
//! register bytes, then verify the same or altered bytes and check the
//! resolved status and composite score.

use async_trait::async_trait;
use provenant_core::{
    AnalyzerSource, AuthenticityAnalyzer, AuthenticityOpinion, MatchKind, MediaType, MockAnalyzer,
    ProvenanceLedger, ProvenantError, Result, VerificationStatus, FALLBACK_AUTHENTICITY_SCORE,
};

/// Analyzer that always fails, standing in for an unreachable service.
struct FailingAnalyzer;

#[async_trait]
impl AuthenticityAnalyzer for FailingAnalyzer {
    async fn assess(&self, _content: &[u8], _media_type: MediaType) -> Result<AuthenticityOpinion> {
        Err(ProvenantError::Analysis("service unreachable".into()))
    }

    fn source_id(&self) -> AnalyzerSource {
        AnalyzerSource::RemoteForensics
    }
}

/// Structured bytes long enough to exercise the device-fingerprint prefix.
fn image_bytes() -> Vec<u8> {
    (0..25_000).map(|i| ((i * 7) % 256) as u8).collect()
}

#[tokio::test]
async fn verified_scenario_scores_full_budget() {
    let mut ledger = ProvenanceLedger::new();
    let content = image_bytes();
    ledger
        .register_original(&content, MediaType::Image, "Ada", "Sony A7 IV", "shot.jpg")
        .unwrap();

    for external in [0.0, 40.0, 100.0] {
        let outcome = ledger
            .verify(&content, MediaType::Image, &MockAnalyzer::new(external))
            .await
            .unwrap();

        assert_eq!(outcome.status, VerificationStatus::Verified);
        let expected = (40.0 + 20.0 + 20.0 + external / 100.0 * 20.0).round() as u8;
        assert_eq!(outcome.trust_score, expected);
    }
}

#[tokio::test]
async fn tampered_bytes_with_recognized_source_resolve_tampered() {
    let mut ledger = ProvenanceLedger::new();
    let content = image_bytes();
    ledger
        .register_original(&content, MediaType::Image, "Ada", "Sony A7 IV", "shot.jpg")
        .unwrap();

    // Alter bytes beyond the fingerprint prefix: the content hash changes
    // but the device fingerprint stays identical.
    let mut tampered = content.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0xFF;

    let outcome = ledger
        .verify(&tampered, MediaType::Image, &MockAnalyzer::new(0.0))
        .await
        .unwrap();

    assert_eq!(outcome.status, VerificationStatus::Tampered);
    assert!(outcome.record.is_none());
    let similarity = outcome.similarity.expect("source should be recognized");
    assert!(similarity.score > 0.85);
    assert_eq!(similarity.kind, MatchKind::Derivative);
    assert!(outcome.matched_record.is_some());
    assert_eq!(outcome.trust_score, 20);
}

#[tokio::test]
async fn registered_content_without_corroboration_resolves_suspect() {
    let mut ledger = ProvenanceLedger::new();
    let content = image_bytes();
    ledger
        .register_original(&content, MediaType::Image, "Ada", "Sony A7 IV", "shot.jpg")
        .unwrap();

    // Same bytes presented as audio: the exact-hash record is found, but
    // the acoustic query has no same-type index entry to corroborate it.
    let outcome = ledger
        .verify(&content, MediaType::Audio, &MockAnalyzer::new(0.0))
        .await
        .unwrap();

    assert_eq!(outcome.status, VerificationStatus::Suspect);
    assert!(outcome.record.is_some());
    assert!(outcome.similarity.is_none());
    // Record (40) + manifest integrity (20), no similarity, no opinion.
    assert_eq!(outcome.trust_score, 60);
}

#[tokio::test]
async fn unknown_content_resolves_unverified() {
    let ledger = ProvenanceLedger::new();

    let outcome = ledger
        .verify(&image_bytes(), MediaType::Image, &MockAnalyzer::new(50.0))
        .await
        .unwrap();

    assert_eq!(outcome.status, VerificationStatus::Unverified);
    assert!(outcome.record.is_none());
    assert!(outcome.similarity.is_none());
    assert!(!outcome.manifest_integrity);
    assert_eq!(outcome.trust_score, 10);
}

#[tokio::test]
async fn analyzer_failure_substitutes_neutral_opinion() {
    let mut ledger = ProvenanceLedger::new();
    let content = image_bytes();
    ledger
        .register_original(&content, MediaType::Image, "Ada", "Sony A7 IV", "shot.jpg")
        .unwrap();

    let outcome = ledger
        .verify(&content, MediaType::Image, &FailingAnalyzer)
        .await
        .expect("verify must not fail on analyzer errors");

    assert_eq!(outcome.opinion.score, FALLBACK_AUTHENTICITY_SCORE);
    assert_eq!(outcome.opinion.source, AnalyzerSource::Fallback);
    assert_eq!(outcome.status, VerificationStatus::Verified);
    // 40 + 20 + 20 + 0.5 * 20
    assert_eq!(outcome.trust_score, 90);
}

#[tokio::test]
async fn derivative_with_parent_hash_verifies_without_similarity() {
    let mut ledger = ProvenanceLedger::new();
    let original = image_bytes();
    let parent = ledger
        .register_original(&original, MediaType::Image, "Ada", "Sony A7 IV", "shot.jpg")
        .unwrap();

    // A video derivative of the image: nothing of the same media type is
    // indexed besides itself, so the match is EXACT; even without it, the
    // parent link keeps the record out of SUSPECT.
    let clip = vec![0x5A; 4096];
    let derivative = ledger
        .register_derivative(
            &clip,
            MediaType::Video,
            &parent.content_hash,
            "Grace",
            Vec::new(),
            "clip.mp4",
        )
        .unwrap();
    assert_eq!(derivative.parent_hash.as_deref(), Some(parent.content_hash.as_str()));

    let outcome = ledger
        .verify(&clip, MediaType::Video, &MockAnalyzer::new(80.0))
        .await
        .unwrap();
    assert_eq!(outcome.status, VerificationStatus::Verified);
}

#[tokio::test]
async fn registering_twice_keeps_one_record_and_two_index_entries() {
    let mut ledger = ProvenanceLedger::new();
    let content = image_bytes();

    ledger
        .register_original(&content, MediaType::Image, "Ada", "Cam", "a.jpg")
        .unwrap();
    ledger
        .register_original(&content, MediaType::Image, "Ada", "Cam", "a.jpg")
        .unwrap();

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.index_len(), 2);
}

#[tokio::test]
async fn snapshot_roundtrip_preserves_verification_outcomes() {
    let mut ledger = ProvenanceLedger::new();
    let content = image_bytes();
    ledger
        .register_original(&content, MediaType::Image, "Ada", "Cam", "a.jpg")
        .unwrap();

    let restored = ProvenanceLedger::from_cbor(&ledger.to_cbor().unwrap()).unwrap();
    let outcome = restored
        .verify(&content, MediaType::Image, &MockAnalyzer::new(100.0))
        .await
        .unwrap();

    assert_eq!(outcome.status, VerificationStatus::Verified);
    assert_eq!(outcome.trust_score, 100);
}

#[tokio::test]
async fn empty_input_hashes_to_empty_digest_and_stays_unverified() {
    let ledger = ProvenanceLedger::new();
    let outcome = ledger
        .verify(b"", MediaType::Image, &MockAnalyzer::new(0.0))
        .await
        .unwrap();

    assert_eq!(outcome.content_hash, "");
    assert_eq!(outcome.status, VerificationStatus::Unverified);
    assert_eq!(outcome.trust_score, 0);
}
