//! Verification decision engine.
//!
//! The composite trust score and the status are two views of one decision,
//! so they are produced together by a single function; computing them
//! independently is how displayed score and displayed status drift apart.

use serde::{Deserialize, Serialize};

use crate::forensics::AuthenticityOpinion;
use crate::index::SimilarityMatch;
use crate::record::{ContentRecord, MediaType};

/// Points awarded for a ledger record under the exact content hash.
pub const LEDGER_POINTS: f64 = 40.0;

/// Points awarded for an intact manifest digest.
pub const MANIFEST_POINTS: f64 = 20.0;

/// Points awarded for a fingerprint match.
pub const SIMILARITY_POINTS: f64 = 20.0;

/// Maximum contribution of the external authenticity opinion.
pub const OPINION_POINTS: f64 = 20.0;

/// Final status of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    /// Ledger record with corroborating fingerprint or derivation history,
    /// and an intact manifest.
    Verified,
    /// Content bytes changed while the source fingerprint is recognized,
    /// or the stored manifest digest no longer matches.
    Tampered,
    /// Registered content with no corroborating fingerprint and no
    /// derivation history.
    Suspect,
    /// No record and no fingerprint match.
    Unverified,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => write!(f, "VERIFIED"),
            Self::Tampered => write!(f, "TAMPERED"),
            Self::Suspect => write!(f, "SUSPECT"),
            Self::Unverified => write!(f, "UNVERIFIED"),
        }
    }
}

/// Trust decision for one verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustVerdict {
    /// Composite trust score, 0-100.
    pub score: u8,
    pub status: VerificationStatus,
}

/// Combine the verification evidence into a trust verdict.
///
/// The additive point budget and the priority order of the status rules are
/// the reproducibility contract of the whole system: identical inputs must
/// yield identical verdicts across releases.
pub fn decide(
    record: Option<&ContentRecord>,
    similarity: Option<&SimilarityMatch>,
    manifest_integrity: bool,
    authenticity_score: f64,
) -> TrustVerdict {
    let has_record = record.is_some();
    let matched = similarity.is_some();
    let has_parent = record.is_some_and(|r| r.parent_hash.is_some());

    let mut score = 0.0;
    if has_record {
        score += LEDGER_POINTS;
    }
    if manifest_integrity {
        score += MANIFEST_POINTS;
    }
    if matched {
        score += SIMILARITY_POINTS;
    }
    score += authenticity_score / 100.0 * OPINION_POINTS;

    // First matching rule wins.
    let status = if has_record && (matched || has_parent) && manifest_integrity {
        VerificationStatus::Verified
    } else if (!has_record && matched) || (has_record && !manifest_integrity) {
        VerificationStatus::Tampered
    } else if has_record && !matched && !has_parent {
        VerificationStatus::Suspect
    } else {
        VerificationStatus::Unverified
    };

    TrustVerdict {
        score: score.round() as u8,
        status,
    }
}

/// Everything a verification run resolves to. Ephemeral; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationOutcome {
    pub content_hash: String,
    pub media_type: MediaType,
    /// Ledger record under the exact content hash, when present.
    pub record: Option<ContentRecord>,
    /// Best fingerprint match above threshold.
    pub similarity: Option<SimilarityMatch>,
    /// Record the similarity match points at, for display when the exact
    /// lookup came up empty.
    pub matched_record: Option<ContentRecord>,
    /// Stored manifest digest matched a fresh recomputation.
    pub manifest_integrity: bool,
    /// External authenticity opinion used in the decision.
    pub opinion: AuthenticityOpinion,
    /// Composite trust score, 0-100.
    pub trust_score: u8,
    pub status: VerificationStatus,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::index::MatchKind;
    use crate::manifest::ProvenanceManifest;
    use crate::record::{RecordAction, RecordMetadata};

    fn record(parent_hash: Option<&str>) -> ContentRecord {
        let manifest = ProvenanceManifest::new("test", "hash", "Ada", &[]);
        let manifest_digest = manifest.digest().unwrap();
        ContentRecord {
            content_hash: "hash".into(),
            signing_key_id: "k_TEST (TPM_2.0)".into(),
            registered_at: Utc::now(),
            signature: "sig".into(),
            media_type: MediaType::Image,
            ledger_ref: "0xref".into(),
            parent_hash: parent_hash.map(String::from),
            transformations: Vec::new(),
            fingerprint: None,
            acoustic_fingerprint: None,
            network_fee: 0.002,
            manifest,
            manifest_digest,
            metadata: RecordMetadata {
                author: "Ada".into(),
                action: RecordAction::Capture,
                details: "test".into(),
                location: None,
                device_model: None,
            },
        }
    }

    fn similarity(score: f64) -> SimilarityMatch {
        SimilarityMatch {
            score,
            matched_hash: "hash".into(),
            kind: MatchKind::Exact,
        }
    }

    #[test]
    fn test_full_evidence_is_verified() {
        let rec = record(None);
        let sim = similarity(1.0);
        let verdict = decide(Some(&rec), Some(&sim), true, 0.0);

        assert_eq!(verdict.status, VerificationStatus::Verified);
        assert_eq!(verdict.score, 80);
    }

    #[test]
    fn test_parent_hash_substitutes_for_similarity() {
        let rec = record(Some("parent"));
        let verdict = decide(Some(&rec), None, true, 0.0);
        assert_eq!(verdict.status, VerificationStatus::Verified);
    }

    #[test]
    fn test_recognized_source_without_record_is_tampered() {
        let sim = similarity(0.9);
        let verdict = decide(None, Some(&sim), false, 0.0);

        assert_eq!(verdict.status, VerificationStatus::Tampered);
        assert_eq!(verdict.score, 20);
    }

    #[test]
    fn test_broken_manifest_digest_is_tampered() {
        let rec = record(None);
        let sim = similarity(1.0);
        let verdict = decide(Some(&rec), Some(&sim), false, 0.0);
        assert_eq!(verdict.status, VerificationStatus::Tampered);
    }

    #[test]
    fn test_record_without_corroboration_is_suspect() {
        let rec = record(None);
        let verdict = decide(Some(&rec), None, true, 0.0);

        assert_eq!(verdict.status, VerificationStatus::Suspect);
        assert_eq!(verdict.score, 60);
    }

    #[test]
    fn test_no_evidence_is_unverified() {
        let verdict = decide(None, None, false, 50.0);

        assert_eq!(verdict.status, VerificationStatus::Unverified);
        assert_eq!(verdict.score, 10);
    }

    #[test]
    fn test_opinion_contributes_at_most_twenty_points() {
        let low = decide(None, None, false, 0.0);
        let high = decide(None, None, false, 100.0);

        assert_eq!(low.score, 0);
        assert_eq!(high.score, 20);
    }

    #[test]
    fn test_opinion_scaling_is_monotonic() {
        let mut last = 0;
        for opinion in (0..=100).step_by(10) {
            let verdict = decide(None, None, false, opinion as f64);
            assert!(verdict.score >= last);
            last = verdict.score;
        }
    }

    #[test]
    fn test_score_rounds_to_nearest_integer() {
        // 33/100 * 20 = 6.6 rounds up to 7.
        let verdict = decide(None, None, false, 33.0);
        assert_eq!(verdict.score, 7);
    }

    #[test]
    fn test_verified_scenario_score_formula() {
        let rec = record(None);
        let sim = similarity(0.95);
        for external in [0.0, 25.0, 70.0, 100.0] {
            let verdict = decide(Some(&rec), Some(&sim), true, external);
            let expected = (40.0 + 20.0 + 20.0 + external / 100.0 * 20.0).round() as u8;
            assert_eq!(verdict.score, expected);
            assert_eq!(verdict.status, VerificationStatus::Verified);
        }
    }
}
