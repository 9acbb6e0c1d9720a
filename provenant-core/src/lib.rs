//! Provenant Core - content-provenance ledger library
//!
//! This crate provides the verification pipeline behind the Provenant
//! demo ledger: chunked content hashing, source-fingerprint similarity
//! matching, manifest-digest tamper detection, and the composite trust
//! decision that combines them with an external authenticity opinion.
//!
//! # Features
//!
//! - Deterministic content addressing (1 MiB chunk leaves, SHA3-256)
//! - Append-only cosine-similarity fingerprint index per media type
//! - C2PA-style manifests with digest anchoring
//! - Injectable forensics and signing-gate capabilities with mocks
//! - CBOR serialization for compact ledger snapshots
//!
//! # Example
//!
//! ```no_run
//! use provenant_core::{MediaType, MockAnalyzer, ProvenanceLedger, VerificationStatus};
//!
//! # async fn example() -> provenant_core::Result<()> {
//! let mut ledger = ProvenanceLedger::new();
//!
//! let photo = std::fs::read("photo.jpg").unwrap();
//! ledger.register_original(&photo, MediaType::Image, "Ada", "Sony A7 IV", "photo.jpg")?;
//!
//! // Use the mock analyzer for offline verification.
//! let analyzer = MockAnalyzer::default();
//! let outcome = ledger.verify(&photo, MediaType::Image, &analyzer).await?;
//!
//! assert_eq!(outcome.status, VerificationStatus::Verified);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod fee;
pub mod fingerprint;
pub mod forensics;
pub mod hash;
pub mod index;
pub mod ledger;
pub mod manifest;
pub mod record;
pub mod signing;

// Re-export main types for convenience
pub use engine::{decide, TrustVerdict, VerificationOutcome, VerificationStatus};
pub use error::{ProvenantError, Result};
pub use fee::estimate_fee;
pub use forensics::{
    AnalyzerConfig, AnalyzerFactory, AnalyzerSource, AuthenticityAnalyzer, AuthenticityOpinion,
    MockAnalyzer, FALLBACK_AUTHENTICITY_SCORE,
};
pub use hash::{hash_content, CHUNK_SIZE};
pub use index::{MatchKind, SimilarityIndex, SimilarityMatch, SIMILARITY_THRESHOLD};
pub use ledger::ProvenanceLedger;
pub use manifest::ProvenanceManifest;
pub use record::{ContentRecord, MediaType, TransformationEvent, TransformationKind};
pub use signing::{HardwareKeyStore, MockGate, SigningGate, SigningKeyInfo};

#[cfg(feature = "network")]
pub use forensics::{RemoteAnalyzer, RemoteAnalyzerConfig};

#[cfg(test)]
mod tests {
    use super::*;

    /// Integration test: register content, then verify the same bytes.
    #[tokio::test]
    async fn test_full_register_verify_workflow() {
        let mut ledger = ProvenanceLedger::new();
        let content: Vec<u8> = (0..30_000).map(|i| (i % 240) as u8).collect();

        let record = ledger
            .register_original(&content, MediaType::Image, "Ada", "Sony A7 IV", "shot.jpg")
            .expect("registration failed");
        assert_eq!(record.content_hash, hash_content(&content));

        let analyzer = MockAnalyzer::new(100.0);
        let outcome = ledger
            .verify(&content, MediaType::Image, &analyzer)
            .await
            .expect("verification failed");

        assert_eq!(outcome.status, VerificationStatus::Verified);
        assert_eq!(outcome.trust_score, 100);
        assert!(outcome.manifest_integrity);
        assert_eq!(
            outcome.similarity.expect("expected a match").kind,
            MatchKind::Exact
        );
    }

    /// Different content produces a different root.
    #[test]
    fn test_different_content_different_hash() {
        assert_ne!(hash_content(b"Content A"), hash_content(b"Content B"));
    }
}
