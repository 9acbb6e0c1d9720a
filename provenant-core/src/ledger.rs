//! The in-memory provenance ledger.
//!
//! An explicit store object owning the record map and the fingerprint
//! index. One instance per process; callers inject a reference wherever an
//! operation needs it. There is no ambient global state, so tests get
//! isolation by constructing a fresh ledger each.
//!
//! Mutating operations take `&mut self`: the borrow checker enforces the
//! single-writer discipline the data model assumes. An embedding that
//! issues genuinely concurrent requests must wrap the ledger in a `RwLock`
//! (or equivalent) so registrations cannot interleave.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{decide, VerificationOutcome};
use crate::error::{ProvenantError, Result};
use crate::fee::estimate_fee;
use crate::fingerprint::{acoustic_fingerprint, query_fingerprint};
use crate::forensics::{AuthenticityAnalyzer, AuthenticityOpinion};
use crate::hash::{digest_hex, hash_content};
use crate::index::SimilarityIndex;
use crate::manifest::ProvenanceManifest;
use crate::record::{
    ContentRecord, MediaType, RecordAction, RecordMetadata, TransformationEvent,
};
use crate::signing::{mock_signature, SigningKeyInfo};

/// Content ledger plus fingerprint index.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProvenanceLedger {
    records: HashMap<String, ContentRecord>,
    index: SimilarityIndex,
    /// Provisioned hardware key consulted by registrations, if any.
    signing_key: Option<SigningKeyInfo>,
}

impl ProvenanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct registered assets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of fingerprint index entries. The index is append-only, so
    /// this can exceed [`len`](Self::len) after re-registrations.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    pub fn get(&self, content_hash: &str) -> Option<&ContentRecord> {
        self.records.get(content_hash)
    }

    pub fn records(&self) -> impl Iterator<Item = &ContentRecord> {
        self.records.values()
    }

    /// Provision the hardware key consulted by subsequent registrations.
    pub fn set_signing_key(&mut self, key: SigningKeyInfo) {
        self.signing_key = Some(key);
    }

    pub fn signing_key(&self) -> Option<&SigningKeyInfo> {
        self.signing_key.as_ref()
    }

    /// Register an original capture.
    pub fn register_original(
        &mut self,
        bytes: &[u8],
        media_type: MediaType,
        author: &str,
        device_label: &str,
        title: &str,
    ) -> Result<ContentRecord> {
        let fallback_key_id = format!("pub_key_{}_GENERIC", device_label.replace(' ', "_"));
        let metadata = RecordMetadata {
            author: author.to_string(),
            action: RecordAction::Capture,
            details: "Original capture registered via creator toolchain.".to_string(),
            location: None,
            device_model: Some(device_label.to_string()),
        };
        self.register(bytes, media_type, None, Vec::new(), fallback_key_id, metadata, title)
    }

    /// Register a derivative of an existing record.
    ///
    /// `parent_hash` should be a hash the caller obtained from this ledger;
    /// its existence is not enforced, and ancestry walks tolerate a missing
    /// parent.
    pub fn register_derivative(
        &mut self,
        bytes: &[u8],
        media_type: MediaType,
        parent_hash: &str,
        author: &str,
        transformations: Vec<TransformationEvent>,
        title: &str,
    ) -> Result<ContentRecord> {
        let fallback_key_id = format!("pub_key_{}_DERIV", author.replace(' ', "_"));
        let metadata = RecordMetadata {
            author: author.to_string(),
            action: RecordAction::Edit,
            details: "Derivative work registered via creator toolchain.".to_string(),
            location: None,
            device_model: None,
        };
        self.register(
            bytes,
            media_type,
            Some(parent_hash.to_string()),
            transformations,
            fallback_key_id,
            metadata,
            title,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn register(
        &mut self,
        bytes: &[u8],
        media_type: MediaType,
        parent_hash: Option<String>,
        transformations: Vec<TransformationEvent>,
        fallback_key_id: String,
        metadata: RecordMetadata,
        title: &str,
    ) -> Result<ContentRecord> {
        let content_hash = hash_content(bytes);
        let is_derivative = parent_hash.is_some();

        // Everything fallible happens before the map or the index is
        // touched: a failure from here on leaves both exactly as they were.
        let fingerprint = query_fingerprint(media_type, bytes);
        let acoustic = match media_type {
            MediaType::Video => Some(acoustic_fingerprint(bytes)),
            _ => None,
        };

        let signing_key_id = match &self.signing_key {
            Some(key) => key.ledger_key_id(),
            None => fallback_key_id,
        };
        let signature = mock_signature(&signing_key_id, &content_hash);

        let manifest = ProvenanceManifest::new(title, &content_hash, &metadata.author, &transformations);
        let manifest_digest = manifest.digest()?;

        let registered_at = Utc::now();
        let ledger_ref = format!(
            "0x{}",
            digest_hex(format!("{content_hash}:{}", registered_at.timestamp_millis()).as_bytes())
        );
        let network_fee = estimate_fee(bytes.len() as u64, is_derivative);

        let record = ContentRecord {
            content_hash: content_hash.clone(),
            signing_key_id,
            registered_at,
            signature,
            media_type,
            ledger_ref,
            parent_hash,
            transformations,
            fingerprint: Some(fingerprint.clone()),
            acoustic_fingerprint: acoustic,
            network_fee,
            manifest,
            manifest_digest,
            metadata,
        };

        // Last write wins on re-registration; the index only ever appends.
        self.records.insert(content_hash.clone(), record.clone());
        self.index.insert(media_type, fingerprint, content_hash.clone());

        info!(
            hash = %content_hash,
            media_type = %media_type,
            derivative = is_derivative,
            "Content registered"
        );
        Ok(record)
    }

    /// Verify a byte source end to end.
    ///
    /// Looks the content hash up on the ledger, queries the fingerprint
    /// index, recomputes the manifest digest, obtains an authenticity
    /// opinion, and resolves the trust verdict. Analyzer failure is
    /// recovered locally with the neutral fallback opinion and never fails
    /// the verification itself.
    pub async fn verify<A>(
        &self,
        bytes: &[u8],
        media_type: MediaType,
        analyzer: &A,
    ) -> Result<VerificationOutcome>
    where
        A: AuthenticityAnalyzer + ?Sized,
    {
        let content_hash = hash_content(bytes);
        let record = self.records.get(&content_hash);
        debug!(hash = %content_hash, record_found = record.is_some(), "Ledger lookup");

        let query = query_fingerprint(media_type, bytes);
        let similarity = self.index.lookup(media_type, &query, &content_hash);

        let manifest_integrity = match record {
            Some(r) => r.manifest.digest()? == r.manifest_digest,
            None => false,
        };

        let opinion = match analyzer.assess(bytes, media_type).await {
            Ok(opinion) => opinion,
            Err(e) => {
                warn!(error = %e, "Authenticity analysis failed; substituting neutral opinion");
                AuthenticityOpinion::fallback(e)
            }
        };

        let verdict = decide(record, similarity.as_ref(), manifest_integrity, opinion.score);
        debug!(
            hash = %content_hash,
            status = %verdict.status,
            score = verdict.score,
            "Verification resolved"
        );

        let matched_record = similarity
            .as_ref()
            .and_then(|m| self.records.get(&m.matched_hash))
            .cloned();

        Ok(VerificationOutcome {
            content_hash,
            media_type,
            record: record.cloned(),
            similarity,
            matched_record,
            manifest_integrity,
            opinion,
            trust_score: verdict.score,
            status: verdict.status,
        })
    }

    /// Ancestry chain starting at `content_hash`, following parent links,
    /// nearest first.
    ///
    /// The walk stops at a missing parent and refuses to revisit a hash, so
    /// a malformed graph containing a cycle still terminates.
    pub fn lineage(&self, content_hash: &str) -> Vec<&ContentRecord> {
        let mut chain = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut cursor = content_hash;

        while seen.insert(cursor) {
            let Some(record) = self.records.get(cursor) else {
                break;
            };
            chain.push(record);
            match &record.parent_hash {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        chain
    }

    /// Serialize the ledger to CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)
            .map_err(|e| ProvenantError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Deserialize a ledger from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| ProvenantError::Serialization(e.to_string()))
    }
}
