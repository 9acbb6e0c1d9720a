//! In-memory fingerprint similarity index.
//!
//! Append-only collection of (media type, feature vector, content hash)
//! entries. Queries scan entries of the matching media type and return the
//! best cosine match; a result only counts as a match above the fixed
//! threshold.

use serde::{Deserialize, Serialize};

use crate::fingerprint::cosine_similarity;
use crate::record::MediaType;

/// Cosine score a candidate must exceed (strictly) to count as a match.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// How a similarity match relates to the query content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchKind {
    /// The matched entry belongs to the exact same content hash.
    Exact,
    /// The matched entry belongs to different bytes from a recognized source.
    Derivative,
}

/// Best index hit above the match threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// Cosine similarity of the winning entry, in (threshold, 1].
    pub score: f64,
    /// Content hash the winning entry points at.
    pub matched_hash: String,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    media_type: MediaType,
    vector: Vec<f64>,
    content_hash: String,
}

/// Append-only fingerprint index.
///
/// Entries are never updated or removed; re-registering content appends a
/// second entry for the same hash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityIndex {
    entries: Vec<IndexEntry>,
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry. O(1), never fails.
    pub fn insert(
        &mut self,
        media_type: MediaType,
        vector: Vec<f64>,
        content_hash: impl Into<String>,
    ) {
        self.entries.push(IndexEntry {
            media_type,
            vector,
            content_hash: content_hash.into(),
        });
    }

    /// Highest-scoring entry of the same media type, if any, regardless of
    /// threshold. Ties keep the first-inserted entry: the scan is in
    /// insertion order and only a strictly better score replaces the
    /// current best.
    pub fn best_match(&self, media_type: MediaType, vector: &[f64]) -> Option<(f64, &str)> {
        let mut best: Option<(f64, &str)> = None;
        for entry in &self.entries {
            if entry.media_type != media_type {
                continue;
            }
            let score = cosine_similarity(vector, &entry.vector);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, &entry.content_hash));
            }
        }
        best
    }

    /// Threshold-gated lookup used by verification. `query_hash` is the
    /// content hash of the bytes being verified and decides the match kind.
    pub fn lookup(
        &self,
        media_type: MediaType,
        vector: &[f64],
        query_hash: &str,
    ) -> Option<SimilarityMatch> {
        let (score, matched_hash) = self.best_match(media_type, vector)?;
        if score <= SIMILARITY_THRESHOLD {
            return None;
        }

        let kind = if matched_hash == query_hash {
            MatchKind::Exact
        } else {
            MatchKind::Derivative
        };
        Some(SimilarityMatch {
            score,
            matched_hash: matched_hash.to_string(),
            kind,
        })
    }
}
