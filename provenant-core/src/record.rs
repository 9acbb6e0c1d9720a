//! Ledger record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manifest::ProvenanceManifest;

/// Media class of a registered asset. Immutable once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "IMAGE"),
            Self::Video => write!(f, "VIDEO"),
            Self::Audio => write!(f, "AUDIO"),
        }
    }
}

/// Kind of edit recorded in a derivative's audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformationKind {
    Crop,
    Trim,
    Filter,
    Compression,
    AudioMix,
    Derivative,
}

impl TransformationKind {
    /// Action label used in the manifest actions assertion.
    pub fn action_label(&self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Trim => "trim",
            Self::Filter => "filter",
            Self::Compression => "compression",
            Self::AudioMix => "audio_mix",
            Self::Derivative => "derivative",
        }
    }
}

/// One entry in a derivative's transformation audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: TransformationKind,
    /// Human-readable description of the edit.
    pub details: String,
    /// Identifier of the authoring tool that produced the edit.
    pub tool_signature: String,
}

/// Action recorded in the technical metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordAction {
    Capture,
    Edit,
    Publish,
}

/// Technical metadata attached to a record at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub author: String,
    pub action: RecordAction,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
}

/// One ledger entry per registered asset.
///
/// Created exactly once at registration (original or derivative) and never
/// mutated or deleted afterwards. `content_hash` is the primary key;
/// registering the same bytes again replaces the entry wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Content root digest, lowercase hex.
    pub content_hash: String,
    /// Identifier of the key that authorized the registration.
    pub signing_key_id: String,
    pub registered_at: DateTime<Utc>,
    /// Opaque signature stand-in; no real key material is involved.
    pub signature: String,
    pub media_type: MediaType,
    /// Transaction-style reference on the ledger.
    pub ledger_ref: String,
    /// Present only on derivative registrations. May reference a hash that
    /// is no longer resolvable; ancestry walks must tolerate that.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_hash: Option<String>,
    /// Audit trail of edits; empty for originals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<TransformationEvent>,
    /// Type-specific source fingerprint, when extraction produced one.
    pub fingerprint: Option<Vec<f64>>,
    /// Secondary acoustic vector computed for video registrations; stored
    /// for forensics but never indexed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acoustic_fingerprint: Option<Vec<f64>>,
    /// Fee charged at registration, in ledger credits.
    pub network_fee: f64,
    pub manifest: ProvenanceManifest,
    /// Digest of the serialized manifest; the anchor for metadata tamper
    /// detection, independent of the content bytes.
    pub manifest_digest: String,
    pub metadata: RecordMetadata,
}

impl ContentRecord {
    pub fn is_derivative(&self) -> bool {
        self.parent_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&MediaType::Image).unwrap(),
            "\"IMAGE\""
        );
        assert_eq!(MediaType::Audio.to_string(), "AUDIO");
    }

    #[test]
    fn test_transformation_kind_labels() {
        assert_eq!(TransformationKind::AudioMix.action_label(), "audio_mix");
        assert_eq!(
            serde_json::to_string(&TransformationKind::AudioMix).unwrap(),
            "\"AUDIO_MIX\""
        );
    }
}
