//! Provenance manifests.
//!
//! Every registration attaches a C2PA-style manifest describing who created
//! the asset and which actions produced it. The digest of the serialized
//! manifest is stored next to it on the record; verification recomputes the
//! digest to detect metadata tampering independent of the content bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ProvenantError, Result};
use crate::hash::digest_hex;
use crate::record::TransformationEvent;

/// Claim generator recorded in every manifest.
pub const CLAIM_GENERATOR: &str = concat!("Provenant Ledger Core v", env!("CARGO_PKG_VERSION"));

/// Manifest container format identifier.
pub const MANIFEST_FORMAT: &str = "application/c2pa";

/// Issuer named in the manifest signature info.
pub const SIGNATURE_ISSUER: &str = "Provenant Trust Anchor CA";

/// Label of the actions assertion.
pub const ACTIONS_LABEL: &str = "c2pa.actions";

/// Label of the creative-work assertion.
pub const CREATIVE_WORK_LABEL: &str = "stds.schema-org.CreativeWork";

/// One labeled assertion inside a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestAssertion {
    pub label: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub issuer: String,
    pub time: DateTime<Utc>,
}

/// Metadata manifest attached to a ledger record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceManifest {
    pub claim_generator: String,
    pub format: String,
    /// `urn:uuid:` instance identifier, unique per registration.
    pub instance_id: String,
    pub title: String,
    pub assertions: Vec<ManifestAssertion>,
    pub signature_info: SignatureInfo,
}

impl ProvenanceManifest {
    /// Build a manifest for a registration.
    ///
    /// With an empty transformation list the actions assertion records a
    /// single `c2pa.created` action; otherwise one action per
    /// transformation, in audit-trail order.
    pub fn new(
        title: impl Into<String>,
        content_hash: &str,
        author: &str,
        transformations: &[TransformationEvent],
    ) -> Self {
        let actions: Vec<serde_json::Value> = if transformations.is_empty() {
            vec![json!({
                "action": "c2pa.created",
                "when": Utc::now().to_rfc3339(),
            })]
        } else {
            transformations
                .iter()
                .map(|t| {
                    json!({
                        "action": t.kind.action_label(),
                        "softwareAgent": t.tool_signature,
                        "when": t.timestamp.to_rfc3339(),
                    })
                })
                .collect()
        };

        let assertions = vec![
            ManifestAssertion {
                label: ACTIONS_LABEL.to_string(),
                data: json!({ "actions": actions }),
            },
            ManifestAssertion {
                label: CREATIVE_WORK_LABEL.to_string(),
                data: json!({
                    "@context": "http://schema.org/",
                    "@type": "CreativeWork",
                    "author": [{ "@type": "Person", "name": author }],
                    "identifier": content_hash,
                }),
            },
        ];

        Self {
            claim_generator: CLAIM_GENERATOR.to_string(),
            format: MANIFEST_FORMAT.to_string(),
            instance_id: format!("urn:uuid:{}", Uuid::new_v4()),
            title: title.into(),
            assertions,
            signature_info: SignatureInfo {
                issuer: SIGNATURE_ISSUER.to_string(),
                time: Utc::now(),
            },
        }
    }

    /// Hex digest of the manifest's JSON serialization.
    ///
    /// Struct field order is fixed, so the serialization — and therefore
    /// the digest — is stable for an unmodified manifest.
    pub fn digest(&self) -> Result<String> {
        let encoded = serde_json::to_string(self)
            .map_err(|e| ProvenantError::Serialization(e.to_string()))?;
        Ok(digest_hex(encoded.as_bytes()))
    }
}
