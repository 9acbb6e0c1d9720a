//! Signing gate and hardware key identity.
//!
//! Registration is gated on a user-presence confirmation against a
//! hardware-backed key. Both sides are simulated: the gate is a binary
//! approve/deny capability and the "signature" is an opaque stand-in
//! derived from the key id and content hash. No real key material exists
//! anywhere in the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::hash::digest_hex;

/// Hardware store backing a signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardwareKeyStore {
    #[serde(rename = "APPLE_SECURE_ENCLAVE")]
    AppleSecureEnclave,
    #[serde(rename = "ANDROID_STRONGBOX")]
    AndroidStrongbox,
    #[serde(rename = "TPM_2.0")]
    Tpm2,
}

impl std::fmt::Display for HardwareKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AppleSecureEnclave => write!(f, "APPLE_SECURE_ENCLAVE"),
            Self::AndroidStrongbox => write!(f, "ANDROID_STRONGBOX"),
            Self::Tpm2 => write!(f, "TPM_2.0"),
        }
    }
}

/// Metadata of a provisioned signing key. The key itself never leaves its
/// (simulated) hardware store; only this metadata is visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningKeyInfo {
    pub key_id: String,
    pub hardware: HardwareKeyStore,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

impl SigningKeyInfo {
    /// Provision a new key in the given hardware store.
    pub fn provision(owner: impl Into<String>, hardware: HardwareKeyStore) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self {
            key_id: format!("k_{}", token[..8].to_uppercase()),
            hardware,
            owner: owner.into(),
            created_at: Utc::now(),
        }
    }

    /// Key identifier as recorded on ledger records.
    pub fn ledger_key_id(&self) -> String {
        format!("{} ({})", self.key_id, self.hardware)
    }
}

/// User-presence gate in front of the signing key.
///
/// Callers must pass this gate before registering content; a declined
/// prompt means the registration never starts and the ledger stays
/// untouched.
#[async_trait]
pub trait SigningGate: Send + Sync {
    /// Ask the platform to confirm user presence. `Ok(false)` means the
    /// user declined; errors mean the gate itself failed.
    async fn confirm_presence(&self) -> Result<bool>;
}

/// Gate that always answers the same way. Testing and demos only.
pub struct MockGate {
    approve: bool,
}

impl MockGate {
    pub fn new(approve: bool) -> Self {
        Self { approve }
    }
}

impl Default for MockGate {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl SigningGate for MockGate {
    async fn confirm_presence(&self) -> Result<bool> {
        Ok(self.approve)
    }
}

/// Opaque signature stand-in bound to the signing key and content hash.
/// Deterministic so identical registrations are reproducible.
pub fn mock_signature(key_id: &str, content_hash: &str) -> String {
    let tag = digest_hex(format!("{key_id}:{content_hash}").as_bytes());
    let prefix: String = content_hash.chars().take(8).collect();
    format!("ecdsa_sig_0x{prefix}...{}", &tag[..12])
}
