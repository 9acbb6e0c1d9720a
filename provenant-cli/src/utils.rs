//! Shared CLI helpers.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use provenant_core::{
    HardwareKeyStore, MediaType, ProvenanceLedger, TransformationEvent, TransformationKind,
};
use tracing::{debug, info};

/// Media type override accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MediaTypeArg {
    Image,
    Video,
    Audio,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Image => MediaType::Image,
            MediaTypeArg::Video => MediaType::Video,
            MediaTypeArg::Audio => MediaType::Audio,
        }
    }
}

/// Hardware store accepted by `provision`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HardwareArg {
    AppleSecureEnclave,
    AndroidStrongbox,
    Tpm2,
}

impl From<HardwareArg> for HardwareKeyStore {
    fn from(arg: HardwareArg) -> Self {
        match arg {
            HardwareArg::AppleSecureEnclave => HardwareKeyStore::AppleSecureEnclave,
            HardwareArg::AndroidStrongbox => HardwareKeyStore::AndroidStrongbox,
            HardwareArg::Tpm2 => HardwareKeyStore::Tpm2,
        }
    }
}

/// Detect media type from file extension.
pub fn detect_media_type(path: &Path) -> MediaType {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "tiff" | "svg") => MediaType::Image,
        Some("mp4" | "mov" | "avi" | "mkv" | "webm" | "flv" | "wmv") => MediaType::Video,
        Some("mp3" | "wav" | "flac" | "aac" | "ogg" | "m4a") => MediaType::Audio,
        _ => MediaType::Image, // Default to image
    }
}

/// Load the ledger snapshot, or start a fresh ledger if none exists yet.
pub fn load_ledger(path: &Path) -> Result<ProvenanceLedger> {
    if !path.exists() {
        debug!(path = %path.display(), "No snapshot found, starting fresh ledger");
        return Ok(ProvenanceLedger::new());
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read ledger snapshot: {}", path.display()))?;
    let ledger = ProvenanceLedger::from_cbor(&bytes)
        .with_context(|| format!("Failed to parse ledger snapshot: {}", path.display()))?;

    info!(path = %path.display(), records = ledger.len(), "Loaded ledger snapshot");
    Ok(ledger)
}

/// Persist the ledger snapshot.
pub fn save_ledger(path: &Path, ledger: &ProvenanceLedger) -> Result<()> {
    let bytes = ledger
        .to_cbor()
        .context("Failed to serialize ledger snapshot")?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write ledger snapshot: {}", path.display()))?;

    debug!(path = %path.display(), records = ledger.len(), "Saved ledger snapshot");
    Ok(())
}

/// Read a media file into memory.
pub fn read_media(path: &Path) -> Result<Vec<u8>> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "Read file");
    Ok(content)
}

/// Leading slice of a content hash for terse display.
pub fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(16)]
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse a `ACTION[:TOOL[:DETAILS]]` transformation spec.
pub fn parse_transform(spec: &str) -> Result<TransformationEvent> {
    let mut parts = spec.splitn(3, ':');
    let action = parts.next().unwrap_or_default();

    let kind = match action.to_lowercase().as_str() {
        "crop" => TransformationKind::Crop,
        "trim" => TransformationKind::Trim,
        "filter" => TransformationKind::Filter,
        "compression" => TransformationKind::Compression,
        "audio_mix" | "audio-mix" => TransformationKind::AudioMix,
        "derivative" => TransformationKind::Derivative,
        other => anyhow::bail!(
            "Unknown transformation '{other}' (expected crop, trim, filter, compression, audio_mix or derivative)"
        ),
    };

    let tool = parts.next().unwrap_or("unspecified-tool");
    let details = parts.next().unwrap_or("");

    Ok(TransformationEvent {
        timestamp: Utc::now(),
        kind,
        details: details.to_string(),
        tool_signature: tool.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_media_type_by_extension() {
        assert_eq!(
            detect_media_type(&PathBuf::from("a.JPG")),
            MediaType::Image
        );
        assert_eq!(detect_media_type(&PathBuf::from("a.mp4")), MediaType::Video);
        assert_eq!(detect_media_type(&PathBuf::from("a.flac")), MediaType::Audio);
        assert_eq!(detect_media_type(&PathBuf::from("a.dat")), MediaType::Image);
    }

    #[test]
    fn test_parse_transform_full_spec() {
        let event = parse_transform("crop:photoshop/25.1:Cropped to 16:9").unwrap();
        assert_eq!(event.kind, TransformationKind::Crop);
        assert_eq!(event.tool_signature, "photoshop/25.1");
        assert_eq!(event.details, "Cropped to 16:9");
    }

    #[test]
    fn test_parse_transform_action_only() {
        let event = parse_transform("trim").unwrap();
        assert_eq!(event.kind, TransformationKind::Trim);
        assert_eq!(event.tool_signature, "unspecified-tool");
    }

    #[test]
    fn test_parse_transform_rejects_unknown_action() {
        assert!(parse_transform("sharpen").is_err());
    }

    #[test]
    fn test_short_hash_handles_short_input() {
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash("0123456789abcdef0123"), "0123456789abcdef");
    }
}
