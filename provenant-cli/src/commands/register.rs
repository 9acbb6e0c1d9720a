//! Register command implementation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use provenant_core::{estimate_fee, MockGate, SigningGate};
use tracing::{debug, info, warn};

use crate::utils::{
    detect_media_type, format_timestamp, load_ledger, read_media, save_ledger, short_hash,
};

/// Execute the register command.
pub async fn execute(
    ledger_path: &Path,
    file: PathBuf,
    author: String,
    device: String,
    title: Option<String>,
    deny_presence: bool,
    quiet: bool,
) -> Result<()> {
    let content = read_media(&file)?;
    let media_type = detect_media_type(&file);
    debug!(media_type = %media_type, "Detected media type");

    let title = title.unwrap_or_else(|| {
        file.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("untitled")
            .to_string()
    });

    let mut ledger = load_ledger(ledger_path)?;

    // The user-presence gate comes first: a declined prompt aborts before
    // the ledger is touched.
    let gate = MockGate::new(!deny_presence);
    if !gate.confirm_presence().await? {
        warn!("User presence declined; registration aborted");
        bail!("user presence declined; nothing was registered");
    }

    let fee = estimate_fee(content.len() as u64, false);
    let record = ledger
        .register_original(&content, media_type, &author, &device, &title)
        .context("Registration failed")?;
    save_ledger(ledger_path, &ledger)?;

    info!(hash = %record.content_hash, "Registration committed");

    if !quiet {
        println!();
        println!("{}", "Content registered on the ledger!".green().bold());
        println!();
        println!("   {} {}", "Content hash:".dimmed(), record.content_hash);
        println!("   {} {}", "Media type:".dimmed(), record.media_type);
        println!("   {} {}", "Signing key:".dimmed(), record.signing_key_id);
        println!("   {} {} credits", "Fee paid:".dimmed(), fee);
        println!(
            "   {} {}",
            "Manifest:".dimmed(),
            record.manifest.instance_id
        );
        println!(
            "   {} {}",
            "Registered at:".dimmed(),
            format_timestamp(record.registered_at)
        );
        println!(
            "   {} {}",
            "Ledger ref:".dimmed(),
            short_hash(&record.ledger_ref)
        );
    }

    Ok(())
}
