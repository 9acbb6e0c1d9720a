//! Derive command implementation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use colored::Colorize;
use provenant_core::{
    MockGate, SigningGate, TransformationEvent, TransformationKind,
};
use tracing::{debug, info, warn};

use crate::utils::{
    detect_media_type, load_ledger, parse_transform, read_media, save_ledger, short_hash,
};

/// Execute the derive command.
#[allow(clippy::too_many_arguments)]
pub async fn execute(
    ledger_path: &Path,
    file: PathBuf,
    parent: String,
    author: String,
    transforms: Vec<String>,
    title: Option<String>,
    deny_presence: bool,
    quiet: bool,
) -> Result<()> {
    let content = read_media(&file)?;
    let media_type = detect_media_type(&file);
    debug!(media_type = %media_type, parent = %parent, "Detected media type");

    let title = title.unwrap_or_else(|| {
        file.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("untitled")
            .to_string()
    });

    let transformations: Vec<TransformationEvent> = if transforms.is_empty() {
        vec![TransformationEvent {
            timestamp: Utc::now(),
            kind: TransformationKind::Derivative,
            details: "Derivative work registered.".to_string(),
            tool_signature: "provenant-cli".to_string(),
        }]
    } else {
        transforms
            .iter()
            .map(|spec| parse_transform(spec))
            .collect::<Result<_>>()?
    };

    let mut ledger = load_ledger(ledger_path)?;

    if ledger.get(&parent).is_none() {
        warn!(parent = %parent, "Parent hash not found on this ledger");
        if !quiet {
            eprintln!(
                "{}",
                "warning: parent hash is not on this ledger; lineage will stop there".yellow()
            );
        }
    }

    let gate = MockGate::new(!deny_presence);
    if !gate.confirm_presence().await? {
        warn!("User presence declined; registration aborted");
        bail!("user presence declined; nothing was registered");
    }

    let record = ledger
        .register_derivative(&content, media_type, &parent, &author, transformations, &title)
        .context("Registration failed")?;
    save_ledger(ledger_path, &ledger)?;

    info!(hash = %record.content_hash, parent = %parent, "Derivative registration committed");

    if !quiet {
        println!();
        println!("{}", "Derivative registered on the ledger!".green().bold());
        println!();
        println!("   {} {}", "Content hash:".dimmed(), record.content_hash);
        println!("   {} {}", "Parent hash:".dimmed(), short_hash(&parent));
        println!(
            "   {} {}",
            "Transformations:".dimmed(),
            record.transformations.len()
        );
        println!(
            "   {} {} credits",
            "Fee paid:".dimmed(),
            record.network_fee
        );
    }

    Ok(())
}
