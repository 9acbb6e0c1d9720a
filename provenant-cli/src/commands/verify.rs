//! Verify command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use provenant_core::{
    AnalyzerConfig, AnalyzerFactory, AuthenticityAnalyzer, VerificationOutcome,
    VerificationStatus,
};
use tracing::{debug, info};

use crate::utils::{
    detect_media_type, format_timestamp, load_ledger, read_media, short_hash, MediaTypeArg,
};

/// Execute the verify command.
pub async fn execute(
    ledger_path: &Path,
    file: PathBuf,
    mock_score: Option<f64>,
    media_type: Option<MediaTypeArg>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let content = read_media(&file)?;
    let media_type = media_type
        .map(Into::into)
        .unwrap_or_else(|| detect_media_type(&file));
    debug!(media_type = %media_type, "Verifying");

    let ledger = load_ledger(ledger_path)?;

    let analyzer: Arc<dyn AuthenticityAnalyzer> = match mock_score {
        Some(score) => AnalyzerFactory::create(AnalyzerConfig::Mock { score })
            .context("Failed to create analyzer")?,
        None => AnalyzerFactory::create(AnalyzerConfig::Auto)
            .context("Failed to create analyzer")?,
    };

    let outcome = ledger
        .verify(&content, media_type, analyzer.as_ref())
        .await
        .context("Verification failed")?;

    info!(
        hash = %outcome.content_hash,
        status = %outcome.status,
        score = outcome.trust_score,
        "Verification resolved"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !quiet {
        print_outcome(&outcome);
    }

    match outcome.status {
        VerificationStatus::Verified => Ok(()),
        status => bail!("verification resolved to {status}"),
    }
}

fn print_outcome(outcome: &VerificationOutcome) {
    println!();
    match outcome.status {
        VerificationStatus::Verified => {
            println!("{}", "╔════════════════════════════════════════╗".green());
            println!(
                "{}",
                "║               VERIFIED                 ║".green().bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".green());
        }
        VerificationStatus::Tampered => {
            println!("{}", "╔════════════════════════════════════════╗".red());
            println!(
                "{}",
                "║               TAMPERED                 ║".red().bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".red());
        }
        VerificationStatus::Suspect => {
            println!("{}", "╔════════════════════════════════════════╗".yellow());
            println!(
                "{}",
                "║               SUSPECT                  ║".yellow().bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".yellow());
        }
        VerificationStatus::Unverified => {
            println!("{}", "╔════════════════════════════════════════╗".dimmed());
            println!(
                "{}",
                "║              UNVERIFIED                ║".bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".dimmed());
        }
    }
    println!();

    println!(
        "   {} {}/100",
        "Trust score:".dimmed(),
        outcome.trust_score
    );
    println!(
        "   {} {}",
        "Content hash:".dimmed(),
        short_hash(&outcome.content_hash)
    );
    println!(
        "   {} {}",
        "Ledger record:".dimmed(),
        if outcome.record.is_some() {
            "found".green()
        } else {
            "none".red()
        }
    );
    match &outcome.similarity {
        Some(similarity) => println!(
            "   {} {:.4} ({:?})",
            "Fingerprint match:".dimmed(),
            similarity.score,
            similarity.kind
        ),
        None => println!("   {} {}", "Fingerprint match:".dimmed(), "none".dimmed()),
    }
    println!(
        "   {} {}",
        "Manifest integrity:".dimmed(),
        if outcome.manifest_integrity {
            "intact".green()
        } else {
            "not established".red()
        }
    );
    println!(
        "   {} {:.0}/100 via {}",
        "Authenticity opinion:".dimmed(),
        outcome.opinion.score,
        outcome.opinion.source
    );
    for anomaly in &outcome.opinion.anomalies {
        println!("     {} {}", "-".dimmed(), anomaly);
    }

    if let Some(record) = outcome.record.as_ref().or(outcome.matched_record.as_ref()) {
        println!();
        println!(
            "   {} {} by {} at {}",
            "Provenance:".dimmed(),
            record.metadata.author,
            record.signing_key_id,
            format_timestamp(record.registered_at)
        );
        if let Some(parent) = &record.parent_hash {
            println!(
                "   {} {} ({} transformations)",
                "Derived from:".dimmed(),
                short_hash(parent),
                record.transformations.len()
            );
        }
    }
}
