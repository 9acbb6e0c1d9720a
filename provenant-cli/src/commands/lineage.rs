//! Lineage command implementation.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;

use crate::utils::{format_timestamp, load_ledger, short_hash};

/// Execute the lineage command.
pub fn execute(ledger_path: &Path, hash: String, quiet: bool) -> Result<()> {
    let ledger = load_ledger(ledger_path)?;
    let chain = ledger.lineage(&hash);

    if chain.is_empty() {
        bail!("no record found for hash {hash}");
    }

    if !quiet {
        println!();
        println!("{}", "Provenance chain".bold());
        println!();
        for (depth, record) in chain.iter().enumerate() {
            let marker = if depth == 0 { "●" } else { "└─" };
            let indent = "  ".repeat(depth);
            println!(
                "{indent}{} {} {} by {} at {}",
                marker.cyan(),
                short_hash(&record.content_hash),
                record.media_type,
                record.metadata.author,
                format_timestamp(record.registered_at)
            );
            for event in &record.transformations {
                println!(
                    "{indent}    {} {} ({}) {}",
                    "·".dimmed(),
                    event.kind.action_label(),
                    event.tool_signature,
                    event.details.dimmed()
                );
            }
        }
        if chain
            .last()
            .and_then(|record| record.parent_hash.as_ref())
            .is_some()
        {
            println!();
            println!(
                "{}",
                "note: chain ends at a parent that is not on this ledger".yellow()
            );
        }
    }

    Ok(())
}
