//! Provision command implementation.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use provenant_core::SigningKeyInfo;
use tracing::info;

use crate::utils::{load_ledger, save_ledger, HardwareArg};

/// Execute the provision command.
pub fn execute(ledger_path: &Path, owner: String, hardware: HardwareArg, quiet: bool) -> Result<()> {
    let mut ledger = load_ledger(ledger_path)?;

    let key = SigningKeyInfo::provision(owner, hardware.into());
    info!(key_id = %key.key_id, hardware = %key.hardware, "Provisioned signing key");

    let summary = key.ledger_key_id();
    ledger.set_signing_key(key);
    save_ledger(ledger_path, &ledger)?;

    if !quiet {
        println!();
        println!("{}", "Signing key provisioned!".green().bold());
        println!();
        println!("   {} {}", "Key:".dimmed(), summary);
        println!(
            "   {} {}",
            "Exportable:".dimmed(),
            "never (hardware-bound)".dimmed()
        );
    }

    Ok(())
}
