//! Fee command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use provenant_core::estimate_fee;

/// Execute the fee command.
pub fn execute(file: PathBuf, derivative: bool) -> Result<()> {
    let size = std::fs::metadata(&file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?
        .len();

    let fee = estimate_fee(size, derivative);
    println!(
        "{} {} credits ({} bytes{})",
        "Estimated fee:".bold(),
        fee,
        size,
        if derivative { ", derivative" } else { "" }
    );

    Ok(())
}
