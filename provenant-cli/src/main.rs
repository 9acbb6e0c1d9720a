//! Provenant CLI - content-provenance ledger tool.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod exit_codes;
mod utils;

use utils::{HardwareArg, MediaTypeArg};

const EXIT_CODES_HELP: &str = "Exit codes:
  0   success / VERIFIED
  65  verification did not resolve to VERIFIED
  66  cannot read an input file
  69  forensics service unavailable
  74  cannot write the ledger snapshot";

#[derive(Parser)]
#[command(name = "provenant")]
#[command(author, version, about = "Content provenance ledger", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Path to the ledger snapshot file
    #[arg(long, global = true, default_value = "provenant.ledger", value_name = "PATH")]
    ledger: PathBuf,

    /// Suppress decorative output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an original capture on the ledger
    Register {
        /// Path to the media file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Author recorded in the manifest
        #[arg(short, long)]
        author: String,

        /// Capture device label
        #[arg(short, long, default_value = "Unknown Device")]
        device: String,

        /// Manifest title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Answer the user-presence prompt with a denial (testing)
        #[arg(long, hide = true)]
        deny_presence: bool,
    },

    /// Register a derivative of an existing record
    Derive {
        /// Path to the derived media file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Content hash of the parent record
        #[arg(short, long, value_name = "HASH")]
        parent: String,

        /// Author recorded in the manifest
        #[arg(short, long)]
        author: String,

        /// Transformation as ACTION[:TOOL[:DETAILS]]; repeatable
        #[arg(short, long = "transform", value_name = "SPEC")]
        transforms: Vec<String>,

        /// Manifest title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Answer the user-presence prompt with a denial (testing)
        #[arg(long, hide = true)]
        deny_presence: bool,
    },

    /// Verify a file against the ledger
    Verify {
        /// Path to the media file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Use the mock analyzer with this authenticity score
        #[arg(long, value_name = "SCORE")]
        mock_score: Option<f64>,

        /// Override media type detection
        #[arg(long, value_enum)]
        media_type: Option<MediaTypeArg>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the ancestry chain of a record
    Lineage {
        /// Content hash to start from
        #[arg(value_name = "HASH")]
        hash: String,
    },

    /// Estimate the registration fee for a file
    Fee {
        /// Path to the media file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Price as a derivative registration
        #[arg(long)]
        derivative: bool,
    },

    /// Provision a hardware-backed signing key for this ledger
    Provision {
        /// Key owner name
        #[arg(short, long)]
        owner: String,

        /// Hardware store kind
        #[arg(long, value_enum, default_value = "apple-secure-enclave")]
        hardware: HardwareArg,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(exit_codes::ExitCode::from_anyhow(&err).code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ledger_path = cli.ledger;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Register {
            file,
            author,
            device,
            title,
            deny_presence,
        } => {
            commands::register::execute(
                &ledger_path,
                file,
                author,
                device,
                title,
                deny_presence,
                quiet,
            )
            .await
        }
        Commands::Derive {
            file,
            parent,
            author,
            transforms,
            title,
            deny_presence,
        } => {
            commands::derive::execute(
                &ledger_path,
                file,
                parent,
                author,
                transforms,
                title,
                deny_presence,
                quiet,
            )
            .await
        }
        Commands::Verify {
            file,
            mock_score,
            media_type,
            json,
        } => {
            commands::verify::execute(&ledger_path, file, mock_score, media_type, json, quiet)
                .await
        }
        Commands::Lineage { hash } => commands::lineage::execute(&ledger_path, hash, quiet),
        Commands::Fee { file, derivative } => commands::fee::execute(file, derivative),
        Commands::Provision { owner, hardware } => {
            commands::provision::execute(&ledger_path, owner, hardware, quiet)
        }
    }
}
