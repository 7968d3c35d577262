//! SC2Bank CLI - verify and re-sign StarCraft II bank files.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;
mod rewrite;

use commands::{canonicalize, inspect, sign, verify, IdentityArgs, UsageError};

#[derive(Parser)]
#[command(name = "sc2bank")]
#[command(about = "Verify and recompute SC2Bank signatures")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the computed signature with the recorded one
    Verify {
        /// Path of the SC2Bank to verify ("-" reads stdin)
        #[arg(value_name = "SC2BANK")]
        sc2bank: String,
        #[command(flatten)]
        identity: IdentityArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the identity derivable from a bank path
    Inspect {
        /// Path of an SC2Bank (need not exist)
        path: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the canonical text that is hashed
    Canonicalize {
        /// Path of the SC2Bank ("-" reads stdin)
        #[arg(value_name = "SC2BANK")]
        sc2bank: String,
        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// Replace the recorded signature with the computed one
    Sign {
        /// Path of the SC2Bank to sign
        #[arg(value_name = "SC2BANK")]
        sc2bank: String,
        #[command(flatten)]
        identity: IdentityArgs,
        /// Write the signed bank here instead of in place
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--log-level`.
fn init_tracing(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .map_err(|e| format!("invalid log level filter {}: {}", log_level, e))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    let result = match cli.command {
        Commands::Verify {
            sc2bank,
            identity,
            json,
        } => verify::run(sc2bank, identity, json),
        Commands::Inspect { path, json } => inspect::run(path, json),
        Commands::Canonicalize { sc2bank, identity } => canonicalize::run(sc2bank, identity),
        Commands::Sign {
            sc2bank,
            identity,
            output,
        } => sign::run(sc2bank, identity, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.downcast_ref::<UsageError>().is_some() {
            eprintln!("Run 'sc2bank --help' for usage.");
            std::process::exit(2);
        }
        std::process::exit(1);
    }
}
