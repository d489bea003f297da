//! Legal Frame CLI
//!
//! Operator tool over the `legal_frame_codec` library.
//!
//! # Commands
//!
//! - `pack`: JSON document or node inputs to a binary batch
//! - `unpack`: binary batch back to JSON records
//! - `inspect`: header, record count and checksum status of a batch
//! - `project`: GPU buffer shapes for a batch, as JSON
//!
//! # Exit Codes
//! - 0: Success
//! - 1: Recoverable error (I/O, bad JSON, bad config)
//! - 2: Corrupted or foreign batch bytes

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;

/// Legal Frame CLI - pack, unpack and inspect legal frame batches
#[derive(Parser)]
#[command(name = "legal-frame")]
#[command(version)]
#[command(about = "Pack, unpack and inspect fixed-layout legal document batches")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML config file; LEGAL_FRAME_* environment variables override it
    #[arg(short, long, env = "LEGAL_FRAME_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack JSON inputs into a binary batch
    Pack(commands::pack::PackArgs),
    /// Decode a batch back to JSON records
    Unpack(commands::unpack::UnpackArgs),
    /// Show a batch header and verify its checksum
    Inspect(commands::inspect::InspectArgs),
    /// Project a batch into GPU buffers and print their shapes
    Project(commands::project::ProjectArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let exit_code = match cli.command {
        Commands::Pack(args) => {
            commands::run("pack", commands::pack::pack_command(args, config)).await
        }
        Commands::Unpack(args) => {
            commands::run("unpack", commands::unpack::unpack_command(args)).await
        }
        Commands::Inspect(args) => {
            commands::run("inspect", commands::inspect::inspect_command(args)).await
        }
        Commands::Project(args) => {
            commands::run("project", commands::project::project_command(args, config)).await
        }
    };

    std::process::exit(exit_code.into());
}
