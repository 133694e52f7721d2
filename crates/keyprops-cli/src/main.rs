use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{clean, init, status, verify};

#[derive(Parser)]
#[command(name = "keyprops")]
#[command(version = keyprops_core::VERSION)]
#[command(about = "Release signing configuration for Flutter Android projects", long_about = None)]
struct Cli {
    /// Path to the Flutter project root
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show release signing configuration status
    Status {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the release variant can actually be signed
    Verify,

    /// Write android/key.properties from the given credentials
    Init(init::InitArgs),

    /// Remove android/key.properties
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    // Initialize tracing for better error context
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status { json } => status::handle_status(&cli.project, json).await,
        Commands::Verify => verify::handle_verify(&cli.project).await,
        Commands::Init(args) => init::handle_init(&cli.project, args).await,
        Commands::Clean => clean::handle_clean(&cli.project).await,
    }
}
