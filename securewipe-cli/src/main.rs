//! securewipe CLI - runs the SecureWipe certificate API
//!
//! Configuration comes from flags, the environment and `.env` files
//! (current directory, then `~/.securewipe/.env`).

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(
    name = "securewipe",
    author,
    version,
    about = "REST API for storing and listing data-wipe certificates"
)]
struct Cli {
    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing: clap reads DATABASE_URL and friends from the environment
    let dotenv = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;
    dotenv.log();

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
    }
}
