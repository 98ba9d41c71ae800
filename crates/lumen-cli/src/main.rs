//! Lumen CLI - host harness for the lumen scene/modulation engine.
//!
//! Owns the pieces the engine deliberately does not: the wall clock, file
//! paths, and an output sink for rendered parameter frames.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "Lumen scene engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh state file with the default scene
    Init(commands::init::InitArgs),

    /// Summarize the scenes, routing, and autoplay settings of a state file
    Info(commands::info::InfoArgs),

    /// Evaluate the engine over time and emit parameter frames as JSON lines
    Render(commands::render::RenderArgs),

    /// Randomize the active scene and write the state back
    Randomize(commands::randomize::RandomizeArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Randomize(args) => commands::randomize::run(args),
    }
}
