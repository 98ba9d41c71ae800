//! Create a fresh state file.

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use lumen_state::StateDocument;

#[derive(Args)]
pub struct InitArgs {
    /// Path of the state file to create
    #[arg(value_name = "FILE")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "'{}' already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let document = StateDocument::default_state();
    document.save(&args.output)?;
    tracing::info!(path = %args.output.display(), "initialized default state");
    println!("wrote {}", args.output.display());
    Ok(())
}
