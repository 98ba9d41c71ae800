//! Randomize the active scene of a state file in place.

use std::path::PathBuf;

use clap::Args;
use lumen_core::randomize;
use lumen_state::StateDocument;

#[derive(Args)]
pub struct RandomizeArgs {
    /// State file to modify
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Randomization strength in [0, 1]
    #[arg(long, default_value = "1.0")]
    pub strength: f32,

    /// Seed for a reproducible result (default: nondeterministic)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: RandomizeArgs) -> anyhow::Result<()> {
    let mut document = StateDocument::load(&args.input)?;

    let mut rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let strength = args.strength;
    let changed = document
        .scenes
        .with_active(|scene| {
            *scene = randomize(scene, strength, &mut rng);
            scene.name.clone()
        });

    match changed {
        Some(name) => {
            document.save(&args.input)?;
            tracing::info!(scene = %name, strength, "randomized active scene");
            println!("randomized \"{name}\"");
        }
        None => println!("no active scene; nothing to do"),
    }
    Ok(())
}
