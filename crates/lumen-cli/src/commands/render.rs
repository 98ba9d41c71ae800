//! Evaluate the engine over time and emit parameter frames.
//!
//! Plays the role of the host render loop: drives the clock, feeds the
//! auto-scene controller, and hands each composed parameter snapshot to a
//! consumer as one JSON object per line on stdout.

use std::path::PathBuf;

use clap::Args;
use lumen_state::{AutoAdvanceTimer, StateDocument};
use serde_json::json;

#[derive(Args)]
pub struct RenderArgs {
    /// State file to evaluate
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Length of the rendered timeline in seconds
    #[arg(long, default_value = "4.0")]
    pub duration: f32,

    /// Evaluation ticks per second
    #[arg(long, default_value = "30.0")]
    pub rate: f32,

    /// Select this scene index before rendering (overrides the saved active)
    #[arg(long)]
    pub scene: Option<usize>,

    /// Seed for autoplay randomization (default: nondeterministic)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut document = StateDocument::load(&args.input)?;

    if let Some(index) = args.scene {
        // Out-of-range selection is a documented no-op; tell the user.
        if index >= document.scenes.len() {
            tracing::warn!(index, len = document.scenes.len(), "scene index ignored");
        }
        document.scenes.set_active_by_index(index);
    }

    let rate = args.rate.max(1.0);
    let dt = 1.0 / rate;
    let ticks = (args.duration.max(0.0) * rate).ceil() as u64;

    let mut timer = AutoAdvanceTimer::new();
    let mut rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    tracing::info!(ticks, rate, auto = document.auto.enabled, "rendering");

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    use std::io::Write;

    let mut t = 0.0f32;
    for _ in 0..ticks {
        document.tick_auto(&mut timer, dt, &mut rng);
        let Some(frame) = document.scenes.render(t) else {
            break;
        };
        let line = json!({
            "t": t,
            "scene": document.scenes.active_id(),
            "params": frame,
        });
        writeln!(lock, "{line}")?;
        t += dt;
    }
    Ok(())
}
