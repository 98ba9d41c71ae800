//! Summarize a state file.

use std::path::PathBuf;

use clap::Args;
use lumen_state::StateDocument;

#[derive(Args)]
pub struct InfoArgs {
    /// State file to inspect
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let document = StateDocument::load(&args.input)?;

    println!("scenes: {}", document.scenes.len());
    for (index, id) in document.scenes.ids().iter().enumerate() {
        let Some(scene) = document.scenes.get(id) else {
            continue;
        };
        let marker = if id == document.scenes.active_id() {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} [{index}] {id}  \"{}\"  bombacity {:.2}  modulators {}",
            scene.name,
            scene.bombacity(),
            scene.modulators.len()
        );
        for (mod_index, modulator) in scene.modulators.iter().enumerate() {
            let routes: Vec<String> = modulator
                .routes()
                .map(|(key, depth)| format!("{key}:{depth:+.2}"))
                .collect();
            println!(
                "      mod {mod_index}: {:?} period {:.2}  routes [{}]",
                modulator.lfo.shape(),
                modulator.lfo.period(),
                routes.join(", ")
            );
        }
    }

    let auto = &document.auto;
    println!(
        "auto: {}  period {:.2}s  bombacity {:.2}",
        if auto.enabled { "enabled" } else { "disabled" },
        auto.period,
        auto.bombacity
    );
    Ok(())
}
