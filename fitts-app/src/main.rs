mod app;
pub use app::{App, Settings};

use anyhow::Context;
use clap::Parser;
use fitts_experiment::ExperimentConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fitts-app",
    version,
    about = "Fitts' Law target acquisition experiment"
)]
struct Args {
    /// Participant identifier written to every trial record
    #[arg(short, long)]
    participant: String,

    /// JSON experiment configuration; defaults apply to missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trial log, appended to across sessions
    #[arg(short, long, default_value = "fitts_law_experiment_data.csv")]
    log: PathBuf,

    /// Seed for target placement and trial order
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => ExperimentConfig::default(),
    }
    .with_participant(args.participant);

    let app = App::new(Settings {
        config,
        log_path: args.log,
        seed: args.seed,
    });
    app.run()?;

    Ok(())
}
