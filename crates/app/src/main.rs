//! trivia: a terminal quiz comparing countries and US states.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trivia_core::dataset::LocationDataset;

use services::{QuestionBank, SeededSelector, SessionEngine};

mod config;
mod play;
mod render;

#[derive(Parser)]
#[command(name = "trivia", version, about = "Which place is bigger? A population, GDP and area quiz")]
struct Cli {
    /// Config file path
    #[arg(long, env = "TRIVIA_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a quiz session (default)
    Play(PlayArgs),

    /// Load the built-in data and question sets and report what was found
    Check,
}

#[derive(Args, Debug, Default)]
struct PlayArgs {
    /// Seconds the answer stays on screen before auto-advancing
    #[arg(long)]
    delay: Option<f64>,

    /// Move to the next question after the delay instead of waiting for Enter
    #[arg(long)]
    auto_advance: bool,

    /// Area units: "miles" or "km"
    #[arg(long)]
    units: Option<String>,

    /// Seed for choosing question sets
    #[arg(long)]
    seed: Option<u64>,
}

fn load_content() -> Result<(Arc<LocationDataset>, Arc<QuestionBank>)> {
    let dataset = LocationDataset::builtin().context("failed to load location data")?;
    let bank = QuestionBank::builtin(&dataset).context("failed to load question sets")?;
    info!(
        locations = dataset.len(),
        sets = bank.len(),
        "content loaded"
    );
    Ok((Arc::new(dataset), Arc::new(bank)))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Play(PlayArgs::default())) {
        Command::Check => {
            let (dataset, bank) = load_content()?;
            println!(
                "{} locations, {} question sets: ok",
                dataset.len(),
                bank.len()
            );
            Ok(())
        }
        Command::Play(args) => {
            let overrides = config::Overrides {
                delay_seconds: args.delay,
                auto_advance: args.auto_advance,
                units: args.units,
            };
            let settings = config::load_settings(cli.config.as_deref(), overrides)?;
            let (dataset, bank) = load_content()?;

            let builder = SessionEngine::builder(dataset, bank).with_settings(settings);
            let engine = match args.seed {
                Some(seed) => builder.with_selector(SeededSelector::new(seed)).start(),
                None => builder.start(),
            };
            play::run(engine).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        process::exit(2);
    }
}
