//! Headless NEAT trainer.
//!
//! Runs the evolutionary variant without a terminal or frame pacing, logging
//! to stderr.
//!
//! Usage:
//!   cargo run --bin evolve -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin evolve                          # 50 generations
//!   cargo run --bin evolve -- --generations 10      # shorter run
//!   cargo run --bin evolve -- --seed 42 --json      # reproducible, with report

use clap::Parser;
use flappy_neat::core::error::Result;
use flappy_neat::core::logging::init_stderr_log;
use flappy_neat::core::{DEFAULT_NEAT_CONFIG, GENERATIONS};
use flappy_neat::game::SpriteSet;
use flappy_neat::neat::{NeatConfig, Population};
use flappy_neat::training::{self, EvolutionContext};
use flappy_neat::ui::HeadlessSink;
use flappy_neat::utils::persistence::save_genome;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "evolve")]
#[command(about = "Train Flappy Bird networks headless")]
struct Args {
    #[arg(long, default_value = DEFAULT_NEAT_CONFIG)]
    config: PathBuf,
    #[arg(long)]
    assets: Option<PathBuf>,
    #[arg(short = 'g', long, default_value_t = GENERATIONS)]
    generations: u32,
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks after which an episode is cut short
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,
    /// Save the report as evolve_report_<timestamp>.json
    #[arg(long)]
    json: bool,
    #[arg(long)]
    save_winner: Option<PathBuf>,
    /// Log per-pipe progress as well
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    init_stderr_log(level)?;

    let config = NeatConfig::load(&args.config)?;
    let sprites = match &args.assets {
        Some(dir) => SpriteSet::from_dir(dir)?,
        None => SpriteSet::builtin(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              FLAPPY BIRD NEAT TRAINER                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Population:     {}", config.neat.pop_size);
    println!("  Generations:    {}", args.generations);
    println!("  Max Ticks:      {}", args.max_ticks);
    println!("  Seed:           {}", seed);
    println!();

    let mut population = Population::new(config, seed)?;
    let sink = Box::new(HeadlessSink::default());
    let mut ctx = EvolutionContext::new(sprites, sink, seed.wrapping_add(1))
        .with_max_ticks(Some(args.max_ticks));
    let outcome = training::train(&mut population, &mut ctx, args.generations)?;

    println!("{}", outcome.report.to_text());

    if args.json {
        let filename = format!(
            "evolve_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, outcome.report.to_json())?;
        println!("JSON report saved to: {}", filename);
    }

    if let (Some(path), Some(winner)) = (&args.save_winner, &outcome.winner) {
        save_genome(path, winner)?;
        println!("Winner saved to: {}", path.display());
    }
    Ok(())
}
