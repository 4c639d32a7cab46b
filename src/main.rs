use clap::{Parser, Subcommand};
use flappy_neat::core::clock::FrameClock;
use flappy_neat::core::error::Result;
use flappy_neat::core::logging::init_file_log;
use flappy_neat::core::{DEFAULT_NEAT_CONFIG, GENERATIONS, TICKS_PER_SECOND};
use flappy_neat::game::SpriteSet;
use flappy_neat::neat::{NeatConfig, Population};
use flappy_neat::play;
use flappy_neat::training::{self, context::WATCH_TITLE, EvolutionContext};
use flappy_neat::ui::{TerminalGuard, TerminalSink};
use flappy_neat::utils::persistence::{default_log_path, load_genome, save_genome};
use flappy_neat::utils::version_line;
use log::LevelFilter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "flappy-neat")]
#[command(about = "Flappy Bird in the terminal, played by NEAT-evolved networks")]
struct Cli {
    /// NEAT hyperparameter file
    #[arg(long, global = true, default_value = DEFAULT_NEAT_CONFIG)]
    config: PathBuf,
    /// Directory with bird1-3.png, pipe.png, base.png and background.png
    #[arg(long, global = true)]
    assets: Option<PathBuf>,
    /// Number of generations to train
    #[arg(long, global = true, default_value_t = GENERATIONS)]
    generations: u32,
    /// Seed for evolution and pipe heights (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Log file (default ~/.flappy-neat/flappy-neat.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Write the winning genome here as JSON
    #[arg(long, global = true)]
    save_winner: Option<PathBuf>,
    /// End each episode after this many ticks
    #[arg(long, global = true)]
    max_ticks: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evolve a population of birds (default)
    Train,
    /// Single-player game: one bird, no input, no pipes
    Play,
    /// Replay a saved genome
    Watch {
        #[arg(long)]
        genome: PathBuf,
    },
    /// Show version and build info
    Version,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        log::error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        assets,
        generations,
        seed,
        log_file,
        save_winner,
        max_ticks,
        command,
    } = cli;
    let command = command.unwrap_or(Command::Train);

    if matches!(command, Command::Version) {
        println!("{}", version_line());
        return Ok(());
    }

    let log_path = match log_file {
        Some(path) => path,
        None => default_log_path()?,
    };
    init_file_log(LevelFilter::Info, &log_path)?;
    log::info!("{}", version_line());

    let sprites = load_sprites(assets.as_deref())?;
    let seed = seed.unwrap_or_else(rand::random);

    match command {
        Command::Play => play_alone(&sprites, max_ticks),
        Command::Train => train_population(
            &config,
            sprites,
            seed,
            generations,
            max_ticks,
            save_winner.as_deref(),
        ),
        Command::Watch { genome } => watch_genome(&config, &genome, sprites, seed, max_ticks),
        Command::Version => Ok(()),
    }
}

fn load_sprites(assets: Option<&Path>) -> Result<SpriteSet> {
    match assets {
        Some(dir) => {
            log::info!("loading sprites from {}", dir.display());
            SpriteSet::from_dir(dir)
        }
        None => Ok(SpriteSet::builtin()),
    }
}

fn play_alone(sprites: &SpriteSet, max_ticks: Option<u64>) -> Result<()> {
    let mut sink = TerminalSink::new(TerminalGuard::enter()?);
    let game = play::run(
        sprites,
        &mut sink,
        Some(FrameClock::new(TICKS_PER_SECOND)),
        max_ticks,
    );
    drop(sink);

    let game = game?;
    println!("The bird fell for {} ticks.", game.ticks);
    Ok(())
}

fn train_population(
    config_path: &Path,
    sprites: SpriteSet,
    seed: u64,
    generations: u32,
    max_ticks: Option<u64>,
    save_winner: Option<&Path>,
) -> Result<()> {
    let config = NeatConfig::load(config_path)?;
    log::info!(
        "training {} genomes for up to {} generations, seed {}",
        config.neat.pop_size,
        generations,
        seed
    );
    let mut population = Population::new(config, seed)?;

    let sink = TerminalSink::new(TerminalGuard::enter()?);
    let mut ctx = EvolutionContext::new(sprites, Box::new(sink), seed.wrapping_add(1))
        .with_clock(FrameClock::new(TICKS_PER_SECOND))
        .with_max_ticks(max_ticks);
    let outcome = training::train(&mut population, &mut ctx, generations);
    // Restores the terminal before anything is printed
    drop(ctx);

    let outcome = outcome?;
    println!("{}", outcome.report.to_text());

    if let (Some(path), Some(winner)) = (save_winner, outcome.winner.as_ref()) {
        save_genome(path, winner)?;
        println!("Winner saved to: {}", path.display());
    }
    Ok(())
}

fn watch_genome(
    config_path: &Path,
    genome_path: &Path,
    sprites: SpriteSet,
    seed: u64,
    max_ticks: Option<u64>,
) -> Result<()> {
    let config = NeatConfig::load(config_path)?;
    let genome = load_genome(genome_path)?;

    let sink = TerminalSink::new(TerminalGuard::enter()?);
    let mut ctx = EvolutionContext::new(sprites, Box::new(sink), seed)
        .with_clock(FrameClock::new(TICKS_PER_SECOND))
        .with_max_ticks(max_ticks)
        .with_title(WATCH_TITLE);
    let summary = training::watch(&genome, &config, &mut ctx);
    drop(ctx);

    let summary = summary?;
    println!(
        "Genome {} scored {} in {} ticks (fitness {:.1}).",
        genome.key, summary.score, summary.ticks, summary.best_fitness
    );
    Ok(())
}
