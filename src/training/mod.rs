//! The evolutionary variant: a population of network-driven birds scored by
//! how long they survive and how many pipes they pass.

pub mod context;
pub mod contestant;
pub mod episode;
pub mod report;

pub use context::EvolutionContext;
pub use contestant::Contestant;
pub use episode::{Episode, TickOutcome};
pub use report::{EpisodeSummary, TrainingReport};

use crate::core::error::Result;
use crate::neat::{
    FeedForwardNetwork, Genome, LogReporter, NeatConfig, Population, ReporterSet,
    StatisticsReporter,
};

/// Result of `train`.
pub struct TrainingOutcome {
    pub winner: Option<Genome>,
    pub report: TrainingReport,
}

/// Evolve `population` for up to `generations` generations, playing one
/// episode per generation through `ctx`.
pub fn train(
    population: &mut Population,
    ctx: &mut EvolutionContext,
    generations: u32,
) -> Result<TrainingOutcome> {
    let mut log_reporter = LogReporter::new(true);
    let mut stats = StatisticsReporter::new();

    let winner = {
        let mut reporters = ReporterSet::new();
        reporters.add(&mut log_reporter);
        reporters.add(&mut stats);
        population.run(
            |genomes, config| ctx.evaluate(genomes, config),
            Some(generations),
            &mut reporters,
        )?
    };

    let summaries = std::mem::take(&mut ctx.summaries);
    let report = TrainingReport::new(summaries, &stats, winner.as_ref());
    if let Some(best) = &winner {
        log::info!(
            "best genome {} with fitness {:.1}, size {:?}",
            best.key,
            best.fitness.unwrap_or(0.0),
            best.size()
        );
    }
    Ok(TrainingOutcome { winner, report })
}

/// Fly a saved genome alone through the same episode engine.
pub fn watch(
    genome: &Genome,
    config: &NeatConfig,
    ctx: &mut EvolutionContext,
) -> Result<EpisodeSummary> {
    let net = FeedForwardNetwork::create(genome, &config.genome);
    let (_, summary) = ctx.run_episode(vec![Contestant::new(0, net)])?;
    log::info!(
        "replayed genome {}: score {}, fitness {:.1}",
        genome.key,
        summary.score,
        summary.best_fitness
    );
    Ok(summary)
}
