//! State that lives across generations of a training run.

use super::contestant::Contestant;
use super::episode::Episode;
use super::report::EpisodeSummary;
use crate::core::clock::FrameClock;
use crate::core::error::Result;
use crate::game::SpriteSet;
use crate::neat::config::mean;
use crate::neat::{DecisionFunction, FeedForwardNetwork, Genome, NeatConfig};
use crate::ui::{FrameSink, SceneView, Signal};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::ControlFlow;

pub const TRAIN_TITLE: &str = "NEAT Flappy Bird";
pub const WATCH_TITLE: &str = "Flappy Bird replay";

/// Drives one episode per generation and feeds the fitness back to NEAT.
pub struct EvolutionContext {
    /// Incremented at the start of every evaluation, so the first
    /// generation shown is 1.
    pub generation: u32,
    rng: ChaCha8Rng,
    sprites: SpriteSet,
    clock: Option<FrameClock>,
    sink: Box<dyn FrameSink>,
    max_ticks: Option<u64>,
    title: &'static str,
    pub summaries: Vec<EpisodeSummary>,
}

impl EvolutionContext {
    pub fn new(sprites: SpriteSet, sink: Box<dyn FrameSink>, seed: u64) -> Self {
        Self {
            generation: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            sprites,
            clock: None,
            sink,
            max_ticks: None,
            title: TRAIN_TITLE,
            summaries: Vec::new(),
        }
    }

    /// Hold every episode to a fixed tick rate.
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// End an episode after this many ticks even if birds are alive.
    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_title(mut self, title: &'static str) -> Self {
        self.title = title;
        self
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    /// The fitness function handed to `Population::run`.
    ///
    /// Every genome gets a fresh bird and its fitness reset to 0. Breaks the
    /// run if the player quits mid-episode; fitness is still written back.
    pub fn evaluate(
        &mut self,
        genomes: &mut [&mut Genome],
        config: &NeatConfig,
    ) -> Result<ControlFlow<()>> {
        self.generation += 1;

        let contestants: Vec<Contestant<FeedForwardNetwork>> = genomes
            .iter_mut()
            .enumerate()
            .map(|(i, genome)| {
                genome.fitness = Some(0.0);
                Contestant::new(i, FeedForwardNetwork::create(genome, &config.genome))
            })
            .collect();

        let (contestants, summary) = self.run_episode(contestants)?;
        for c in contestants {
            if let Some(genome) = genomes.get_mut(c.genome_index) {
                genome.fitness = Some(c.fitness);
            }
        }

        let quit = summary.quit;
        self.summaries.push(summary);
        Ok(if quit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        })
    }

    /// Fly `contestants` until they have all crashed, the tick limit is hit,
    /// or the player quits.
    pub fn run_episode<D: DecisionFunction>(
        &mut self,
        contestants: Vec<Contestant<D>>,
    ) -> Result<(Vec<Contestant<D>>, EpisodeSummary)> {
        let mut episode = Episode::new(contestants, &self.sprites, &mut self.rng);
        let mut quit = false;
        let mut timed_out = false;

        while episode.is_running() {
            if let Some(clock) = self.clock.as_mut() {
                clock.tick();
            }

            let outcome = episode.tick(&self.sprites, &mut self.rng);
            if outcome.pipe_passed {
                log::debug!(
                    "generation {}: score {} with {} alive",
                    self.generation,
                    episode.score,
                    episode.contestants.len()
                );
            }

            let scene = SceneView {
                title: self.title,
                sprites: &self.sprites,
                birds: episode.contestants.iter().map(|c| &c.bird).collect(),
                pipes: &episode.pipes,
                base: &episode.base,
                score: Some(episode.score),
                generation: Some(self.generation),
                alive: episode.contestants.len(),
                population: episode.population(),
                best_fitness: episode.best_fitness(),
                ticks: episode.ticks,
            };
            if self.sink.present(&scene)? == Signal::Quit {
                quit = true;
                break;
            }

            if self.max_ticks.is_some_and(|max| episode.ticks >= max) {
                timed_out = episode.is_running();
                break;
            }
        }

        let fitness: Vec<f64> = episode
            .contestants
            .iter()
            .chain(episode.retired.iter())
            .map(|c| c.fitness)
            .collect();
        let summary = EpisodeSummary {
            generation: self.generation,
            population: episode.population(),
            score: episode.score,
            ticks: episode.ticks,
            best_fitness: episode.best_fitness().unwrap_or(0.0),
            mean_fitness: mean(&fitness),
            timed_out,
            quit,
        };
        log::info!(
            "generation {} finished: score {}, {} ticks, best fitness {:.1}{}",
            summary.generation,
            summary.score,
            summary.ticks,
            summary.best_fitness,
            if quit { " (quit)" } else { "" }
        );

        Ok((episode.into_contestants(), summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neat::config::tests::sample;
    use crate::ui::HeadlessSink;
    use std::io;

    /// Quits on the n-th frame.
    struct QuitAfter(u64);

    impl FrameSink for QuitAfter {
        fn present(&mut self, _scene: &SceneView<'_>) -> io::Result<Signal> {
            self.0 = self.0.saturating_sub(1);
            Ok(if self.0 == 0 {
                Signal::Quit
            } else {
                Signal::Continue
            })
        }
    }

    fn genomes(n: u64) -> Vec<Genome> {
        let config = sample();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        (1..=n)
            .map(|k| Genome::new(k, &config.genome, &mut rng))
            .collect()
    }

    #[test]
    fn test_evaluate_assigns_fitness_and_counts_generations() {
        let config = sample();
        let sink = Box::new(HeadlessSink::default());
        let mut ctx =
            EvolutionContext::new(SpriteSet::builtin(), sink, 1).with_max_ticks(Some(2_000));
        let mut owned = genomes(10);

        for expected in 1..=2 {
            let mut refs: Vec<&mut Genome> = owned.iter_mut().collect();
            let flow = ctx.evaluate(&mut refs, &config).unwrap();
            assert!(flow.is_continue());
            assert_eq!(ctx.generation, expected);
        }
        // Everybody earned at least a tick before crashing
        assert!(owned.iter().all(|g| g.fitness.is_some_and(|f| f > -1.0)));
        assert_eq!(ctx.summaries.len(), 2);
        assert_eq!(ctx.summaries[1].generation, 2);
    }

    #[test]
    fn test_quit_breaks_and_keeps_fitness() {
        let config = sample();
        let mut ctx = EvolutionContext::new(SpriteSet::builtin(), Box::new(QuitAfter(3)), 2);
        let mut owned = genomes(5);
        let mut refs: Vec<&mut Genome> = owned.iter_mut().collect();
        let flow = ctx.evaluate(&mut refs, &config).unwrap();
        assert!(flow.is_break());
        assert!(ctx.summaries[0].quit);
        assert_eq!(ctx.summaries[0].ticks, 3);
        for g in &owned {
            let f = g.fitness.unwrap();
            assert!(f > 0.0 && f <= 0.3 + 1e-9, "{f}");
        }
    }

    #[test]
    fn test_tick_limit_times_out() {
        struct Hover;
        impl DecisionFunction for Hover {
            // Jump whenever below the start height
            fn activate(&mut self, inputs: &[f64]) -> Vec<f64> {
                vec![if inputs[0] > 350.0 { 1.0 } else { 0.0 }]
            }
        }

        let sink = Box::new(HeadlessSink::default());
        let mut ctx =
            EvolutionContext::new(SpriteSet::builtin(), sink, 3).with_max_ticks(Some(20));
        let (all, summary) = ctx.run_episode(vec![Contestant::new(0, Hover)]).unwrap();
        assert_eq!(summary.ticks, 20);
        assert!(summary.timed_out);
        assert_eq!(all.len(), 1);
        assert!(all[0].alive);
    }
}
