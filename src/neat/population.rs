//! The generational evolution driver.

use super::config::NeatConfig;
use super::genome::{Genome, GenomeKey};
use super::reporter::Reporter;
use super::reproduction::Reproduction;
use super::species::SpeciesSet;
use crate::core::error::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::ops::ControlFlow;

pub struct Population {
    pub config: NeatConfig,
    pub population: BTreeMap<GenomeKey, Genome>,
    pub species: SpeciesSet,
    pub reproduction: Reproduction,
    pub generation: u32,
    pub best_genome: Option<Genome>,
    rng: ChaCha8Rng,
}

impl Population {
    /// A random initial population, already speciated.
    pub fn new(config: NeatConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut reproduction = Reproduction::new();
        let population = reproduction.create_new(&config, config.neat.pop_size, &mut rng);
        let mut species = SpeciesSet::new();
        species.speciate(&config, &population, 0);

        Ok(Self {
            config,
            population,
            species,
            reproduction,
            generation: 0,
            best_genome: None,
            rng,
        })
    }

    /// Evolve for up to `generations` generations, or until the fitness
    /// threshold is met when `generations` is `None`.
    ///
    /// `fitness` must assign a fitness to every genome it is given. It may
    /// return `ControlFlow::Break` to end the run after the current
    /// generation's bookkeeping. Returns the best genome seen.
    pub fn run<F>(
        &mut self,
        mut fitness: F,
        generations: Option<u32>,
        reporter: &mut dyn Reporter,
    ) -> Result<Option<Genome>>
    where
        F: FnMut(&mut [&mut Genome], &NeatConfig) -> Result<ControlFlow<()>>,
    {
        if self.config.neat.no_fitness_termination && generations.is_none() {
            return Err(Error::ConfigInvalid(
                "no_fitness_termination needs a generation limit".into(),
            ));
        }

        let mut k = 0;
        while generations.map_or(true, |n| k < n) {
            k += 1;
            reporter.start_generation(self.generation);

            let flow = {
                let mut genomes: Vec<&mut Genome> = self.population.values_mut().collect();
                fitness(&mut genomes, &self.config)?
            };

            let mut best: Option<&Genome> = None;
            for genome in self.population.values() {
                let Some(f) = genome.fitness else {
                    return Err(Error::MissingFitness(genome.key));
                };
                if best.map_or(true, |b| f > b.fitness.unwrap_or(f64::MIN)) {
                    best = Some(genome);
                }
            }
            let Some(best) = best.cloned() else {
                return Err(Error::CompleteExtinction);
            };
            reporter.post_evaluate(&self.config, &self.population, &self.species, &best);

            let improved = self
                .best_genome
                .as_ref()
                .map_or(true, |b| best.fitness > b.fitness);
            if improved {
                self.best_genome = Some(best.clone());
            }

            if !self.config.neat.no_fitness_termination {
                let values: Vec<f64> = self
                    .population
                    .values()
                    .filter_map(|g| g.fitness)
                    .collect();
                let fv = self.config.neat.fitness_criterion.apply(&values);
                if fv >= self.config.neat.fitness_threshold {
                    reporter.found_solution(&self.config, self.generation, &best);
                    break;
                }
            }

            if flow.is_break() {
                log::info!("evolution stopped during generation {}", self.generation);
                break;
            }

            let next = self.reproduction.reproduce(
                &self.config,
                &mut self.species,
                &self.population,
                self.generation,
                reporter,
                &mut self.rng,
            );
            self.population = next;

            if self.species.is_empty() {
                reporter.complete_extinction();
                if !self.config.neat.reset_on_extinction {
                    return Err(Error::CompleteExtinction);
                }
                self.population = self.reproduction.create_new(
                    &self.config,
                    self.config.neat.pop_size,
                    &mut self.rng,
                );
            }

            self.species
                .speciate(&self.config, &self.population, self.generation);
            reporter.end_generation(&self.config, &self.population, &self.species);
            self.generation += 1;
        }

        if self.config.neat.no_fitness_termination {
            if let Some(best) = &self.best_genome {
                reporter.found_solution(&self.config, self.generation, best);
            }
        }
        Ok(self.best_genome.clone())
    }
}
