//! Progress hooks for the evolution driver.

use super::config::{mean, stdev, NeatConfig};
use super::genome::{Genome, GenomeKey};
use super::species::{Species, SpeciesKey, SpeciesSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Every hook defaults to doing nothing.
pub trait Reporter {
    fn start_generation(&mut self, _generation: u32) {}

    fn post_evaluate(
        &mut self,
        _config: &NeatConfig,
        _population: &BTreeMap<GenomeKey, Genome>,
        _species: &SpeciesSet,
        _best: &Genome,
    ) {
    }

    fn end_generation(
        &mut self,
        _config: &NeatConfig,
        _population: &BTreeMap<GenomeKey, Genome>,
        _species: &SpeciesSet,
    ) {
    }

    fn complete_extinction(&mut self) {}

    fn found_solution(&mut self, _config: &NeatConfig, _generation: u32, _best: &Genome) {}

    fn species_stagnant(&mut self, _key: SpeciesKey, _species: &Species) {}

    fn info(&mut self, _message: &str) {}
}

/// Fans every hook out to a list of borrowed reporters.
#[derive(Default)]
pub struct ReporterSet<'a> {
    reporters: Vec<&'a mut dyn Reporter>,
}

impl<'a> ReporterSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reporter: &'a mut dyn Reporter) {
        self.reporters.push(reporter);
    }
}

impl Reporter for ReporterSet<'_> {
    fn start_generation(&mut self, generation: u32) {
        for r in self.reporters.iter_mut() {
            r.start_generation(generation);
        }
    }

    fn post_evaluate(
        &mut self,
        config: &NeatConfig,
        population: &BTreeMap<GenomeKey, Genome>,
        species: &SpeciesSet,
        best: &Genome,
    ) {
        for r in self.reporters.iter_mut() {
            r.post_evaluate(config, population, species, best);
        }
    }

    fn end_generation(
        &mut self,
        config: &NeatConfig,
        population: &BTreeMap<GenomeKey, Genome>,
        species: &SpeciesSet,
    ) {
        for r in self.reporters.iter_mut() {
            r.end_generation(config, population, species);
        }
    }

    fn complete_extinction(&mut self) {
        for r in self.reporters.iter_mut() {
            r.complete_extinction();
        }
    }

    fn found_solution(&mut self, config: &NeatConfig, generation: u32, best: &Genome) {
        for r in self.reporters.iter_mut() {
            r.found_solution(config, generation, best);
        }
    }

    fn species_stagnant(&mut self, key: SpeciesKey, species: &Species) {
        for r in self.reporters.iter_mut() {
            r.species_stagnant(key, species);
        }
    }

    fn info(&mut self, message: &str) {
        for r in self.reporters.iter_mut() {
            r.info(message);
        }
    }
}

/// Writes generation summaries through the `log` facade.
pub struct LogReporter {
    show_species_detail: bool,
    generation: u32,
    generation_start: Option<Instant>,
    generation_times: Vec<f64>,
    num_extinctions: u32,
}

impl LogReporter {
    pub fn new(show_species_detail: bool) -> Self {
        Self {
            show_species_detail,
            generation: 0,
            generation_start: None,
            generation_times: Vec::new(),
            num_extinctions: 0,
        }
    }
}

impl Reporter for LogReporter {
    fn start_generation(&mut self, generation: u32) {
        self.generation = generation;
        self.generation_start = Some(Instant::now());
        log::info!("****** Running generation {generation} ******");
    }

    fn post_evaluate(
        &mut self,
        _config: &NeatConfig,
        population: &BTreeMap<GenomeKey, Genome>,
        species: &SpeciesSet,
        best: &Genome,
    ) {
        let fitnesses: Vec<f64> = population
            .values()
            .map(|g| g.fitness.unwrap_or(0.0))
            .collect();
        log::info!(
            "Population's average fitness: {:.5} stdev: {:.5}",
            mean(&fitnesses),
            stdev(&fitnesses)
        );
        let sid = species
            .species_of(best.key)
            .map_or_else(|| "-".to_string(), |k| k.to_string());
        log::info!(
            "Best fitness: {:.5} - size: {:?} - species {} - id {}",
            best.fitness.unwrap_or(0.0),
            best.size(),
            sid,
            best.key
        );
    }

    fn end_generation(
        &mut self,
        _config: &NeatConfig,
        population: &BTreeMap<GenomeKey, Genome>,
        species: &SpeciesSet,
    ) {
        log::info!(
            "Population of {} members in {} species",
            population.len(),
            species.len()
        );
        if self.show_species_detail {
            log::info!("   ID   age  size   fitness   adj fit  stag");
            for (sid, s) in &species.species {
                let age = self.generation.saturating_sub(s.created);
                let stagnation = self.generation.saturating_sub(s.last_improved);
                let fitness = s.fitness.map_or_else(|| "--".into(), |f| format!("{f:.1}"));
                let adjusted = s
                    .adjusted_fitness
                    .map_or_else(|| "--".into(), |f| format!("{f:.3}"));
                log::info!(
                    "  {sid:>3}  {age:>4}  {:>4}  {fitness:>8}  {adjusted:>8}  {stagnation:>4}",
                    s.members.len()
                );
            }
        }
        log::info!("Total extinctions: {}", self.num_extinctions);

        if let Some(start) = self.generation_start.take() {
            let elapsed = start.elapsed().as_secs_f64();
            self.generation_times.push(elapsed);
            if self.generation_times.len() > 10 {
                self.generation_times.remove(0);
            }
            log::info!(
                "Generation time: {elapsed:.3} sec ({:.3} average)",
                mean(&self.generation_times)
            );
        }
    }

    fn complete_extinction(&mut self) {
        self.num_extinctions += 1;
        log::warn!("All species extinct.");
    }

    fn found_solution(&mut self, _config: &NeatConfig, generation: u32, best: &Genome) {
        log::info!(
            "Best individual in generation {generation} meets fitness threshold - complexity: {:?}",
            best.size()
        );
    }

    fn species_stagnant(&mut self, key: SpeciesKey, species: &Species) {
        log::info!(
            "Species {key} with {} members is stagnated: removing it",
            species.members.len()
        );
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// Per-generation fitness of one species.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesStats {
    pub key: SpeciesKey,
    pub size: usize,
    pub fitness: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationStats {
    pub generation: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub stdev_fitness: f64,
    pub species: Vec<SpeciesStats>,
}

/// Keeps the best genome and fitness statistics of every generation.
#[derive(Debug, Default)]
pub struct StatisticsReporter {
    current_generation: u32,
    pub most_fit_genomes: Vec<Genome>,
    pub generations: Vec<GenerationStats>,
}

impl StatisticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_genome(&self) -> Option<&Genome> {
        self.most_fit_genomes.iter().max_by(|a, b| {
            a.fitness
                .unwrap_or(f64::MIN)
                .total_cmp(&b.fitness.unwrap_or(f64::MIN))
        })
    }

    pub fn fitness_means(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.mean_fitness).collect()
    }

    pub fn fitness_stdevs(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.stdev_fitness).collect()
    }
}

impl Reporter for StatisticsReporter {
    fn start_generation(&mut self, generation: u32) {
        self.current_generation = generation;
    }

    fn post_evaluate(
        &mut self,
        _config: &NeatConfig,
        population: &BTreeMap<GenomeKey, Genome>,
        species: &SpeciesSet,
        best: &Genome,
    ) {
        self.most_fit_genomes.push(best.clone());

        let fitnesses: Vec<f64> = population
            .values()
            .map(|g| g.fitness.unwrap_or(0.0))
            .collect();
        let species = species
            .species
            .values()
            .map(|s| {
                let member_fitness = s.fitnesses(population);
                SpeciesStats {
                    key: s.key,
                    size: s.members.len(),
                    fitness: mean(&member_fitness),
                }
            })
            .collect();

        self.generations.push(GenerationStats {
            generation: self.current_generation,
            best_fitness: best.fitness.unwrap_or(0.0),
            mean_fitness: mean(&fitnesses),
            stdev_fitness: stdev(&fitnesses),
            species,
        });
    }
}
