//! Offspring allocation and breeding.

use super::config::{mean, NeatConfig};
use super::genome::{Genome, GenomeKey};
use super::reporter::Reporter;
use super::species::SpeciesSet;
use super::stagnation;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Reproduction {
    next_genome_key: GenomeKey,
    /// Child key to its two parents.
    pub ancestors: BTreeMap<GenomeKey, (GenomeKey, GenomeKey)>,
}

impl Default for Reproduction {
    fn default() -> Self {
        Self::new()
    }
}

impl Reproduction {
    pub fn new() -> Self {
        Self {
            next_genome_key: 1,
            ancestors: BTreeMap::new(),
        }
    }

    fn next_key(&mut self) -> GenomeKey {
        let key = self.next_genome_key;
        self.next_genome_key += 1;
        key
    }

    pub fn create_new<R: Rng>(
        &mut self,
        config: &NeatConfig,
        count: usize,
        rng: &mut R,
    ) -> BTreeMap<GenomeKey, Genome> {
        (0..count)
            .map(|_| {
                let key = self.next_key();
                (key, Genome::new(key, &config.genome, rng))
            })
            .collect()
    }

    /// Number of offspring per species.
    ///
    /// Each species moves halfway from its previous size towards its
    /// fitness-proportional share, then everything is scaled so the total
    /// is close to `pop_size`.
    pub fn compute_spawn(
        adjusted_fitness: &[f64],
        previous_sizes: &[usize],
        pop_size: usize,
        min_species_size: usize,
    ) -> Vec<usize> {
        let af_sum: f64 = adjusted_fitness.iter().sum();
        let min_size = min_species_size as f64;

        let mut amounts = Vec::with_capacity(adjusted_fitness.len());
        for (af, &previous) in adjusted_fitness.iter().zip(previous_sizes) {
            let target = if af_sum > 0.0 {
                min_size.max(af / af_sum * pop_size as f64)
            } else {
                min_size
            };
            let d = (target - previous as f64) * 0.5;
            let c = d.round_ties_even() as i64;
            let mut spawn = previous as i64;
            if c != 0 {
                spawn += c;
            } else if d > 0.0 {
                spawn += 1;
            } else if d < 0.0 {
                spawn -= 1;
            }
            amounts.push(spawn);
        }

        let total: i64 = amounts.iter().sum();
        let norm = pop_size as f64 / total.max(1) as f64;
        amounts
            .into_iter()
            .map(|n| min_species_size.max((n as f64 * norm).round_ties_even().max(0.0) as usize))
            .collect()
    }

    /// Breed the next generation from the evaluated `population`.
    ///
    /// Stagnant species are dropped. An empty result with no species left
    /// means complete extinction.
    pub fn reproduce<R: Rng>(
        &mut self,
        config: &NeatConfig,
        species: &mut SpeciesSet,
        population: &BTreeMap<GenomeKey, Genome>,
        generation: u32,
        reporter: &mut dyn Reporter,
        rng: &mut R,
    ) -> BTreeMap<GenomeKey, Genome> {
        let repro = &config.reproduction;

        let mut all_fitnesses = Vec::new();
        let mut remaining = Vec::new();
        for (sid, stagnant) in stagnation::update(species, population, &config.stagnation, generation) {
            let Some(s) = species.species.get(&sid) else {
                continue;
            };
            if stagnant {
                reporter.species_stagnant(sid, s);
            } else {
                all_fitnesses.extend(s.fitnesses(population));
                remaining.push(sid);
            }
        }

        if remaining.is_empty() {
            species.species.clear();
            return BTreeMap::new();
        }

        let min_fitness = all_fitnesses.iter().copied().fold(f64::INFINITY, f64::min);
        let max_fitness = all_fitnesses
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let fitness_range = (max_fitness - min_fitness).max(1.0);

        let mut adjusted = Vec::with_capacity(remaining.len());
        let mut previous_sizes = Vec::with_capacity(remaining.len());
        for sid in &remaining {
            if let Some(s) = species.species.get_mut(sid) {
                let msf = mean(&s.fitnesses(population));
                let af = (msf - min_fitness) / fitness_range;
                s.adjusted_fitness = Some(af);
                adjusted.push(af);
                previous_sizes.push(s.members.len());
            }
        }
        reporter.info(&format!("Average adjusted fitness: {:.3}", mean(&adjusted)));

        let min_species_size = repro.min_species_size.max(repro.elitism);
        let spawn_amounts = Self::compute_spawn(
            &adjusted,
            &previous_sizes,
            config.neat.pop_size,
            min_species_size,
        );

        let mut survivors = BTreeMap::new();
        for sid in &remaining {
            if let Some(s) = species.species.remove(sid) {
                survivors.insert(*sid, s);
            }
        }

        let mut next = BTreeMap::new();
        for (spawn, sid) in spawn_amounts.into_iter().zip(&remaining) {
            let Some(s) = survivors.get_mut(sid) else {
                continue;
            };
            let mut spawn = spawn.max(repro.elitism);

            let mut old_members: Vec<&Genome> = s
                .members
                .drain(..)
                .filter_map(|k| population.get(&k))
                .collect();
            old_members.sort_by(|a, b| {
                b.fitness
                    .unwrap_or(f64::MIN)
                    .total_cmp(&a.fitness.unwrap_or(f64::MIN))
            });

            for elite in old_members.iter().take(repro.elitism) {
                next.insert(elite.key, (*elite).clone());
                spawn = spawn.saturating_sub(1);
            }
            if spawn == 0 {
                continue;
            }

            let cutoff = (repro.survival_threshold * old_members.len() as f64).ceil() as usize;
            old_members.truncate(cutoff.max(2));

            while spawn > 0 {
                spawn -= 1;
                let (Some(p1), Some(p2)) = (old_members.choose(rng), old_members.choose(rng))
                else {
                    break;
                };
                let key = self.next_key();
                let mut child = Genome::crossover(key, p1, p2, rng);
                child.mutate(&config.genome, rng);
                self.ancestors.insert(key, (p1.key, p2.key));
                next.insert(key, child);
            }
        }

        species.species = survivors;
        next
    }
}
