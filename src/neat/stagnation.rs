//! Species stagnation tracking.

use super::config::StagnationConfig;
use super::genome::{Genome, GenomeKey};
use super::species::{SpeciesKey, SpeciesSet};
use std::collections::BTreeMap;

/// Refresh every species' fitness and report which ones are stagnant,
/// ordered from least to most fit.
///
/// A species is stagnant after `max_stagnation` generations without
/// improvement. The `species_elitism` best species are always spared, as
/// is any species whose removal would leave fewer than that many.
pub fn update(
    species_set: &mut SpeciesSet,
    population: &BTreeMap<GenomeKey, Genome>,
    config: &StagnationConfig,
    generation: u32,
) -> Vec<(SpeciesKey, bool)> {
    let mut ranked: Vec<(SpeciesKey, f64)> = Vec::with_capacity(species_set.len());
    for (sid, s) in species_set.species.iter_mut() {
        let previous_best = s
            .fitness_history
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let fitness = config.species_fitness_func.apply(&s.fitnesses(population));
        s.fitness = Some(fitness);
        s.fitness_history.push(fitness);
        s.adjusted_fitness = None;
        if fitness > previous_best {
            s.last_improved = generation;
        }
        ranked.push((*sid, fitness));
    }
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let total = ranked.len();
    let mut non_stagnant = total;
    let mut result = Vec::with_capacity(total);
    for (idx, (sid, _)) in ranked.into_iter().enumerate() {
        let last_improved = species_set.species[&sid].last_improved;
        let stagnant_time = generation.saturating_sub(last_improved) as usize;

        let mut is_stagnant = false;
        if non_stagnant > config.species_elitism {
            is_stagnant = stagnant_time >= config.max_stagnation;
        }
        if total - idx <= config.species_elitism {
            is_stagnant = false;
        }
        if is_stagnant {
            non_stagnant -= 1;
        }
        result.push((sid, is_stagnant));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neat::config::tests::sample;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Three singleton species with fitness 1, 2, 3.
    fn setup() -> (SpeciesSet, BTreeMap<GenomeKey, Genome>) {
        let mut config = sample();
        config.species_set.compatibility_threshold = 1e-9;
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let pop: BTreeMap<_, _> = (1..=3u64)
            .map(|k| {
                let mut g = Genome::new(k, &config.genome, &mut rng);
                g.fitness = Some(k as f64);
                (k, g)
            })
            .collect();
        let mut set = SpeciesSet::new();
        set.speciate(&config, &pop, 0);
        assert_eq!(set.len(), 3);
        (set, pop)
    }

    #[test]
    fn test_improvement_resets_clock() {
        let (mut set, pop) = setup();
        let config = sample().stagnation;
        let result = update(&mut set, &pop, &config, 0);
        assert!(result.iter().all(|(_, stagnant)| !stagnant));
        for s in set.species.values() {
            assert_eq!(s.last_improved, 0);
            assert_eq!(s.fitness_history.len(), 1);
        }
    }

    #[test]
    fn test_stale_species_flagged_except_elites() {
        let (mut set, pop) = setup();
        let mut config = sample().stagnation;
        config.max_stagnation = 2;
        config.species_elitism = 1;
        update(&mut set, &pop, &config, 0);
        update(&mut set, &pop, &config, 1);
        let result = update(&mut set, &pop, &config, 2);

        // Sorted worst first, best species spared
        let flags: Vec<bool> = result.iter().map(|(_, s)| *s).collect();
        assert_eq!(flags, vec![true, true, false]);
        let best = result[2].0;
        assert_eq!(set.species[&best].fitness, Some(3.0));
    }

    #[test]
    fn test_species_elitism_keeps_minimum() {
        let (mut set, pop) = setup();
        let mut config = sample().stagnation;
        config.max_stagnation = 1;
        config.species_elitism = 3;
        update(&mut set, &pop, &config, 0);
        let result = update(&mut set, &pop, &config, 5);
        assert!(result.iter().all(|(_, stagnant)| !stagnant));
    }
}
