//! Speciation by genetic distance.

use super::config::{GenomeConfig, NeatConfig};
use super::genome::{Genome, GenomeKey};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub type SpeciesKey = u64;

#[derive(Debug, Clone)]
pub struct Species {
    pub key: SpeciesKey,
    pub created: u32,
    pub last_improved: u32,
    pub representative: Genome,
    pub members: Vec<GenomeKey>,
    pub fitness: Option<f64>,
    pub adjusted_fitness: Option<f64>,
    pub fitness_history: Vec<f64>,
}

impl Species {
    fn new(key: SpeciesKey, generation: u32, representative: Genome) -> Self {
        Self {
            key,
            created: generation,
            last_improved: generation,
            representative,
            members: Vec::new(),
            fitness: None,
            adjusted_fitness: None,
            fitness_history: Vec::new(),
        }
    }

    /// Member fitnesses, unevaluated members counting as 0.
    pub fn fitnesses(&self, population: &BTreeMap<GenomeKey, Genome>) -> Vec<f64> {
        self.members
            .iter()
            .filter_map(|k| population.get(k))
            .map(|g| g.fitness.unwrap_or(0.0))
            .collect()
    }
}

/// Memoised genome distances for one speciation pass.
struct DistanceCache<'a> {
    config: &'a GenomeConfig,
    cache: HashMap<(GenomeKey, GenomeKey), f64>,
}

impl<'a> DistanceCache<'a> {
    fn new(config: &'a GenomeConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
        }
    }

    fn distance(&mut self, a: &Genome, b: &Genome) -> f64 {
        let key = (a.key.min(b.key), a.key.max(b.key));
        if let Some(d) = self.cache.get(&key) {
            return *d;
        }
        let d = a.distance(b, self.config);
        self.cache.insert(key, d);
        d
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesSet {
    pub species: BTreeMap<SpeciesKey, Species>,
    pub genome_to_species: HashMap<GenomeKey, SpeciesKey>,
    next_key: SpeciesKey,
}

impl SpeciesSet {
    pub fn new() -> Self {
        Self {
            next_key: 1,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn species_of(&self, genome: GenomeKey) -> Option<SpeciesKey> {
        self.genome_to_species.get(&genome).copied()
    }

    /// Place every genome of `population` in a species.
    ///
    /// Existing species first pick the genome closest to their old
    /// representative as the new one. The rest join the closest
    /// representative under the compatibility threshold or found a new
    /// species.
    pub fn speciate(
        &mut self,
        config: &NeatConfig,
        population: &BTreeMap<GenomeKey, Genome>,
        generation: u32,
    ) {
        let compatibility_threshold = config.species_set.compatibility_threshold;
        let mut distances = DistanceCache::new(&config.genome);

        let mut unspeciated: BTreeSet<GenomeKey> = population.keys().copied().collect();
        let mut representatives: BTreeMap<SpeciesKey, GenomeKey> = BTreeMap::new();
        let mut members: BTreeMap<SpeciesKey, Vec<GenomeKey>> = BTreeMap::new();

        for (sid, s) in &self.species {
            let closest = unspeciated
                .iter()
                .filter_map(|gid| population.get(gid))
                .map(|g| (distances.distance(&s.representative, g), g.key))
                .min_by(|a, b| a.0.total_cmp(&b.0));
            let Some((_, rid)) = closest else {
                break;
            };
            representatives.insert(*sid, rid);
            members.insert(*sid, vec![rid]);
            unspeciated.remove(&rid);
        }

        for gid in unspeciated {
            let Some(genome) = population.get(&gid) else {
                continue;
            };
            let closest = representatives
                .iter()
                .filter_map(|(sid, rid)| population.get(rid).map(|rep| (*sid, rep)))
                .map(|(sid, rep)| (distances.distance(rep, genome), sid))
                .filter(|(d, _)| *d < compatibility_threshold)
                .min_by(|a, b| a.0.total_cmp(&b.0));
            match closest {
                Some((_, sid)) => members.entry(sid).or_default().push(gid),
                None => {
                    let sid = self.next_key;
                    self.next_key += 1;
                    representatives.insert(sid, gid);
                    members.insert(sid, vec![gid]);
                }
            }
        }

        self.genome_to_species.clear();
        let mut species = BTreeMap::new();
        for (sid, rid) in representatives {
            let Some(rep) = population.get(&rid) else {
                continue;
            };
            let mut s = self
                .species
                .remove(&sid)
                .unwrap_or_else(|| Species::new(sid, generation, rep.clone()));
            s.representative = rep.clone();
            s.members = members.remove(&sid).unwrap_or_default();
            for gid in &s.members {
                self.genome_to_species.insert(*gid, sid);
            }
            species.insert(sid, s);
        }
        self.species = species;
    }
}
