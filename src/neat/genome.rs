//! Genomes: node and connection genes plus the structural operators.

use super::config::{GenomeConfig, InitialConnection};
use super::gene::{ConnectionGene, NodeGene};
use super::graph::creates_cycle;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type GenomeKey = u64;
pub type ConnectionKey = (i64, i64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub key: GenomeKey,
    /// Output and hidden nodes. Inputs are implicit.
    pub nodes: BTreeMap<i64, NodeGene>,
    #[serde(with = "connection_list")]
    pub connections: BTreeMap<ConnectionKey, ConnectionGene>,
    pub fitness: Option<f64>,
}

impl Genome {
    pub fn empty(key: GenomeKey) -> Self {
        Self {
            key,
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
            fitness: None,
        }
    }

    /// A fresh random genome with the configured starting topology.
    pub fn new<R: Rng>(key: GenomeKey, config: &GenomeConfig, rng: &mut R) -> Self {
        let mut genome = Self::empty(key);
        for k in config.output_keys() {
            genome.nodes.insert(k, NodeGene::new(k, config, rng));
        }

        let mut hidden = Vec::with_capacity(config.num_hidden);
        for _ in 0..config.num_hidden {
            let k = genome.next_node_key();
            genome.nodes.insert(k, NodeGene::new(k, config, rng));
            hidden.push(k);
        }

        if config.initial_connection == InitialConnection::Full {
            for key in full_connections(config, &hidden) {
                genome.add_connection(key, config, rng);
            }
        }
        genome
    }

    /// Child of two parents. Matching genes are mixed, disjoint and excess
    /// genes come from the fitter parent only.
    pub fn crossover<R: Rng>(key: GenomeKey, a: &Genome, b: &Genome, rng: &mut R) -> Self {
        let (fit, other) = if a.fitness.unwrap_or(f64::MIN) > b.fitness.unwrap_or(f64::MIN) {
            (a, b)
        } else {
            (b, a)
        };

        let mut child = Self::empty(key);
        for (k, g1) in &fit.connections {
            let gene = match other.connections.get(k) {
                Some(g2) => g1.crossover(g2, rng),
                None => g1.clone(),
            };
            child.connections.insert(*k, gene);
        }
        for (k, n1) in &fit.nodes {
            let gene = match other.nodes.get(k) {
                Some(n2) => n1.crossover(n2, rng),
                None => n1.clone(),
            };
            child.nodes.insert(*k, gene);
        }
        child
    }

    pub fn mutate<R: Rng>(&mut self, config: &GenomeConfig, rng: &mut R) {
        if rng.gen::<f64>() < config.node_add_prob {
            self.mutate_add_node(config, rng);
        }
        if rng.gen::<f64>() < config.node_delete_prob {
            self.mutate_delete_node(config, rng);
        }
        if rng.gen::<f64>() < config.conn_add_prob {
            self.mutate_add_connection(config, rng);
        }
        if rng.gen::<f64>() < config.conn_delete_prob {
            self.mutate_delete_connection(rng);
        }

        for gene in self.connections.values_mut() {
            gene.mutate(config, rng);
        }
        for gene in self.nodes.values_mut() {
            gene.mutate(config, rng);
        }
    }

    /// Split a random connection: the old one is disabled and replaced by
    /// `in -> new` (weight 1) and `new -> out` (old weight).
    pub fn mutate_add_node<R: Rng>(&mut self, config: &GenomeConfig, rng: &mut R) -> Option<i64> {
        let keys: Vec<ConnectionKey> = self.connections.keys().copied().collect();
        let split = *keys.choose(rng)?;

        let new_key = self.next_node_key();
        self.nodes.insert(new_key, NodeGene::new(new_key, config, rng));

        let conn = self.connections.get_mut(&split)?;
        conn.enabled = false;
        let old_weight = conn.weight;

        let (from, to) = split;
        self.insert_connection((from, new_key), 1.0, true);
        self.insert_connection((new_key, to), old_weight, true);
        Some(new_key)
    }

    pub fn mutate_add_connection<R: Rng>(
        &mut self,
        config: &GenomeConfig,
        rng: &mut R,
    ) -> Option<ConnectionKey> {
        let outputs: Vec<i64> = self.nodes.keys().copied().collect();
        let to = *outputs.choose(rng)?;
        let mut sources = outputs.clone();
        sources.extend(config.input_keys());
        let from = *sources.choose(rng)?;
        let key = (from, to);

        if self.connections.contains_key(&key) {
            return None;
        }
        let output_keys = config.output_keys();
        if output_keys.contains(&from) && output_keys.contains(&to) {
            return None;
        }
        if config.feed_forward {
            let existing: Vec<ConnectionKey> = self.connections.keys().copied().collect();
            if creates_cycle(&existing, key) {
                return None;
            }
        }

        self.add_connection(key, config, rng);
        Some(key)
    }

    /// Remove a random hidden node and every connection touching it.
    pub fn mutate_delete_node<R: Rng>(&mut self, config: &GenomeConfig, rng: &mut R) -> Option<i64> {
        let output_keys = config.output_keys();
        let hidden: Vec<i64> = self
            .nodes
            .keys()
            .copied()
            .filter(|k| !output_keys.contains(k))
            .collect();
        let victim = *hidden.choose(rng)?;

        self.connections
            .retain(|&(from, to), _| from != victim && to != victim);
        self.nodes.remove(&victim);
        Some(victim)
    }

    pub fn mutate_delete_connection<R: Rng>(&mut self, rng: &mut R) -> Option<ConnectionKey> {
        let keys: Vec<ConnectionKey> = self.connections.keys().copied().collect();
        let victim = *keys.choose(rng)?;
        self.connections.remove(&victim);
        Some(victim)
    }

    /// Compatibility distance: per gene kind, the summed distance of
    /// matching genes plus the disjoint penalty, divided by the larger
    /// gene count.
    pub fn distance(&self, other: &Genome, config: &GenomeConfig) -> f64 {
        let c_disjoint = config.compatibility_disjoint_coefficient;

        let mut node_distance = 0.0;
        if !self.nodes.is_empty() || !other.nodes.is_empty() {
            let mut disjoint = other
                .nodes
                .keys()
                .filter(|k| !self.nodes.contains_key(k))
                .count();
            let mut matched = 0.0;
            for (k, n1) in &self.nodes {
                match other.nodes.get(k) {
                    Some(n2) => matched += n1.distance(n2, config),
                    None => disjoint += 1,
                }
            }
            let max_nodes = self.nodes.len().max(other.nodes.len()) as f64;
            node_distance = (matched + c_disjoint * disjoint as f64) / max_nodes;
        }

        let mut connection_distance = 0.0;
        if !self.connections.is_empty() || !other.connections.is_empty() {
            let mut disjoint = other
                .connections
                .keys()
                .filter(|k| !self.connections.contains_key(k))
                .count();
            let mut matched = 0.0;
            for (k, c1) in &self.connections {
                match other.connections.get(k) {
                    Some(c2) => matched += c1.distance(c2, config),
                    None => disjoint += 1,
                }
            }
            let max_conns = self.connections.len().max(other.connections.len()) as f64;
            connection_distance = (matched + c_disjoint * disjoint as f64) / max_conns;
        }

        node_distance + connection_distance
    }

    /// (nodes, enabled connections)
    pub fn size(&self) -> (usize, usize) {
        let enabled = self.connections.values().filter(|c| c.enabled).count();
        (self.nodes.len(), enabled)
    }

    fn next_node_key(&self) -> i64 {
        self.nodes.keys().next_back().map_or(0, |k| k + 1).max(0)
    }

    fn add_connection<R: Rng>(&mut self, key: ConnectionKey, config: &GenomeConfig, rng: &mut R) {
        self.connections
            .insert(key, ConnectionGene::new(key, config, rng));
    }

    fn insert_connection(&mut self, key: ConnectionKey, weight: f64, enabled: bool) {
        self.connections.insert(
            key,
            ConnectionGene {
                key,
                weight,
                enabled,
            },
        );
    }
}

/// Inputs to hidden and hidden to outputs, or inputs straight to outputs
/// when there are no hidden nodes.
fn full_connections(config: &GenomeConfig, hidden: &[i64]) -> Vec<ConnectionKey> {
    let inputs = config.input_keys();
    let outputs = config.output_keys();
    let mut keys = Vec::new();
    if hidden.is_empty() {
        for &i in &inputs {
            for &o in &outputs {
                keys.push((i, o));
            }
        }
    } else {
        for &i in &inputs {
            for &h in hidden {
                keys.push((i, h));
            }
        }
        for &h in hidden {
            for &o in &outputs {
                keys.push((h, o));
            }
        }
    }
    keys
}

/// JSON objects only take string keys, so connections are stored as a list.
mod connection_list {
    use super::{ConnectionGene, ConnectionKey};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<ConnectionKey, ConnectionGene>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let genes: Vec<&ConnectionGene> = map.values().collect();
        genes.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<ConnectionKey, ConnectionGene>, D::Error> {
        let genes = Vec::<ConnectionGene>::deserialize(deserializer)?;
        Ok(genes.into_iter().map(|g| (g.key, g)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neat::config::tests::sample;
    use crate::neat::graph::feed_forward_layers;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeSet;

    #[test]
    fn test_full_genome_shape() {
        let config = sample().genome;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let genome = Genome::new(1, &config, &mut rng);
        assert_eq!(genome.nodes.keys().copied().collect::<Vec<_>>(), vec![0]);
        let keys: Vec<_> = genome.connections.keys().copied().collect();
        assert_eq!(keys, vec![(-3, 0), (-2, 0), (-1, 0)]);
        assert_eq!(genome.size(), (1, 3));
    }

    #[test]
    fn test_hidden_nodes_get_fresh_keys() {
        let mut config = sample().genome;
        config.num_hidden = 2;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let genome = Genome::new(1, &config, &mut rng);
        assert_eq!(genome.nodes.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        // 3 inputs x 2 hidden + 2 hidden x 1 output, no direct links
        assert_eq!(genome.connections.len(), 8);
        assert!(!genome.connections.contains_key(&(-1, 0)));
    }

    #[test]
    fn test_unconnected_genome() {
        let mut config = sample().genome;
        config.initial_connection = InitialConnection::Unconnected;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let genome = Genome::new(1, &config, &mut rng);
        assert!(genome.connections.is_empty());
        assert_eq!(genome.nodes.len(), 1);
    }

    #[test]
    fn test_add_node_splits_connection() {
        let config = sample().genome;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut genome = Genome::new(1, &config, &mut rng);
        let new_key = genome.mutate_add_node(&config, &mut rng).unwrap();
        assert_eq!(new_key, 1);

        let disabled: Vec<_> = genome
            .connections
            .values()
            .filter(|c| !c.enabled)
            .collect();
        assert_eq!(disabled.len(), 1);
        let (from, to) = disabled[0].key;
        assert_eq!(genome.connections[&(from, new_key)].weight, 1.0);
        assert_eq!(
            genome.connections[&(new_key, to)].weight,
            disabled[0].weight
        );
    }

    #[test]
    fn test_delete_node_removes_its_connections() {
        let config = sample().genome;
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut genome = Genome::new(1, &config, &mut rng);
        let hidden = genome.mutate_add_node(&config, &mut rng).unwrap();
        assert_eq!(genome.mutate_delete_node(&config, &mut rng), Some(hidden));
        assert!(genome
            .connections
            .keys()
            .all(|&(a, b)| a != hidden && b != hidden));
        // Outputs are never deleted
        assert_eq!(genome.mutate_delete_node(&config, &mut rng), None);
    }

    #[test]
    fn test_mutation_never_creates_cycles() {
        let config = sample().genome;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut genome = Genome::new(1, &config, &mut rng);
        for _ in 0..300 {
            genome.mutate(&config, &mut rng);
            let conns: Vec<_> = genome.connections.keys().copied().collect();
            for (i, key) in conns.iter().enumerate() {
                let rest: Vec<_> = conns
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, k)| *k)
                    .collect();
                assert!(!creates_cycle(&rest, *key), "cycle through {key:?}");
            }

            // Each layer only reads from inputs and earlier layers
            let enabled: Vec<_> = genome
                .connections
                .values()
                .filter(|c| c.enabled)
                .map(|c| c.key)
                .collect();
            let inputs = config.input_keys();
            let layers = feed_forward_layers(&inputs, &config.output_keys(), &enabled);
            let mut ready: BTreeSet<i64> = inputs.iter().copied().collect();
            for layer in &layers {
                for node in layer {
                    assert!(!ready.contains(node), "node {node} placed twice");
                    assert!(
                        enabled
                            .iter()
                            .filter(|(_, to)| to == node)
                            .all(|(from, _)| ready.contains(from)),
                        "node {node} evaluated before its inputs"
                    );
                }
                ready.extend(layer.iter().copied());
            }
        }
    }

    #[test]
    fn test_distance() {
        let config = sample().genome;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let a = Genome::new(1, &config, &mut rng);
        assert_eq!(a.distance(&a, &config), 0.0);

        let mut b = a.clone();
        b.connections.remove(&(-1, 0));
        // One disjoint connection out of three
        let d = a.distance(&b, &config);
        assert!((d - 1.0 / 3.0).abs() < 1e-12, "{d}");
        assert_eq!(d, b.distance(&a, &config));
    }

    #[test]
    fn test_crossover_inherits_fitter_structure() {
        let config = sample().genome;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut fit = Genome::new(1, &config, &mut rng);
        let mut weak = fit.clone();
        fit.mutate_add_node(&config, &mut rng);
        weak.connections.remove(&(-2, 0));
        fit.fitness = Some(10.0);
        weak.fitness = Some(1.0);

        let child = Genome::crossover(3, &weak, &fit, &mut rng);
        assert_eq!(child.key, 3);
        assert_eq!(
            child.connections.keys().collect::<Vec<_>>(),
            fit.connections.keys().collect::<Vec<_>>()
        );
        assert_eq!(child.nodes.len(), fit.nodes.len());
        assert_eq!(child.fitness, None);
    }

    #[test]
    fn test_json_round_trip() {
        let config = sample().genome;
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut genome = Genome::new(4, &config, &mut rng);
        genome.mutate_add_node(&config, &mut rng);
        genome.fitness = Some(12.5);
        let json = serde_json::to_string(&genome).unwrap();
        let back: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key, 4);
        assert_eq!(back.fitness, Some(12.5));
        assert_eq!(
            back.nodes.keys().collect::<Vec<_>>(),
            genome.nodes.keys().collect::<Vec<_>>()
        );
        for (key, gene) in &genome.connections {
            let restored = &back.connections[key];
            assert_eq!(restored.key, *key);
            assert_eq!(restored.enabled, gene.enabled);
            assert!((restored.weight - gene.weight).abs() < 1e-12);
        }
    }
}
