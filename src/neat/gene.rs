//! Node and connection genes and their attribute sampling.

use super::activation::Activation;
use super::config::{FloatAttribute, GenomeConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Normal sample. A zero, negative or non-finite `stdev` yields `mean`.
pub fn gauss<R: Rng>(rng: &mut R, mean: f64, stdev: f64) -> f64 {
    match Normal::new(mean, stdev) {
        Ok(normal) if stdev > 0.0 => normal.sample(rng),
        _ => mean,
    }
}

pub fn init_float<R: Rng>(attr: &FloatAttribute, rng: &mut R) -> f64 {
    attr.clamp(gauss(rng, attr.init_mean, attr.init_stdev))
}

/// Perturb with probability `mutate_rate`, otherwise replace with
/// probability `replace_rate`, otherwise keep.
pub fn mutate_float<R: Rng>(value: f64, attr: &FloatAttribute, rng: &mut R) -> f64 {
    let r: f64 = rng.gen();
    if r < attr.mutate_rate {
        attr.clamp(value + gauss(rng, 0.0, attr.mutate_power))
    } else if r < attr.mutate_rate + attr.replace_rate {
        init_float(attr, rng)
    } else {
        value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    pub key: i64,
    pub bias: f64,
    pub activation: Activation,
}

impl NodeGene {
    pub fn new<R: Rng>(key: i64, config: &GenomeConfig, rng: &mut R) -> Self {
        Self {
            key,
            bias: init_float(&config.bias, rng),
            activation: config.activation_default,
        }
    }

    pub fn mutate<R: Rng>(&mut self, config: &GenomeConfig, rng: &mut R) {
        self.bias = mutate_float(self.bias, &config.bias, rng);
        if config.activation_mutate_rate > 0.0 && rng.gen::<f64>() < config.activation_mutate_rate {
            if let Some(choice) = config.activation_choices().choose(rng) {
                self.activation = *choice;
            }
        }
    }

    pub fn distance(&self, other: &NodeGene, config: &GenomeConfig) -> f64 {
        let mut d = (self.bias - other.bias).abs();
        if self.activation != other.activation {
            d += 1.0;
        }
        d * config.compatibility_weight_coefficient
    }

    /// Each attribute comes from either parent with equal odds.
    pub fn crossover<R: Rng>(&self, other: &NodeGene, rng: &mut R) -> NodeGene {
        NodeGene {
            key: self.key,
            bias: if rng.gen_bool(0.5) { self.bias } else { other.bias },
            activation: if rng.gen_bool(0.5) {
                self.activation
            } else {
                other.activation
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    pub key: (i64, i64),
    pub weight: f64,
    pub enabled: bool,
}

impl ConnectionGene {
    pub fn new<R: Rng>(key: (i64, i64), config: &GenomeConfig, rng: &mut R) -> Self {
        Self {
            key,
            weight: init_float(&config.weight, rng),
            enabled: config.enabled_default,
        }
    }

    pub fn mutate<R: Rng>(&mut self, config: &GenomeConfig, rng: &mut R) {
        self.weight = mutate_float(self.weight, &config.weight, rng);
        if config.enabled_mutate_rate > 0.0 && rng.gen::<f64>() < config.enabled_mutate_rate {
            self.enabled = rng.gen_bool(0.5);
        }
    }

    pub fn distance(&self, other: &ConnectionGene, config: &GenomeConfig) -> f64 {
        let mut d = (self.weight - other.weight).abs();
        if self.enabled != other.enabled {
            d += 1.0;
        }
        d * config.compatibility_weight_coefficient
    }

    /// Like node crossover, except a gene disabled in either parent stays
    /// disabled three times out of four.
    pub fn crossover<R: Rng>(&self, other: &ConnectionGene, rng: &mut R) -> ConnectionGene {
        let weight = if rng.gen_bool(0.5) { self.weight } else { other.weight };
        let mut enabled = if rng.gen_bool(0.5) {
            self.enabled
        } else {
            other.enabled
        };
        if !self.enabled || !other.enabled {
            enabled = rng.gen::<f64>() > 0.75;
        }
        ConnectionGene {
            key: self.key,
            weight,
            enabled,
        }
    }
}
