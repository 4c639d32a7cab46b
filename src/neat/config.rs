//! NEAT hyperparameters, loaded from a TOML file.

use super::activation::Activation;
use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a population's fitness is summarised for the termination check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessCriterion {
    Max,
    Min,
    Mean,
}

impl FitnessCriterion {
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            FitnessCriterion::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            FitnessCriterion::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            FitnessCriterion::Mean => mean(values),
        }
    }
}

/// Initial connectivity of freshly created genomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialConnection {
    /// No connections at all.
    Unconnected,
    /// Every input to every hidden node, every hidden node to every output.
    /// Inputs connect straight to outputs only when there are no hidden nodes.
    Full,
}

/// Settings for a float gene attribute (bias, weight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatAttribute {
    pub init_mean: f64,
    pub init_stdev: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub mutate_rate: f64,
    pub mutate_power: f64,
    pub replace_rate: f64,
}

impl FloatAttribute {
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min_value).min(self.max_value)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.min_value > self.max_value {
            return Err(Error::ConfigInvalid(format!(
                "{name}: min_value {} is above max_value {}",
                self.min_value, self.max_value
            )));
        }
        if self.init_stdev < 0.0 || self.mutate_power < 0.0 {
            return Err(Error::ConfigInvalid(format!(
                "{name}: standard deviations must not be negative"
            )));
        }
        for (field, p) in [
            ("mutate_rate", self.mutate_rate),
            ("replace_rate", self.replace_rate),
        ] {
            check_probability(&format!("{name}.{field}"), p)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub fitness_criterion: FitnessCriterion,
    pub fitness_threshold: f64,
    pub pop_size: usize,
    #[serde(default)]
    pub reset_on_extinction: bool,
    #[serde(default)]
    pub no_fitness_termination: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeConfig {
    pub num_inputs: usize,
    pub num_outputs: usize,
    #[serde(default)]
    pub num_hidden: usize,
    #[serde(default = "default_true")]
    pub feed_forward: bool,
    pub initial_connection: InitialConnection,

    pub activation_default: Activation,
    #[serde(default)]
    pub activation_mutate_rate: f64,
    /// Defaults to just `activation_default`.
    #[serde(default)]
    pub activation_options: Vec<Activation>,

    pub compatibility_disjoint_coefficient: f64,
    pub compatibility_weight_coefficient: f64,

    pub conn_add_prob: f64,
    pub conn_delete_prob: f64,
    pub node_add_prob: f64,
    pub node_delete_prob: f64,

    pub bias: FloatAttribute,
    pub weight: FloatAttribute,

    #[serde(default = "default_true")]
    pub enabled_default: bool,
    #[serde(default)]
    pub enabled_mutate_rate: f64,
}

impl GenomeConfig {
    /// Input node keys: -1, -2, ... -num_inputs.
    pub fn input_keys(&self) -> Vec<i64> {
        (1..=self.num_inputs as i64).map(|k| -k).collect()
    }

    /// Output node keys: 0 .. num_outputs.
    pub fn output_keys(&self) -> Vec<i64> {
        (0..self.num_outputs as i64).collect()
    }

    pub fn activation_choices(&self) -> Vec<Activation> {
        if self.activation_options.is_empty() {
            vec![self.activation_default]
        } else {
            self.activation_options.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSetConfig {
    pub compatibility_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagnationConfig {
    pub species_fitness_func: FitnessCriterion,
    pub max_stagnation: usize,
    #[serde(default)]
    pub species_elitism: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReproductionConfig {
    #[serde(default)]
    pub elitism: usize,
    pub survival_threshold: f64,
    #[serde(default = "default_min_species_size")]
    pub min_species_size: usize,
}

/// The whole hyperparameter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeatConfig {
    pub neat: PopulationConfig,
    pub genome: GenomeConfig,
    pub species_set: SpeciesSetConfig,
    pub stagnation: StagnationConfig,
    pub reproduction: ReproductionConfig,
}

impl NeatConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: NeatConfig = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded NEAT config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.genome;
        if self.neat.pop_size == 0 {
            return Err(Error::ConfigInvalid("pop_size must be at least 1".into()));
        }
        if g.num_inputs == 0 || g.num_outputs == 0 {
            return Err(Error::ConfigInvalid(
                "genomes need at least one input and one output".into(),
            ));
        }
        for (name, p) in [
            ("conn_add_prob", g.conn_add_prob),
            ("conn_delete_prob", g.conn_delete_prob),
            ("node_add_prob", g.node_add_prob),
            ("node_delete_prob", g.node_delete_prob),
            ("activation_mutate_rate", g.activation_mutate_rate),
            ("enabled_mutate_rate", g.enabled_mutate_rate),
            ("survival_threshold", self.reproduction.survival_threshold),
        ] {
            check_probability(name, p)?;
        }
        g.bias.validate("bias")?;
        g.weight.validate("weight")?;
        if self.species_set.compatibility_threshold <= 0.0 {
            return Err(Error::ConfigInvalid(
                "compatibility_threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::ConfigInvalid(format!(
            "{name} must be within [0, 1], got {p}"
        )))
    }
}

fn default_true() -> bool {
    true
}

fn default_min_species_size() -> usize {
    1
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn stdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// The shipped hyperparameters, used across the NEAT tests.
    pub(crate) const SAMPLE: &str = include_str!("../../neat-config.toml");

    pub(crate) fn sample() -> NeatConfig {
        let config: NeatConfig = toml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();
        config
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = sample();
        assert_eq!(config.neat.pop_size, 50);
        assert_eq!(config.neat.fitness_criterion, FitnessCriterion::Max);
        assert_eq!(config.genome.num_inputs, 3);
        assert_eq!(config.genome.num_outputs, 1);
        assert_eq!(config.genome.activation_default, Activation::Tanh);
        assert_eq!(config.genome.initial_connection, InitialConnection::Full);
        assert_eq!(config.genome.input_keys(), vec![-1, -2, -3]);
        assert_eq!(config.genome.output_keys(), vec![0]);
    }

    #[test]
    fn test_bad_probability_rejected() {
        let mut config = sample();
        config.genome.conn_add_prob = 1.5;
        assert!(matches!(config.validate(), Err(Error::ConfigInvalid(_))));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = sample();
        config.genome.weight.min_value = 10.0;
        config.genome.weight.max_value = -10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[neat]\npop_size = \"many\"\n").unwrap();
        match NeatConfig::load(&path) {
            Err(Error::ConfigParse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_fitness_criterion() {
        let values = [1.0, 4.0, 7.0];
        assert_eq!(FitnessCriterion::Max.apply(&values), 7.0);
        assert_eq!(FitnessCriterion::Min.apply(&values), 1.0);
        assert_eq!(FitnessCriterion::Mean.apply(&values), 4.0);
    }

    #[test]
    fn test_stdev() {
        assert_eq!(stdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
        assert_eq!(stdev(&[]), 0.0);
    }
}
