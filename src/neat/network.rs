//! Feed-forward phenotype built from a genome.

use super::activation::Activation;
use super::config::GenomeConfig;
use super::genome::Genome;
use super::graph::feed_forward_layers;
use std::collections::HashMap;

/// Maps an observation to output values. The game only needs this much of
/// a network.
pub trait DecisionFunction {
    fn activate(&mut self, inputs: &[f64]) -> Vec<f64>;
}

#[derive(Debug, Clone)]
struct NodeEval {
    node: i64,
    activation: Activation,
    bias: f64,
    links: Vec<(i64, f64)>,
}

#[derive(Debug, Clone)]
pub struct FeedForwardNetwork {
    inputs: Vec<i64>,
    outputs: Vec<i64>,
    evals: Vec<NodeEval>,
    values: HashMap<i64, f64>,
}

impl FeedForwardNetwork {
    /// Only enabled connections count. Nodes that cannot reach an output
    /// are left out, and outputs nothing reaches stay at 0.
    pub fn create(genome: &Genome, config: &GenomeConfig) -> Self {
        let inputs = config.input_keys();
        let outputs = config.output_keys();
        let enabled: Vec<(i64, i64)> = genome
            .connections
            .values()
            .filter(|c| c.enabled)
            .map(|c| c.key)
            .collect();

        let mut evals = Vec::new();
        for layer in feed_forward_layers(&inputs, &outputs, &enabled) {
            for node in layer {
                let links = genome
                    .connections
                    .values()
                    .filter(|c| c.enabled && c.key.1 == node)
                    .map(|c| (c.key.0, c.weight))
                    .collect();
                if let Some(gene) = genome.nodes.get(&node) {
                    evals.push(NodeEval {
                        node,
                        activation: gene.activation,
                        bias: gene.bias,
                        links,
                    });
                }
            }
        }

        let values = inputs
            .iter()
            .chain(outputs.iter())
            .map(|&k| (k, 0.0))
            .collect();

        Self {
            inputs,
            outputs,
            evals,
            values,
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl DecisionFunction for FeedForwardNetwork {
    /// Missing inputs read as 0 and extra ones are ignored.
    fn activate(&mut self, inputs: &[f64]) -> Vec<f64> {
        for (i, key) in self.inputs.iter().enumerate() {
            self.values.insert(*key, inputs.get(i).copied().unwrap_or(0.0));
        }

        for eval in &self.evals {
            let sum: f64 = eval
                .links
                .iter()
                .map(|(from, w)| self.values.get(from).copied().unwrap_or(0.0) * w)
                .sum();
            let value = eval.activation.apply(eval.bias + sum);
            self.values.insert(eval.node, value);
        }

        self.outputs
            .iter()
            .map(|k| self.values.get(k).copied().unwrap_or(0.0))
            .collect()
    }
}
