//! NeuroEvolution of Augmenting Topologies.
//!
//! Genomes encode a network as node and connection genes. A population is
//! split into species by genetic distance, each species gets offspring in
//! proportion to its shared fitness, and stagnant species are culled.

pub mod activation;
pub mod config;
pub mod gene;
pub mod genome;
pub mod graph;
pub mod network;
pub mod population;
pub mod reporter;
pub mod reproduction;
pub mod species;
pub mod stagnation;

pub use config::NeatConfig;
pub use genome::{Genome, GenomeKey};
pub use network::{DecisionFunction, FeedForwardNetwork};
pub use population::Population;
pub use reporter::{LogReporter, Reporter, ReporterSet, StatisticsReporter};
