//! One bird in an evaluated population.

use crate::game::Bird;

/// A bird, the policy steering it, and its running fitness.
///
/// `genome_index` points back into the slice of genomes being evaluated so
/// fitness can be written back once the episode ends.
#[derive(Debug, Clone)]
pub struct Contestant<D> {
    pub genome_index: usize,
    pub bird: Bird,
    pub brain: D,
    pub fitness: f64,
    pub alive: bool,
}

impl<D> Contestant<D> {
    pub fn new(genome_index: usize, brain: D) -> Self {
        Self {
            genome_index,
            bird: Bird::spawn(),
            brain,
            fitness: 0.0,
            alive: true,
        }
    }

    pub fn reward(&mut self, amount: f64) {
        self.fitness += amount;
    }

    /// Apply a penalty and mark for removal at the end of the tick.
    pub fn kill(&mut self, penalty: f64) {
        self.fitness -= penalty;
        self.alive = false;
    }
}
