//! One generation's game: every contestant flies the same course until all
//! of them have crashed.

use super::contestant::Contestant;
use crate::core::{
    COLLISION_PENALTY, GROUND_Y, JUMP_THRESHOLD, PIPE_REWARD, PIPE_SPAWN_X, SURVIVAL_REWARD,
};
use crate::game::{out_of_bounds, pipe_collision, Base, Pipe, SpriteSet};
use crate::neat::DecisionFunction;
use rand::Rng;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub pipe_passed: bool,
    pub pipe_deaths: usize,
    pub bound_deaths: usize,
}

pub struct Episode<D> {
    /// Live contestants, in spawn order.
    pub contestants: Vec<Contestant<D>>,
    /// Crashed contestants with their final fitness.
    pub retired: Vec<Contestant<D>>,
    pub pipes: Vec<Pipe>,
    pub base: Base,
    pub score: u32,
    pub ticks: u64,
    population: usize,
}

impl<D: DecisionFunction> Episode<D> {
    pub fn new<R: Rng>(contestants: Vec<Contestant<D>>, sprites: &SpriteSet, rng: &mut R) -> Self {
        let population = contestants.len();
        Self {
            contestants,
            retired: Vec::with_capacity(population),
            pipes: vec![Pipe::random(PIPE_SPAWN_X, sprites.pipe_height(), rng)],
            base: Base::new(GROUND_Y, sprites.base_width()),
            score: 0,
            ticks: 0,
            population,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.contestants.is_empty()
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.contestants
            .iter()
            .chain(self.retired.iter())
            .map(|c| c.fitness)
            .reduce(f64::max)
    }

    /// The pipe the birds steer by: the second one once the lead bird has
    /// cleared the first.
    pub fn target_pipe_index(&self, pipe_width: i32) -> usize {
        match (self.contestants.first(), self.pipes.first()) {
            (Some(lead), Some(first))
                if self.pipes.len() > 1 && lead.bird.x > first.x + pipe_width =>
            {
                1
            }
            _ => 0,
        }
    }

    /// Advance the world by one tick.
    pub fn tick<R: Rng>(&mut self, sprites: &SpriteSet, rng: &mut R) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !self.is_running() {
            return outcome;
        }

        let pipe_width = sprites.pipe_width();
        let target = self.target_pipe_index(pipe_width);

        let gap = self
            .pipes
            .get(target)
            .map(|pipe| (pipe.height as f64, pipe.bottom as f64));
        for c in self.contestants.iter_mut() {
            c.bird.advance();
            c.reward(SURVIVAL_REWARD);

            // No pipe to steer by, no decision
            let Some((gap_top, gap_bottom)) = gap else {
                continue;
            };
            let y = c.bird.y;
            let output = c
                .brain
                .activate(&[y, (y - gap_top).abs(), (y - gap_bottom).abs()]);
            if output.first().is_some_and(|&o| o > JUMP_THRESHOLD) {
                c.bird.jump();
            }
        }

        self.base.advance();

        let mut expired = Vec::new();
        for (i, pipe) in self.pipes.iter_mut().enumerate() {
            for c in self.contestants.iter_mut().filter(|c| c.alive) {
                if pipe_collision(&c.bird, pipe, sprites) {
                    c.kill(COLLISION_PENALTY);
                    outcome.pipe_deaths += 1;
                    log::debug!(
                        "genome #{} hit a pipe at tick {} (fitness {:.1})",
                        c.genome_index,
                        self.ticks,
                        c.fitness
                    );
                }
                if !pipe.passed && pipe.x < c.bird.x {
                    pipe.passed = true;
                    outcome.pipe_passed = true;
                }
            }
            if pipe.is_off_screen(pipe_width) {
                expired.push(i);
            }
            pipe.advance();
        }

        if outcome.pipe_passed {
            self.score += 1;
            for c in self.contestants.iter_mut().filter(|c| c.alive) {
                c.reward(PIPE_REWARD);
            }
            self.pipes
                .push(Pipe::random(PIPE_SPAWN_X, sprites.pipe_height(), rng));
        }

        for i in expired.into_iter().rev() {
            self.pipes.remove(i);
        }

        for c in self.contestants.iter_mut().filter(|c| c.alive) {
            if out_of_bounds(&c.bird, sprites) {
                c.kill(COLLISION_PENALTY);
                outcome.bound_deaths += 1;
                log::debug!(
                    "genome #{} left the screen at y={:.1} (fitness {:.1})",
                    c.genome_index,
                    c.bird.y,
                    c.fitness
                );
            }
        }

        self.sweep();
        for c in self.contestants.iter_mut() {
            c.bird.animate();
        }
        self.ticks += 1;
        outcome
    }

    fn sweep(&mut self) {
        let (alive, dead): (Vec<_>, Vec<_>) = std::mem::take(&mut self.contestants)
            .into_iter()
            .partition(|c| c.alive);
        self.contestants = alive;
        self.retired.extend(dead);
    }

    /// Every contestant, live or retired.
    pub fn into_contestants(self) -> Vec<Contestant<D>> {
        let mut all = self.retired;
        all.extend(self.contestants);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BIRD_START_X;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Replays a fixed answer.
    struct Fixed(f64);

    impl DecisionFunction for Fixed {
        fn activate(&mut self, _inputs: &[f64]) -> Vec<f64> {
            vec![self.0]
        }
    }

    fn episode(outputs: &[f64]) -> (Episode<Fixed>, SpriteSet, ChaCha8Rng) {
        let sprites = SpriteSet::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let contestants = outputs
            .iter()
            .enumerate()
            .map(|(i, &o)| Contestant::new(i, Fixed(o)))
            .collect();
        let episode = Episode::new(contestants, &sprites, &mut rng);
        (episode, sprites, rng)
    }

    #[test]
    fn test_first_tick_rewards_survival() {
        let (mut ep, sprites, mut rng) = episode(&[0.0, 0.0]);
        let outcome = ep.tick(&sprites, &mut rng);
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(ep.ticks, 1);
        for c in &ep.contestants {
            assert!((c.fitness - 0.1).abs() < 1e-12);
            assert_eq!(c.bird.y, 351.5);
        }
        assert_eq!(ep.pipes[0].x, PIPE_SPAWN_X - 5);
    }

    #[test]
    fn test_birds_fly_on_without_pipes() {
        let (mut ep, sprites, mut rng) = episode(&[1.0, 0.0]);
        ep.pipes.clear();
        let outcome = ep.tick(&sprites, &mut rng);
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(ep.ticks, 1);
        for c in &ep.contestants {
            assert!((c.fitness - 0.1).abs() < 1e-12);
            assert_eq!(c.bird.y, 351.5);
            // Nothing to aim at, so even an eager brain does not jump
            assert_eq!(c.bird.velocity, 0.0);
        }
    }

    #[test]
    fn test_jump_threshold_is_strict() {
        let (mut ep, sprites, mut rng) = episode(&[0.5, 0.51]);
        ep.tick(&sprites, &mut rng);
        // 0.5 does not jump, 0.51 does
        assert_eq!(ep.contestants[0].bird.velocity, 0.0);
        assert_eq!(ep.contestants[1].bird.velocity, -10.5);
    }

    #[test]
    fn test_falling_birds_die_together_and_keep_fitness() {
        let (mut ep, sprites, mut rng) = episode(&[0.0, 0.0, 0.0]);
        let mut ticks = 0;
        while ep.is_running() {
            let outcome = ep.tick(&sprites, &mut rng);
            ticks += 1;
            if !ep.is_running() {
                assert_eq!(outcome.bound_deaths, 3);
            }
            assert!(ticks < 100);
        }
        assert_eq!(ep.retired.len(), 3);
        let fitness = ep.retired[0].fitness;
        // 0.1 per tick survived, minus the crash
        assert!((fitness - (ticks as f64 * 0.1 - 1.0)).abs() < 1e-9);
        assert!(ep.retired.iter().all(|c| c.fitness == fitness && !c.alive));
    }

    #[test]
    fn test_passing_a_pipe_scores_once() {
        let (mut ep, sprites, mut rng) = episode(&[0.0, 0.0]);
        // A wide-open pipe just ahead of both birds
        ep.pipes = vec![Pipe::with_height(BIRD_START_X + 2, 1, sprites.pipe_height())];
        ep.pipes[0].bottom = 10_000;
        for c in ep.contestants.iter_mut() {
            c.fitness = 10.0;
        }

        // x 232 -> 227 after the first pass check, so the pass lands on tick 2
        let first = ep.tick(&sprites, &mut rng);
        assert!(!first.pipe_passed);
        let second = ep.tick(&sprites, &mut rng);
        assert!(second.pipe_passed);
        assert_eq!(ep.score, 1);
        assert_eq!(ep.pipes.len(), 2);
        assert_eq!(ep.pipes[1].x, PIPE_SPAWN_X);
        for c in &ep.contestants {
            assert!((c.fitness - (10.0 + 0.2 + 5.0)).abs() < 1e-9);
        }

        let third = ep.tick(&sprites, &mut rng);
        assert!(!third.pipe_passed);
        assert_eq!(ep.score, 1);
    }

    #[test]
    fn test_pipe_collision_penalises_and_retires() {
        let (mut ep, sprites, mut rng) = episode(&[0.0]);
        // Solid wall: gap far below the bird
        ep.pipes = vec![Pipe::with_height(BIRD_START_X, 700, sprites.pipe_height())];
        let outcome = ep.tick(&sprites, &mut rng);
        assert_eq!(outcome.pipe_deaths, 1);
        assert!(!ep.is_running());
        let dead = &ep.retired[0];
        assert!((dead.fitness - (0.1 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_target_switches_after_lead_clears_first_pipe() {
        let (mut ep, sprites, _) = episode(&[0.0]);
        let w = sprites.pipe_width();
        ep.pipes = vec![
            Pipe::with_height(BIRD_START_X - w, 200, sprites.pipe_height()),
            Pipe::with_height(500, 200, sprites.pipe_height()),
        ];
        assert_eq!(ep.target_pipe_index(w), 0);
        ep.pipes[0].x -= 1;
        assert_eq!(ep.target_pipe_index(w), 1);

        ep.pipes.truncate(1);
        assert_eq!(ep.target_pipe_index(w), 0);
    }

    #[test]
    fn test_expired_pipe_removed() {
        let (mut ep, sprites, mut rng) = episode(&[0.0]);
        let w = sprites.pipe_width();
        ep.pipes = vec![
            Pipe::with_height(-w - 1, 200, sprites.pipe_height()),
            Pipe::with_height(500, 200, sprites.pipe_height()),
        ];
        ep.pipes[0].passed = true;
        ep.tick(&sprites, &mut rng);
        assert_eq!(ep.pipes.len(), 1);
        assert_eq!(ep.pipes[0].x, 495);
    }

    #[test]
    fn test_into_contestants_returns_everyone() {
        let (mut ep, sprites, mut rng) = episode(&[0.0, 0.0]);
        ep.tick(&sprites, &mut rng);
        let all = ep.into_contestants();
        assert_eq!(all.len(), 2);
    }
}
