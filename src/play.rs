//! The single-player variant.
//!
//! The bird is never told to jump: each tick only applies physics and draws
//! the frame, so it drops off the bottom of the screen and keeps falling
//! until the player quits. There is no scoring and no collision check.

use crate::core::clock::FrameClock;
use crate::core::error::Result;
use crate::core::GROUND_Y;
use crate::game::{Base, Bird, SpriteSet};
use crate::ui::{FrameSink, SceneView, Signal};

pub const PLAY_TITLE: &str = "Flappy Bird";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Running,
    Terminated,
}

pub struct PlayGame {
    pub bird: Bird,
    pub base: Base,
    pub state: PlayState,
    pub ticks: u64,
}

impl PlayGame {
    pub fn new(sprites: &SpriteSet) -> Self {
        Self {
            bird: Bird::spawn(),
            base: Base::new(GROUND_Y, sprites.base_width()),
            state: PlayState::Running,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) {
        if self.state != PlayState::Running {
            return;
        }
        self.bird.advance();
        self.bird.animate();
        self.ticks += 1;
    }

    fn scene<'a>(&'a self, sprites: &'a SpriteSet) -> SceneView<'a> {
        SceneView {
            title: PLAY_TITLE,
            sprites,
            birds: vec![&self.bird],
            pipes: &[],
            base: &self.base,
            score: None,
            generation: None,
            alive: 1,
            population: 1,
            best_fitness: None,
            ticks: self.ticks,
        }
    }
}

/// Run until the sink reports the quit signal, or for `max_ticks` ticks.
pub fn run<S: FrameSink + ?Sized>(
    sprites: &SpriteSet,
    sink: &mut S,
    mut clock: Option<FrameClock>,
    max_ticks: Option<u64>,
) -> Result<PlayGame> {
    let mut game = PlayGame::new(sprites);
    log::info!("single-player game started");

    while game.state == PlayState::Running {
        if let Some(clock) = clock.as_mut() {
            clock.tick();
        }
        game.tick();

        if sink.present(&game.scene(sprites))? == Signal::Quit
            || max_ticks.is_some_and(|max| game.ticks >= max)
        {
            game.state = PlayState::Terminated;
        }
    }

    log::info!(
        "single-player game ended after {} ticks at y={:.0}",
        game.ticks,
        game.bird.y
    );
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::HeadlessSink;

    #[test]
    fn test_bird_falls_without_input() {
        let sprites = SpriteSet::builtin();
        let mut sink = HeadlessSink::default();
        let game = run(&sprites, &mut sink, None, Some(100)).unwrap();
        assert_eq!(game.state, PlayState::Terminated);
        assert_eq!(game.ticks, 100);
        assert_eq!(sink.frames, 100);
        // Falls straight through the ground; nothing stops it
        assert!(game.bird.y > GROUND_Y as f64);
        assert_eq!(game.bird.tilt, -90.0);
        // Base stays put
        assert_eq!(game.base.x1, 0);
    }

    #[test]
    fn test_terminated_game_ignores_ticks() {
        let sprites = SpriteSet::builtin();
        let mut game = PlayGame::new(&sprites);
        game.state = PlayState::Terminated;
        game.tick();
        assert_eq!(game.ticks, 0);
        assert_eq!(game.bird.y, 350.0);
    }
}
