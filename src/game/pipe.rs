//! Pipe obstacles.

use crate::core::{PIPE_GAP, PIPE_MAX_HEIGHT, PIPE_MIN_HEIGHT, SCROLL_VELOCITY};
use rand::Rng;

/// A top + bottom pipe pair with a gap between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipe {
    pub x: i32,
    /// Bottom edge of the top pipe.
    pub height: i32,
    /// Y of the top pipe sprite (its bottom edge is `height`).
    pub top: i32,
    /// Top edge of the bottom pipe.
    pub bottom: i32,
    pub passed: bool,
}

impl Pipe {
    /// A pipe with a gap starting at `height`. `sprite_height` is the pipe
    /// art's height, used to place the upside-down top pipe.
    pub fn with_height(x: i32, height: i32, sprite_height: i32) -> Self {
        Self {
            x,
            height,
            top: height - sprite_height,
            bottom: height + PIPE_GAP,
            passed: false,
        }
    }

    /// A pipe with a random gap height in [50, 450).
    pub fn random<R: Rng>(x: i32, sprite_height: i32, rng: &mut R) -> Self {
        let height = rng.gen_range(PIPE_MIN_HEIGHT..PIPE_MAX_HEIGHT);
        Self::with_height(x, height, sprite_height)
    }

    pub fn advance(&mut self) {
        self.x -= SCROLL_VELOCITY;
    }

    pub fn is_off_screen(&self, pipe_width: i32) -> bool {
        self.x + pipe_width < 0
    }
}
