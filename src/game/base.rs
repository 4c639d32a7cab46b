//! The scrolling ground.

use crate::core::SCROLL_VELOCITY;

/// Two ground segments tiled side by side that wrap around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    pub width: i32,
}

impl Base {
    pub fn new(y: i32, width: i32) -> Self {
        Self {
            y,
            x1: 0,
            x2: width,
            width,
        }
    }

    pub fn advance(&mut self) {
        self.x1 -= SCROLL_VELOCITY;
        self.x2 -= SCROLL_VELOCITY;

        if self.x1 + self.width < 0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0 {
            self.x2 = self.x1 + self.width;
        }
    }
}
