//! Bird vs pipe and bird vs screen-band checks.

use super::bird::Bird;
use super::mask::Mask;
use super::pipe::Pipe;
use super::sprites::SpriteSet;
use crate::core::GROUND_Y;

/// The bird's rotated mask and where its top-left corner sits in the world.
#[derive(Debug, Clone)]
pub struct BirdPose {
    pub mask: Mask,
    pub left: i32,
    pub top: i32,
}

impl BirdPose {
    /// The current frame rotated by the tilt, centred where the upright
    /// frame would be drawn.
    pub fn of(bird: &Bird, sprites: &SpriteSet) -> Self {
        let frame = sprites.bird_frame(bird.frame);
        let mask = frame.rotated(bird.tilt);

        let center_x = bird.x + frame.width() as i32 / 2;
        let center_y = bird.y.round() as i32 + frame.height() as i32 / 2;

        Self {
            left: center_x - mask.width() as i32 / 2,
            top: center_y - mask.height() as i32 / 2,
            mask,
        }
    }

    /// Pixel overlap with either half of `pipe`.
    pub fn hits(&self, pipe: &Pipe, sprites: &SpriteSet) -> bool {
        let top_offset = (pipe.x - self.left, pipe.top - self.top);
        let bottom_offset = (pipe.x - self.left, pipe.bottom - self.top);

        self.mask.overlaps(sprites.pipe_bottom(), bottom_offset)
            || self.mask.overlaps(sprites.pipe_top(), top_offset)
    }
}

pub fn pipe_collision(bird: &Bird, pipe: &Pipe, sprites: &SpriteSet) -> bool {
    BirdPose::of(bird, sprites).hits(pipe, sprites)
}

/// Touching the ground line or leaving through the top of the screen.
pub fn out_of_bounds(bird: &Bird, sprites: &SpriteSet) -> bool {
    bird.y + sprites.bird_height() as f64 >= GROUND_Y as f64 || bird.y < 0.0
}
