//! Flappy Bird world: entity state, physics, sprites and collisions.
//!
//! Coordinates follow the screen: the origin is the top-left corner and y
//! grows downward, so a jump is a negative velocity.

pub mod base;
pub mod bird;
pub mod collision;
pub mod mask;
pub mod pipe;
pub mod sprites;

pub use base::Base;
pub use bird::{displacement, Bird};
pub use collision::{out_of_bounds, pipe_collision, BirdPose};
pub use mask::Mask;
pub use pipe::Pipe;
pub use sprites::SpriteSet;
