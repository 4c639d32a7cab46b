//! Flappy Bird in the terminal, with a NEAT trainer.
//!
//! This module exposes the game logic for testing and the headless trainer.

pub mod core;
pub mod game;
pub mod neat;
pub mod play;
pub mod training;
pub mod ui;
pub mod utils;
