//! Frame output: the sink trait the game loops draw through, and the
//! terminal renderer behind it.

pub mod layout;
pub mod scene;
pub mod terminal;

use crate::game::{Base, Bird, Pipe, SpriteSet};
use std::io;

pub use terminal::{TerminalGuard, TerminalSink};

/// What the player asked for while the frame was up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Quit,
}

/// Everything needed to draw one frame.
pub struct SceneView<'a> {
    pub title: &'a str,
    pub sprites: &'a SpriteSet,
    pub birds: Vec<&'a Bird>,
    pub pipes: &'a [Pipe],
    pub base: &'a Base,
    /// None in the single-player variant, which does not score.
    pub score: Option<u32>,
    pub generation: Option<u32>,
    pub alive: usize,
    pub population: usize,
    pub best_fitness: Option<f64>,
    pub ticks: u64,
}

/// Receives one frame per tick and reports the quit signal.
pub trait FrameSink {
    fn present(&mut self, scene: &SceneView<'_>) -> io::Result<Signal>;
}

/// Draws nothing and never quits.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    pub frames: u64,
}

impl FrameSink for HeadlessSink {
    fn present(&mut self, _scene: &SceneView<'_>) -> io::Result<Signal> {
        self.frames += 1;
        Ok(Signal::Continue)
    }
}
