//! Constants, errors, pacing and logging shared by both game variants.

pub mod clock;
pub mod constants;
pub mod error;
pub mod logging;

pub use constants::*;
pub use error::{Error, Result};
