//! Compute module - Firework state machine and software rendering.

mod flare;
mod raster;
mod scene;

pub use flare::*;
pub use raster::*;
pub use scene::*;
