//! Buffer module - In-memory pixel buffers with PNG load/save and histograms.

mod codec;
mod color;
mod gray;
mod histogram;

pub use codec::{BufferError, Result};
pub use color::*;
pub use gray::*;
pub use histogram::*;
