//! Headless driver and frame recording for the firework animation.
//!
//! The window-system callbacks (display, reshape, idle) are modelled by the
//! [`FrameCallbacks`] trait. [`HeadlessLoop`] drives them for a fixed number
//! of ticks, and [`FrameRecorder`] writes the rendered frames out as a PNG
//! sequence:
//!
//! ```text
//! out_dir/
//!   frame_000000.png
//!   frame_000001.png
//!   ...
//! ```

mod driver;
mod recorder;

pub use driver::{FlareAnimation, FrameCallbacks, HeadlessLoop, LoopStats};
pub use recorder::{FrameRecorder, RecorderConfig, RecordingStats};
