//! Flare - a firework particle animation with PNG pixel-buffer utilities.
//!
//! Emitters rise from the bottom of the view, decelerate, burst into a ring
//! of points that spreads outward, then reset at fresh random positions.
//! Frames are rasterized on the CPU and can be written out as PNG files.
//!
//! # Architecture
//!
//! - `schema`: Configuration types for the animation
//! - `compute`: The rise/flare state machine, draw-call scene and rasterizer
//! - `buffer`: Color and grayscale pixel buffers, PNG I/O and histograms
//! - `animation`: Display/reshape/idle driver and frame recording
//!
//! # Example
//!
//! ```rust,no_run
//! use flare::{
//!     animation::{FlareAnimation, FrameRecorder, HeadlessLoop},
//!     schema::FlareConfig,
//! };
//!
//! let config = FlareConfig::default();
//! let ticks = config.rise_ticks() + config.flare_ticks();
//!
//! let mut animation = FlareAnimation::new(config).unwrap();
//! let mut recorder = FrameRecorder::new("frames", Default::default()).unwrap();
//!
//! // One full rise and burst
//! let stats = HeadlessLoop::new(800, 600, ticks)
//!     .run(&mut animation, &mut recorder)
//!     .unwrap();
//! println!("{}", stats);
//! ```

pub mod animation;
pub mod buffer;
pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use buffer::{BufferError, ColorImage, GrayscaleImage, Rgba};
pub use compute::{Choreography, FlareState, Phase};
pub use schema::FlareConfig;
