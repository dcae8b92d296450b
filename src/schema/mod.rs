//! Schema module - Configuration types for the firework animation.

mod config;

pub use config::*;
