//! Configuration types for the firework animation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_background() -> PathBuf {
    PathBuf::from("back.jpg")
}

fn default_anchor() -> Option<f32> {
    Some(2.5)
}

/// Top-level animation configuration.
///
/// Distances are in world units. The visible world is the square
/// `[0, 5] x [0, 5]`, viewed along +z.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlareConfig {
    /// Number of emitters (fireworks).
    pub emitters: usize,
    /// Number of flare points per emitter once burst.
    pub flare_points: usize,
    /// Rise speed at the start of each cycle (world units per tick).
    pub initial_speed: f32,
    /// Amount subtracted from the speed every tick.
    pub speed_decay: f32,
    /// Amount added to the spread radius every tick.
    pub spread_step: f32,
    /// Spread radius beyond which a burst ends and the cycle restarts.
    pub spread_threshold: f32,
    /// Emitter placement: horizontal seeds are drawn from `k / slots * span`.
    pub seeds: SeedConfig,
    /// Drawing parameters.
    pub style: StyleConfig,
    /// Output surface.
    pub view: ViewConfig,
}

impl Default for FlareConfig {
    fn default() -> Self {
        Self {
            emitters: 5,
            flare_points: 7,
            initial_speed: 0.003,
            speed_decay: 0.000_001,
            spread_step: 0.000_5,
            spread_threshold: 0.5,
            seeds: SeedConfig::default(),
            style: StyleConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

/// Horizontal emitter placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of discrete horizontal slots.
    pub slots: u32,
    /// Width covered by the slots.
    pub span: f32,
    /// Fixed position for emitter 0, reapplied after every reset.
    #[serde(default = "default_anchor")]
    pub anchor: Option<f32>,
    /// RNG seed. `None` draws from entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            slots: 50,
            span: 5.0,
            anchor: default_anchor(),
            rng_seed: None,
        }
    }
}

/// Geometry and color of the drawn primitives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Depth of the emitters.
    pub depth: f32,
    /// Depth of the background quad.
    pub background_depth: f32,
    /// Octahedron scale while rising.
    pub rising_scale: f32,
    /// Octahedron scale for each flare point.
    pub flare_scale: f32,
    /// Firework color (RGB, 0.0-1.0).
    pub color: [f32; 3],
    /// Clear color (RGBA, 0.0-1.0).
    pub clear_color: [f32; 4],
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            depth: 5.0,
            background_depth: 10.0,
            rising_scale: 0.035,
            flare_scale: 0.02,
            color: [1.0, 1.0, 0.5],
            clear_color: [0.0, 1.0, 1.0, 0.0],
        }
    }
}

/// Output surface and background texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// Background texture, loaded once at startup.
    #[serde(default = "default_background")]
    pub background: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: default_background(),
        }
    }
}

impl FlareConfig {
    /// Ticks from the start of a cycle until the burst, ignoring float drift.
    pub fn rise_ticks(&self) -> u64 {
        (self.initial_speed / self.speed_decay).round() as u64
    }

    /// Ticks a burst lasts, ignoring float drift.
    pub fn flare_ticks(&self) -> u64 {
        (self.spread_threshold / self.spread_step).round() as u64
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.emitters == 0 {
            return Err(ConfigError::NoEmitters);
        }
        if self.flare_points == 0 {
            return Err(ConfigError::NoFlarePoints);
        }
        if self.initial_speed <= 0.0 {
            return Err(ConfigError::NonPositive("initial_speed"));
        }
        if self.speed_decay <= 0.0 {
            return Err(ConfigError::NonPositive("speed_decay"));
        }
        if self.spread_step <= 0.0 {
            return Err(ConfigError::NonPositive("spread_step"));
        }
        if self.spread_threshold <= 0.0 {
            return Err(ConfigError::NonPositive("spread_threshold"));
        }
        if self.seeds.slots == 0 {
            return Err(ConfigError::NoSeedSlots);
        }
        if self.view.width == 0 || self.view.height == 0 {
            return Err(ConfigError::InvalidViewport);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Emitter count must be non-zero")]
    NoEmitters,
    #[error("Flare point count must be non-zero")]
    NoFlarePoints,
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("Seed slot count must be non-zero")]
    NoSeedSlots,
    #[error("Viewport dimensions must be non-zero")]
    InvalidViewport,
}
