//! Firework choreography.
//!
//! A cycle has two phases. While `Rising`, every emitter is one point that
//! climbs with a slowly decaying speed. When the speed reaches zero the
//! emitters burst: each becomes `flare_points` points arranged radially at a
//! spread radius that grows every tick. Once the radius passes the threshold,
//! the cycle restarts from the ground with freshly placed emitters.

use rand::prelude::*;

use crate::schema::{FlareConfig, SeedConfig};

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// One point per emitter, moving up.
    #[default]
    Rising,
    /// Radial burst around each emitter.
    Flared,
}

/// Phase change reported by [`Choreography::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Rising -> Flared`: speed dropped to zero or below.
    Burst,
    /// `Flared -> Rising`: spread radius passed the threshold.
    Reset,
}

/// Animation state container.
///
/// All emitters share the vertical position and spread radius; the only
/// per-emitter value is its horizontal seed.
#[derive(Debug, Clone, PartialEq)]
pub struct FlareState {
    pub phase: Phase,
    /// Current vertical speed (world units per tick).
    pub speed: f32,
    /// Shared vertical position.
    pub y: f32,
    /// Shared spread radius.
    pub radius: f32,
    /// Horizontal position of each emitter.
    pub emitters: Vec<f32>,
    /// Ticks since start.
    pub tick: u64,
    /// Completed cycles.
    pub cycle: u64,
}

impl FlareState {
    #[inline]
    pub fn is_flared(&self) -> bool {
        self.phase == Phase::Flared
    }

    /// Center of every emitter at the given depth.
    pub fn emitter_origins(&self, depth: f32) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.emitters.iter().map(move |&x| [x, self.y, depth])
    }
}

/// Random number generator for emitter placement.
pub struct SeedRng {
    rng: StdRng,
}

impl SeedRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_config(config: &SeedConfig) -> Self {
        config.rng_seed.map_or_else(Self::random, Self::new)
    }

    /// Draw one horizontal position: `k / slots * span` with `k` in `[0, slots)`.
    pub fn draw(&mut self, config: &SeedConfig) -> f32 {
        let k = self.rng.gen_range(0..config.slots);
        k as f32 / config.slots as f32 * config.span
    }

    /// Redraw every emitter, then pin emitter 0 to the anchor if one is set.
    pub fn place(&mut self, config: &SeedConfig, emitters: &mut [f32]) {
        for x in emitters.iter_mut() {
            *x = self.draw(config);
        }
        if let (Some(anchor), Some(first)) = (config.anchor, emitters.first_mut()) {
            *first = anchor;
        }
    }
}

/// Drives a [`FlareState`] through the rise/burst/reset cycle.
pub struct Choreography {
    config: FlareConfig,
    rng: SeedRng,
}

impl Choreography {
    pub fn new(config: FlareConfig) -> Self {
        let rng = SeedRng::from_config(&config.seeds);
        Self { config, rng }
    }

    pub fn config(&self) -> &FlareConfig {
        &self.config
    }

    /// Fresh state at the start of a rising phase.
    pub fn initial_state(&mut self) -> FlareState {
        let mut emitters = vec![0.0; self.config.emitters];
        self.rng.place(&self.config.seeds, &mut emitters);

        FlareState {
            phase: Phase::Rising,
            speed: self.config.initial_speed,
            y: 0.0,
            radius: 0.0,
            emitters,
            tick: 0,
            cycle: 0,
        }
    }

    /// Advance one tick.
    ///
    /// Position, speed and radius move in every phase; the phase checks run
    /// after the increments.
    pub fn step(&mut self, state: &mut FlareState) -> Option<Transition> {
        let config = &self.config;

        state.y += state.speed;
        state.speed -= config.speed_decay;
        state.radius += config.spread_step;
        state.tick += 1;

        match state.phase {
            Phase::Rising if state.speed <= 0.0 => {
                state.phase = Phase::Flared;
                state.radius = 0.0;

                log::debug!(
                    "Cycle {} burst at tick {} (y = {:.4})",
                    state.cycle,
                    state.tick,
                    state.y
                );
                Some(Transition::Burst)
            }
            Phase::Flared if state.radius > config.spread_threshold => {
                state.phase = Phase::Rising;
                state.speed = config.initial_speed;
                state.y = 0.0;
                self.rng.place(&config.seeds, &mut state.emitters);
                state.cycle += 1;

                log::debug!(
                    "Cycle {} reset at tick {}, emitters at {:?}",
                    state.cycle,
                    state.tick,
                    state.emitters
                );
                Some(Transition::Reset)
            }
            _ => None,
        }
    }

    /// Run multiple steps, returning how many phase changes happened.
    pub fn run(&mut self, state: &mut FlareState, ticks: u64) -> usize {
        (0..ticks).filter(|_| self.step(state).is_some()).count()
    }
}
