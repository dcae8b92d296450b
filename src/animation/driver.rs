//! Headless event loop for the firework animation.

use crate::buffer::{self, ColorImage};
use crate::compute::{Camera, Choreography, FlareState, Rasterizer, Scene, Texture, Transition};
use crate::schema::{ConfigError, FlareConfig};

use super::FrameRecorder;

/// Callbacks a windowing loop would register.
pub trait FrameCallbacks {
    /// Render the current state and return the finished frame.
    fn display(&mut self) -> &ColorImage;

    /// Viewport size changed.
    fn reshape(&mut self, width: u32, height: u32);

    /// Nothing else to do: advance one tick.
    fn idle(&mut self) -> Option<Transition>;
}

/// The firework animation: state, stepping rules and a renderer.
///
/// Usage:
/// ```ignore
/// let mut animation = FlareAnimation::new(FlareConfig::default())?;
/// animation.reshape(800, 600);
/// loop {
///     let frame = animation.display();
///     // present frame...
///     animation.idle();
/// }
/// ```
pub struct FlareAnimation {
    choreography: Choreography,
    state: FlareState,
    camera: Camera,
    rasterizer: Rasterizer,
    texture: Option<Texture>,
}

impl FlareAnimation {
    /// Validate the config, then load the background texture.
    ///
    /// A texture that fails to load is logged and the background is left at
    /// the clear color.
    pub fn new(config: FlareConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let texture = match Texture::load(&config.view.background) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("No background texture: {e}");
                None
            }
        };
        Ok(Self::build(config, texture))
    }

    pub fn with_texture(config: FlareConfig, texture: Option<Texture>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, texture))
    }

    fn build(config: FlareConfig, texture: Option<Texture>) -> Self {
        let (width, height) = (config.view.width, config.view.height);
        let mut choreography = Choreography::new(config);
        let state = choreography.initial_state();

        Self {
            choreography,
            state,
            camera: Camera::new(width, height),
            rasterizer: Rasterizer::new(width, height),
            texture,
        }
    }

    pub fn state(&self) -> &FlareState {
        &self.state
    }

    pub fn config(&self) -> &FlareConfig {
        self.choreography.config()
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

impl FrameCallbacks for FlareAnimation {
    fn display(&mut self) -> &ColorImage {
        let scene = Scene::build(&self.state, self.choreography.config());
        self.rasterizer
            .draw(&scene, &self.camera, self.texture.as_ref());
        self.rasterizer.frame()
    }

    fn reshape(&mut self, width: u32, height: u32) {
        log::debug!("Reshape to {}x{}", width, height);
        self.camera.reshape(width, height);
        self.rasterizer.resize(width, height);
    }

    fn idle(&mut self) -> Option<Transition> {
        self.choreography.step(&mut self.state)
    }
}

/// Summary of a headless run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub bursts: u64,
    pub resets: u64,
    pub frames: u64,
}

impl std::fmt::Display for LoopStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ticks, {} bursts, {} resets, {} frames written",
            self.ticks, self.bursts, self.resets, self.frames
        )
    }
}

/// Fixed-length stand-in for a window system's main loop.
///
/// Calls `reshape` once, then alternates `display` and `idle`. Frames are
/// only rendered on ticks the recorder keeps.
pub struct HeadlessLoop {
    width: u32,
    height: u32,
    ticks: u64,
}

impl HeadlessLoop {
    pub fn new(width: u32, height: u32, ticks: u64) -> Self {
        Self {
            width,
            height,
            ticks,
        }
    }

    pub fn run<A: FrameCallbacks>(
        &self,
        app: &mut A,
        recorder: &mut FrameRecorder,
    ) -> buffer::Result<LoopStats> {
        app.reshape(self.width, self.height);

        let mut stats = LoopStats::default();
        for _ in 0..self.ticks {
            if recorder.should_record() {
                recorder.write_frame(app.display())?;
                stats.frames += 1;
            }

            match app.idle() {
                Some(Transition::Burst) => stats.bursts += 1,
                Some(Transition::Reset) => stats.resets += 1,
                None => {}
            }
            stats.ticks += 1;
        }

        Ok(stats)
    }
}
