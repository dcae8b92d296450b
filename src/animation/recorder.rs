//! Frame recorder for capturing rendered frames as a PNG sequence.

use std::path::{Path, PathBuf};

use crate::buffer::{BufferError, ColorImage, Result};

/// Configuration for frame recording.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Record every Nth tick (1 = every tick).
    pub frame_skip: u32,
    /// Maximum frames to record (0 = unlimited).
    pub max_frames: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            max_frames: 0,
        }
    }
}

/// Writes frames into a directory as `frame_000000.png`, `frame_000001.png`, ...
///
/// Usage:
/// ```ignore
/// let mut recorder = FrameRecorder::new("frames", Default::default())?;
/// for _ in 0..1000 {
///     recorder.record_frame(animation.display())?;
///     animation.idle();
/// }
/// println!("{}", recorder.finalize());
/// ```
pub struct FrameRecorder {
    dir: PathBuf,
    config: RecorderConfig,
    frames_written: u64,
    bytes_written: u64,
    step_counter: u32,
}

impl FrameRecorder {
    /// Create the output directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P, config: RecorderConfig) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| BufferError::Create {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            config,
            frames_written: 0,
            bytes_written: 0,
            step_counter: 0,
        })
    }

    /// Advance the tick counter and report whether this tick's frame is kept.
    ///
    /// Lets a caller skip rendering entirely on ticks that are not recorded.
    pub fn should_record(&mut self) -> bool {
        self.step_counter += 1;

        if self.step_counter < self.config.frame_skip {
            return false;
        }
        self.step_counter = 0;

        !(self.config.max_frames > 0 && self.frames_written >= self.config.max_frames)
    }

    /// Write `frame` as the next file in the sequence, unconditionally.
    pub fn write_frame(&mut self, frame: &ColorImage) -> Result<()> {
        let path = self.frame_path(self.frames_written);
        frame.save(&path)?;

        if let Ok(meta) = std::fs::metadata(&path) {
            self.bytes_written += meta.len();
        }
        self.frames_written += 1;
        log::debug!("Wrote {}", path.display());

        Ok(())
    }

    /// Record a frame, subject to the skip and limit settings.
    ///
    /// Returns true if the frame was actually written.
    pub fn record_frame(&mut self, frame: &ColorImage) -> Result<bool> {
        if !self.should_record() {
            return Ok(false);
        }
        self.write_frame(frame)?;
        Ok(true)
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", index))
    }

    /// Get number of frames recorded so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn finalize(self) -> RecordingStats {
        let stats = RecordingStats {
            frame_count: self.frames_written,
            total_bytes: self.bytes_written,
            average_frame_size: if self.frames_written > 0 {
                self.bytes_written / self.frames_written
            } else {
                0
            },
            dir: self.dir,
        };
        log::info!("Recording finished: {}", stats);
        stats
    }
}

/// Statistics from a recording session.
#[derive(Debug, Clone)]
pub struct RecordingStats {
    pub frame_count: u64,
    pub total_bytes: u64,
    pub average_frame_size: u64,
    pub dir: PathBuf,
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames in {}, {} bytes total, {} bytes/frame avg",
            self.frame_count,
            self.dir.display(),
            self.total_bytes,
            self.average_frame_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;
    use tempfile::tempdir;

    fn frame() -> ColorImage {
        ColorImage::filled(4, 3, Rgba::rgb(10, 20, 30))
    }

    #[test]
    fn test_recorder_basic() {
        let dir = tempdir().unwrap();
        let mut recorder = FrameRecorder::new(dir.path(), RecorderConfig::default()).unwrap();

        for _ in 0..3 {
            assert!(recorder.record_frame(&frame()).unwrap());
        }

        let stats = recorder.finalize();
        assert_eq!(stats.frame_count, 3);
        assert!(stats.total_bytes > 0);

        for i in 0..3 {
            let path = dir.path().join(format!("frame_{:06}.png", i));
            let loaded = ColorImage::open(&path).unwrap();
            assert_eq!(loaded.pixels(), frame().pixels());
        }
        assert!(!dir.path().join("frame_000003.png").exists());
    }

    #[test]
    fn test_recorder_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let mut recorder = FrameRecorder::new(&nested, RecorderConfig::default()).unwrap();
        recorder.record_frame(&frame()).unwrap();
        assert!(nested.join("frame_000000.png").exists());
    }

    #[test]
    fn test_recorder_frame_skip() {
        let dir = tempdir().unwrap();
        let config = RecorderConfig {
            frame_skip: 5,
            ..Default::default()
        };
        let mut recorder = FrameRecorder::new(dir.path(), config).unwrap();

        // Steps 5, 10, 15, 20
        let kept: Vec<usize> = (1..=20)
            .filter(|_| recorder.record_frame(&frame()).unwrap())
            .collect();
        assert_eq!(kept, vec![5, 10, 15, 20]);
        assert_eq!(recorder.finalize().frame_count, 4);
    }

    #[test]
    fn test_recorder_max_frames() {
        let dir = tempdir().unwrap();
        let config = RecorderConfig {
            max_frames: 5,
            ..Default::default()
        };
        let mut recorder = FrameRecorder::new(dir.path(), config).unwrap();

        for _ in 0..100 {
            recorder.record_frame(&frame()).unwrap();
        }

        assert_eq!(recorder.frames_written(), 5);
        assert!(!dir.path().join("frame_000005.png").exists());
    }

    #[test]
    fn test_recorder_zero_skip_records_every_tick() {
        let dir = tempdir().unwrap();
        let config = RecorderConfig {
            frame_skip: 0,
            max_frames: 0,
        };
        let mut recorder = FrameRecorder::new(dir.path(), config).unwrap();

        assert!(recorder.should_record());
        assert!(recorder.should_record());
    }

    #[test]
    fn test_recorder_config_from_json() {
        let config: RecorderConfig = serde_json::from_str(r#"{"frame_skip": 10}"#).unwrap();
        assert_eq!(config.frame_skip, 10);
        assert_eq!(config.max_frames, 0);
    }
}
