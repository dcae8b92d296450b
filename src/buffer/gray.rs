//! Single-channel grayscale buffer.

use std::ops::{Index, IndexMut};
use std::path::Path;

use image::ExtendedColorType;
use rayon::prelude::*;

use super::ColorImage;
use super::codec::{self, Result};

/// Row-major 8-bit grayscale buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrayscaleImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayscaleImage {
    /// Create a black (all zero) buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wrap existing samples. Returns `None` if the length does not match.
    pub fn from_pixels(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Decode a file into a new buffer.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut image = Self::default();
        image.load(path)?;
        Ok(image)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Checked read. Coordinates outside the buffer yield 0.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if self.contains(x, y) {
            self.data[x as usize + y as usize * self.width]
        } else {
            0
        }
    }

    /// Reset every sample to 0.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Load an image file, normalising it to 8-bit gray.
    ///
    /// Color sources are converted to luma by the codec and alpha is dropped.
    /// On error the buffer is left unchanged.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let luma = codec::report(codec::decode(path.as_ref()))?.into_luma8();

        self.width = luma.width() as usize;
        self.height = luma.height() as usize;
        self.data = luma.into_raw();
        Ok(())
    }

    /// Save as an 8-bit gray PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        codec::report(codec::encode_png(
            path.as_ref(),
            &self.data,
            self.width,
            self.height,
            ExtendedColorType::L8,
        ))
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        x + y * self.width
    }
}

impl Index<(usize, usize)> for GrayscaleImage {
    type Output = u8;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &u8 {
        &self.data[self.offset(x, y)]
    }
}

impl IndexMut<(usize, usize)> for GrayscaleImage {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut u8 {
        let offset = self.offset(x, y);
        &mut self.data[offset]
    }
}

impl From<&ColorImage> for GrayscaleImage {
    /// Per-pixel luminance, alpha ignored.
    fn from(color: &ColorImage) -> Self {
        let data = color.pixels().par_iter().map(|p| p.luminance()).collect();
        Self {
            width: color.width(),
            height: color.height(),
            data,
        }
    }
}
