//! RGBA color buffer.

use std::ops::{Index, IndexMut};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use image::ExtendedColorType;
use rayon::prelude::*;

use super::GrayscaleImage;
use super::codec::{self, Result};

/// One 8-bit RGBA sample.
///
/// Laid out as four consecutive bytes so a pixel slice can be handed to the
/// codec without copying.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque black, the value of a fresh or cleared buffer.
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    /// Returned for reads outside the buffer.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque gray with all three color channels set to `lum`.
    #[inline]
    pub const fn gray(lum: u8) -> Self {
        Self::rgb(lum, lum, lum)
    }

    /// Quantize a color with channels in 0.0-1.0.
    pub fn from_unit(c: [f32; 4]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(c[0]), q(c[1]), q(c[2]), q(c[3]))
    }

    /// Luminance: 0.299 R + 0.587 G + 0.114 B, truncated.
    ///
    /// Computed in integer arithmetic so that white maps to exactly 255.
    #[inline]
    pub fn luminance(self) -> u8 {
        let weighted = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        (weighted / 1000) as u8
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<u8> for Rgba {
    fn from(lum: u8) -> Self {
        Self::gray(lum)
    }
}

/// Row-major RGBA pixel buffer.
///
/// Row 0 is the first row stored in an image file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorImage {
    width: usize,
    height: usize,
    data: Vec<Rgba>,
}

impl ColorImage {
    /// Create an opaque black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgba::BLACK)
    }

    /// Create a buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        Self {
            width,
            height,
            data: vec![color; width * height],
        }
    }

    /// Wrap existing pixels. Returns `None` if the length does not match.
    pub fn from_pixels(width: usize, height: usize, data: Vec<Rgba>) -> Option<Self> {
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
    pub fn pixels(&self) -> &[Rgba] {
        &self.data
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    /// Raw RGBA bytes, four per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Check if (x, y) lies inside the buffer.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Checked read. Coordinates outside the buffer yield [`Rgba::TRANSPARENT`].
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Rgba {
        if self.contains(x, y) {
            self.data[x as usize + y as usize * self.width]
        } else {
            Rgba::TRANSPARENT
        }
    }

    /// Reset every pixel to opaque black.
    pub fn clear(&mut self) {
        self.fill(Rgba::BLACK);
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba) {
        self.data.fill(color);
    }

    /// Load an image file, normalising it to 8-bit RGBA.
    ///
    /// Palette images are expanded, gray is broadcast to RGB, 16-bit samples
    /// are reduced to 8 bits and a missing alpha channel is filled with 255.
    /// On error the buffer is left unchanged.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let rgba = codec::report(codec::decode(path.as_ref()))?.into_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);

        self.data = bytemuck::cast_slice(rgba.as_raw()).to_vec();
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Save as an 8-bit RGBA PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        codec::report(codec::encode_png(
            path.as_ref(),
            self.as_bytes(),
            self.width,
            self.height,
            ExtendedColorType::Rgba8,
        ))
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        x + y * self.width
    }
}

impl Index<(usize, usize)> for ColorImage {
    type Output = Rgba;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Rgba {
        &self.data[self.offset(x, y)]
    }
}

impl IndexMut<(usize, usize)> for ColorImage {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Rgba {
        let offset = self.offset(x, y);
        &mut self.data[offset]
    }
}

impl From<&GrayscaleImage> for ColorImage {
    /// Broadcast each sample into R, G and B with full opacity.
    fn from(gray: &GrayscaleImage) -> Self {
        let data = gray.pixels().par_iter().map(|&v| Rgba::gray(v)).collect();
        Self {
            width: gray.width(),
            height: gray.height(),
            data,
        }
    }
}
