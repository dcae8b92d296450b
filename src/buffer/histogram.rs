//! Value-frequency histograms rendered as bar charts.
//!
//! Every column of the canvas is one sample value. Its bar is filled upward
//! from the last row with height `min(canvas_height, floor(count * scale))`.

use std::path::Path;

use super::codec::Result;
use super::{ColorImage, GrayscaleImage};

/// Number of distinct 8-bit sample values.
pub const BINS: usize = 256;

/// Height of a rendered histogram canvas.
pub const HISTOGRAM_HEIGHT: usize = 512;

/// Scale applied to counts when none is given.
pub const DEFAULT_SCALE: f32 = 0.05;

/// Bar height for `count` at `scale`, capped at `max`.
///
/// Negative or NaN products give an empty bar.
#[inline]
pub fn bar_height(count: u32, scale: f32, max: usize) -> usize {
    ((count as f32 * scale) as usize).min(max)
}

/// Counts of each gray level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayHistogram {
    counts: [u32; BINS],
}

impl GrayHistogram {
    pub fn tabulate(image: &GrayscaleImage) -> Self {
        let mut counts = [0u32; BINS];
        for &v in image.pixels() {
            counts[v as usize] += 1;
        }
        Self { counts }
    }

    #[inline]
    pub fn counts(&self) -> &[u32; BINS] {
        &self.counts
    }

    /// Render onto a 256 x 512 canvas: white bars on black.
    pub fn render(&self, scale: f32) -> GrayscaleImage {
        let mut canvas = GrayscaleImage::new(BINS, HISTOGRAM_HEIGHT);
        for (x, &count) in self.counts.iter().enumerate() {
            for y in 0..bar_height(count, scale, HISTOGRAM_HEIGHT) {
                canvas[(x, HISTOGRAM_HEIGHT - 1 - y)] = 255;
            }
        }
        canvas
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, scale: f32) -> Result<()> {
        self.render(scale).save(path)
    }
}

/// Counts of each red, green and blue level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistogram {
    counts: [[u32; BINS]; 3],
}

impl ColorHistogram {
    pub fn tabulate(image: &ColorImage) -> Self {
        let mut counts = [[0u32; BINS]; 3];
        for p in image.pixels() {
            counts[0][p.r as usize] += 1;
            counts[1][p.g as usize] += 1;
            counts[2][p.b as usize] += 1;
        }
        Self { counts }
    }

    pub fn red(&self) -> &[u32; BINS] {
        &self.counts[0]
    }

    pub fn green(&self) -> &[u32; BINS] {
        &self.counts[1]
    }

    pub fn blue(&self) -> &[u32; BINS] {
        &self.counts[2]
    }

    /// Render onto a 768 x 512 canvas: red, green and blue bars side by side.
    ///
    /// Only the bar's own channel is raised, so the background stays opaque
    /// black.
    pub fn render(&self, scale: f32) -> ColorImage {
        let mut canvas = ColorImage::new(3 * BINS, HISTOGRAM_HEIGHT);
        for (channel, counts) in self.counts.iter().enumerate() {
            for (value, &count) in counts.iter().enumerate() {
                let x = channel * BINS + value;
                for y in 0..bar_height(count, scale, HISTOGRAM_HEIGHT) {
                    let pixel = &mut canvas[(x, HISTOGRAM_HEIGHT - 1 - y)];
                    match channel {
                        0 => pixel.r = 255,
                        1 => pixel.g = 255,
                        _ => pixel.b = 255,
                    }
                }
            }
        }
        canvas
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, scale: f32) -> Result<()> {
        self.render(scale).save(path)
    }
}

impl GrayscaleImage {
    /// Tabulate, render and save this buffer's histogram.
    pub fn save_histogram<P: AsRef<Path>>(&self, path: P, scale: f32) -> Result<()> {
        GrayHistogram::tabulate(self).save(path, scale)
    }
}

impl ColorImage {
    /// Tabulate, render and save this buffer's per-channel histogram.
    pub fn save_histogram<P: AsRef<Path>>(&self, path: P, scale: f32) -> Result<()> {
        ColorHistogram::tabulate(self).save(path, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;
    use tempfile::tempdir;

    /// Column heights of a rendered canvas, measured from the last row.
    fn column_heights(canvas: &ColorImage, lit: impl Fn(Rgba) -> bool) -> Vec<usize> {
        (0..canvas.width())
            .map(|x| {
                (0..canvas.height())
                    .rev()
                    .take_while(|&y| lit(canvas[(x, y)]))
                    .count()
            })
            .collect()
    }

    #[test]
    fn test_bar_height_clamps() {
        assert_eq!(bar_height(20000, 0.05, 512), 512);
        assert_eq!(bar_height(100, 0.05, 512), 5);
        assert_eq!(bar_height(39, 0.05, 512), 1);
        assert_eq!(bar_height(19, 0.05, 512), 0);
        assert_eq!(bar_height(0, 0.05, 512), 0);
        assert_eq!(bar_height(10, -1.0, 512), 0);
        assert_eq!(bar_height(10, f32::NAN, 512), 0);
    }

    #[test]
    fn test_gray_tabulate() {
        let image = GrayscaleImage::from_pixels(4, 2, vec![0, 0, 7, 255, 7, 7, 0, 1]).unwrap();
        let hist = GrayHistogram::tabulate(&image);

        assert_eq!(hist.counts()[0], 3);
        assert_eq!(hist.counts()[1], 1);
        assert_eq!(hist.counts()[7], 3);
        assert_eq!(hist.counts()[255], 1);
        assert_eq!(hist.counts().iter().sum::<u32>(), 8);
    }

    #[test]
    fn test_gray_render_bottom_anchored() {
        // 200 zeros and 40 whites at scale 0.1 -> bars of 20 and 4.
        let mut data = vec![0u8; 200];
        data.extend(std::iter::repeat_n(255u8, 40));
        let image = GrayscaleImage::from_pixels(240, 1, data).unwrap();

        let canvas = GrayHistogram::tabulate(&image).render(0.1);
        assert_eq!(canvas.width(), 256);
        assert_eq!(canvas.height(), 512);

        let height = |x: usize| {
            (0..512)
                .rev()
                .take_while(|&y| canvas[(x, y)] == 255)
                .count()
        };
        assert_eq!(height(0), 20);
        assert_eq!(height(255), 4);
        assert_eq!(height(128), 0);
        assert_eq!(canvas[(0, 511 - 20)], 0);
        assert_eq!(canvas.pixels().iter().filter(|&&v| v == 255).count(), 24);
    }

    #[test]
    fn test_gray_render_clamps_to_canvas() {
        let image = GrayscaleImage::new(200, 100);
        let canvas = GrayHistogram::tabulate(&image).render(DEFAULT_SCALE);

        // 20000 samples at 0.05 would be 1000 rows.
        assert!((0..512).all(|y| canvas[(0, y)] == 255));
        assert!((0..512).all(|y| canvas[(1, y)] == 0));
    }

    #[test]
    fn test_color_render_channels() {
        let mut image = ColorImage::new(10, 10);
        image.fill(Rgba::rgb(3, 100, 250));

        let hist = ColorHistogram::tabulate(&image);
        assert_eq!(hist.red()[3], 100);
        assert_eq!(hist.green()[100], 100);
        assert_eq!(hist.blue()[250], 100);

        let canvas = hist.render(1.0);
        assert_eq!(canvas.width(), 768);
        assert_eq!(canvas.height(), 512);

        let heights = column_heights(&canvas, |p| p != Rgba::BLACK);
        assert_eq!(heights[3], 100);
        assert_eq!(heights[256 + 100], 100);
        assert_eq!(heights[512 + 250], 100);
        assert_eq!(heights.iter().filter(|&&h| h > 0).count(), 3);

        assert_eq!(canvas[(3, 511)], Rgba::rgb(255, 0, 0));
        assert_eq!(canvas[(356, 511)], Rgba::rgb(0, 255, 0));
        assert_eq!(canvas[(762, 511)], Rgba::rgb(0, 0, 255));
        assert_eq!(canvas[(3, 511 - 100)], Rgba::BLACK);
    }

    #[test]
    fn test_save_histograms() {
        let dir = tempdir().unwrap();
        let gray_path = dir.path().join("gray_hist.png");
        let color_path = dir.path().join("color_hist.png");

        let color = ColorImage::filled(16, 16, Rgba::rgb(10, 20, 30));
        color.save_histogram(&color_path, DEFAULT_SCALE).unwrap();
        GrayscaleImage::from(&color)
            .save_histogram(&gray_path, DEFAULT_SCALE)
            .unwrap();

        let color_hist = ColorImage::open(&color_path).unwrap();
        assert_eq!((color_hist.width(), color_hist.height()), (768, 512));
        // 256 samples at 0.05 -> 12 rows.
        assert_eq!(column_heights(&color_hist, |p| p.r == 255)[10], 12);

        let gray_hist = GrayscaleImage::open(&gray_path).unwrap();
        assert_eq!((gray_hist.width(), gray_hist.height()), (256, 512));
    }
}
