//! CPU rasterizer for the scene's draw calls.
//!
//! Stands in for the fixed-function renderer: an orthographic camera, a
//! depth buffer with a less-than test, bilinear texture sampling with repeat
//! wrap, and flat-shaded triangles.

use std::path::Path;

use nalgebra::{Matrix4, Orthographic3, Point3, Vector3};

use super::{DrawCall, Scene};
use crate::buffer::{self, ColorImage, Rgba};

/// Orthographic volume in eye space: left, right, bottom, top, near, far.
const ORTHO: [f32; 6] = [-5.0, 0.0, 0.0, 5.0, 0.0, 1000.0];

/// Octahedron vertices: +x, -x, +y, -y, +z, -z.
const OCTAHEDRON: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

/// Fixed camera plus the current viewport.
#[derive(Debug, Clone)]
pub struct Camera {
    view_projection: Matrix4<f32>,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        // Eye at the origin looking along +z, so world x runs right to left.
        let view = Matrix4::look_at_rh(
            &Point3::origin(),
            &Point3::new(0.0, 0.0, 100.0),
            &Vector3::y(),
        );
        let [left, right, bottom, top, near, far] = ORTHO;
        let projection = Orthographic3::new(left, right, bottom, top, near, far);

        Self {
            view_projection: projection.as_matrix() * view,
            width,
            height,
        }
    }

    /// Change the viewport. The projection is fixed.
    pub fn reshape(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Map a world point to (pixel x, pixel y, NDC depth).
    ///
    /// Pixel y grows downward so row 0 is the top of the frame.
    pub fn project(&self, world: &Point3<f32>) -> Point3<f32> {
        let ndc = self.view_projection.transform_point(world);
        Point3::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
            ndc.z,
        )
    }
}

/// Background texture.
#[derive(Debug, Clone)]
pub struct Texture {
    image: ColorImage,
}

impl Texture {
    pub fn new(image: ColorImage) -> Self {
        Self { image }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> buffer::Result<Self> {
        ColorImage::open(path).map(Self::new)
    }

    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    /// Bilinear sample with repeat wrap.
    ///
    /// `v = 0` is the last row of the image (its visual bottom).
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 {
            return Rgba::TRANSPARENT;
        }

        let s = u * w as f32 - 0.5;
        let t = v * h as f32 - 0.5;
        let (fs, ft) = (s - s.floor(), t - t.floor());

        let wrap = |i: f32, n: usize| (i as i64).rem_euclid(n as i64) as usize;
        let (x0, x1) = (wrap(s.floor(), w), wrap(s.floor() + 1.0, w));
        let (r0, r1) = (wrap(t.floor(), h), wrap(t.floor() + 1.0, h));
        let (y0, y1) = (h - 1 - r0, h - 1 - r1);

        let texel = |x: usize, y: usize| {
            let p = self.image[(x, y)];
            [p.r as f32, p.g as f32, p.b as f32, p.a as f32]
        };
        let (a, b, c, d) = (texel(x0, y0), texel(x1, y0), texel(x0, y1), texel(x1, y1));

        let mut out = [0u8; 4];
        for (i, o) in out.iter_mut().enumerate() {
            let bottom = a[i] + (b[i] - a[i]) * fs;
            let top = c[i] + (d[i] - c[i]) * fs;
            *o = (bottom + (top - bottom) * ft).round().clamp(0.0, 255.0) as u8;
        }
        Rgba::new(out[0], out[1], out[2], out[3])
    }
}

/// Projected vertex with texture coordinates.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    pos: Point3<f32>,
    uv: [f32; 2],
}

/// Framebuffer plus depth buffer.
pub struct Rasterizer {
    frame: ColorImage,
    depth: Vec<f32>,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self {
            frame: ColorImage::new(w, h),
            depth: vec![1.0; w * h],
        }
    }

    /// Reallocate buffers for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (self.frame.width(), self.frame.height()) != (width as usize, height as usize) {
            *self = Self::new(width, height);
        }
    }

    #[inline]
    pub fn frame(&self) -> &ColorImage {
        &self.frame
    }

    /// Clear color and depth.
    pub fn clear(&mut self, color: Rgba) {
        self.frame.fill(color);
        self.depth.fill(1.0);
    }

    /// Clear, then draw every call in order.
    ///
    /// Textured quads are skipped when no texture is bound.
    pub fn draw(&mut self, scene: &Scene, camera: &Camera, texture: Option<&Texture>) {
        self.resize(camera.width, camera.height);
        self.clear(scene.clear_color);

        for call in &scene.calls {
            match call {
                DrawCall::TexturedQuad { corners, uvs } => {
                    let Some(texture) = texture else { continue };
                    let v: [ScreenVertex; 4] = std::array::from_fn(|i| ScreenVertex {
                        pos: camera.project(&corners[i]),
                        uv: uvs[i],
                    });
                    let shade = |uv: [f32; 2]| texture.sample(uv[0], uv[1]);
                    self.fill_triangle([v[0], v[1], v[2]], &shade);
                    self.fill_triangle([v[0], v[2], v[3]], &shade);
                }
                DrawCall::SolidOctahedron { model, color } => {
                    let v: [ScreenVertex; 6] = std::array::from_fn(|i| {
                        let [x, y, z] = OCTAHEDRON[i];
                        ScreenVertex {
                            pos: camera.project(&model.transform_point(&Point3::new(x, y, z))),
                            uv: [0.0, 0.0],
                        }
                    });
                    let shade = |_: [f32; 2]| *color;
                    for xi in [0, 1] {
                        for yi in [2, 3] {
                            for zi in [4, 5] {
                                self.fill_triangle([v[xi], v[yi], v[zi]], &shade);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Scan-convert one triangle, sampling at pixel centers.
    fn fill_triangle(&mut self, v: [ScreenVertex; 3], shade: &impl Fn([f32; 2]) -> Rgba) {
        let [a, b, c] = v.map(|v| v.pos);
        let area = edge(&a, &b, &c);
        if area.abs() < f32::EPSILON {
            return;
        }

        let (w, h) = (self.frame.width(), self.frame.height());
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as usize;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as usize).min(w);
        let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as usize).min(h);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let p = Point3::new(px as f32 + 0.5, py as f32 + 0.5, 0.0);
                let w0 = edge(&b, &c, &p) / area;
                let w1 = edge(&c, &a, &p) / area;
                let w2 = edge(&a, &b, &p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = w0 * a.z + w1 * b.z + w2 * c.z;
                let i = py * w + px;
                if !(-1.0..=1.0).contains(&z) || z >= self.depth[i] {
                    continue;
                }

                let uv = [
                    w0 * v[0].uv[0] + w1 * v[1].uv[0] + w2 * v[2].uv[0],
                    w0 * v[0].uv[1] + w1 * v[1].uv[1] + w2 * v[2].uv[1],
                ];
                self.depth[i] = z;
                self.frame[(px, py)] = shade(uv);
            }
        }
    }
}

/// Twice the signed area of (a, b, p) in screen space.
#[inline]
fn edge(a: &Point3<f32>, b: &Point3<f32>, p: &Point3<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Choreography, FlareState};
    use crate::schema::FlareConfig;

    fn setup(width: u32, height: u32) -> (Choreography, FlareState) {
        let mut config = FlareConfig::default();
        config.seeds.rng_seed = Some(5);
        config.view.width = width;
        config.view.height = height;
        let mut choreography = Choreography::new(config);
        let state = choreography.initial_state();
        (choreography, state)
    }

    #[test]
    fn test_projection_mirrors_x() {
        let camera = Camera::new(100, 100);

        let center = camera.project(&Point3::new(2.5, 2.5, 5.0));
        assert!((center.x - 50.0).abs() < 1e-3);
        assert!((center.y - 50.0).abs() < 1e-3);

        // World x = 0 lands on the right edge, y = 0 on the bottom.
        let corner = camera.project(&Point3::new(0.0, 0.0, 10.0));
        assert!((corner.x - 100.0).abs() < 1e-3);
        assert!((corner.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_fireworks_in_front_of_background() {
        let camera = Camera::new(10, 10);
        let near = camera.project(&Point3::new(1.0, 1.0, 5.0));
        let far = camera.project(&Point3::new(1.0, 1.0, 10.0));
        assert!(near.z < far.z);
        assert!(near.z > -1.0 && far.z < 1.0);
    }

    #[test]
    fn test_texture_sample() {
        // Top row red, bottom row blue.
        let mut image = ColorImage::new(1, 2);
        image[(0, 0)] = Rgba::rgb(255, 0, 0);
        image[(0, 1)] = Rgba::rgb(0, 0, 255);
        let texture = Texture::new(image);

        assert_eq!(texture.sample(0.5, 0.25), Rgba::rgb(0, 0, 255));
        assert_eq!(texture.sample(0.5, 0.75), Rgba::rgb(255, 0, 0));
        assert_eq!(texture.sample(0.5, 0.5), Rgba::rgb(128, 0, 128));
        // Repeat wrap.
        assert_eq!(texture.sample(3.5, 1.25), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn test_empty_texture_is_transparent() {
        let texture = Texture::new(ColorImage::default());
        assert_eq!(texture.sample(0.5, 0.5), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_clear_without_texture() {
        let (choreography, state) = setup(32, 24);
        let config = choreography.config();
        let camera = Camera::new(32, 24);

        let mut scene = Scene::build(&state, config);
        scene.calls.truncate(1);

        let mut rasterizer = Rasterizer::new(32, 24);
        rasterizer.draw(&scene, &camera, None);
        assert!(
            rasterizer
                .frame()
                .pixels()
                .iter()
                .all(|&p| p == Rgba::new(0, 255, 255, 0))
        );
    }

    #[test]
    fn test_background_fills_viewport() {
        let (choreography, state) = setup(40, 30);
        let camera = Camera::new(40, 30);
        let mut scene = Scene::build(&state, choreography.config());
        scene.calls.truncate(1);

        let texture = Texture::new(ColorImage::filled(4, 4, Rgba::rgb(10, 20, 30)));
        let mut rasterizer = Rasterizer::new(40, 30);
        rasterizer.draw(&scene, &camera, Some(&texture));

        assert!(
            rasterizer
                .frame()
                .pixels()
                .iter()
                .all(|&p| p == Rgba::rgb(10, 20, 30))
        );
    }

    #[test]
    fn test_firework_drawn_over_background() {
        let (mut choreography, mut state) = setup(200, 200);
        choreography.run(&mut state, 500);

        let camera = Camera::new(200, 200);
        let scene = Scene::build(&state, choreography.config());
        let texture = Texture::new(ColorImage::filled(2, 2, Rgba::rgb(0, 0, 0)));

        let mut rasterizer = Rasterizer::new(200, 200);
        rasterizer.draw(&scene, &camera, Some(&texture));

        let firework = Rgba::rgb(255, 255, 128);
        let lit = rasterizer
            .frame()
            .pixels()
            .iter()
            .filter(|&&p| p == firework)
            .count();
        assert!(lit > 0);

        // The anchored emitter sits at x = 2.5, i.e. the horizontal center.
        let center = camera.project(&Point3::new(2.5, state.y, 5.0));
        let (px, py) = (center.x as usize, center.y as usize);
        assert_eq!(rasterizer.frame()[(px, py)], firework);
    }

    #[test]
    fn test_resize_on_reshape() {
        let mut camera = Camera::new(8, 8);
        camera.reshape(16, 4);
        assert_eq!(camera.viewport(), (16, 4));

        let (choreography, state) = setup(8, 8);
        let scene = Scene::build(&state, choreography.config());

        let mut rasterizer = Rasterizer::new(8, 8);
        rasterizer.draw(&scene, &camera, None);
        assert_eq!(rasterizer.frame().width(), 16);
        assert_eq!(rasterizer.frame().height(), 4);
    }
}
