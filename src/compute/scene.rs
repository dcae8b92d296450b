//! Draw-call stream for one animation frame.
//!
//! Mirrors a fixed-function pipeline: a model-matrix stack with push/pop
//! scoping, and two primitive kinds (a textured quad and a solid octahedron).

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use super::FlareState;
use crate::buffer::Rgba;
use crate::schema::FlareConfig;

/// Model-matrix stack.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    current: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            current: Matrix4::identity(),
            saved: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> &Matrix4<f32> {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the last pushed matrix. Returns false on underflow, leaving the
    /// current matrix unchanged.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(m) => {
                self.current = m;
                true
            }
            None => false,
        }
    }

    /// Run `f` between a push and its matching pop.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let result = f(self);
        self.pop();
        result
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.current *= Matrix4::new_translation(&Vector3::new(x, y, z));
    }

    /// Rotate about the z axis by `degrees`, counter-clockwise.
    pub fn rotate_z(&mut self, degrees: f32) {
        self.current *=
            Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.to_radians()).to_homogeneous();
    }

    pub fn scale(&mut self, s: f32) {
        self.current *= Matrix4::new_scaling(s);
    }
}

/// One primitive with its transform resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// Quad with per-corner texture coordinates, drawn with the texture
    /// replacing the fragment color.
    TexturedQuad {
        corners: [Point3<f32>; 4],
        uvs: [[f32; 2]; 4],
    },
    /// Unit octahedron (vertices at +-1 on each axis) under `model`.
    SolidOctahedron { model: Matrix4<f32>, color: Rgba },
}

impl DrawCall {
    /// World position of the primitive's local origin.
    pub fn origin(&self) -> Point3<f32> {
        match self {
            DrawCall::TexturedQuad { corners, .. } => {
                Point3::from((corners[0].coords + corners[2].coords) * 0.5)
            }
            DrawCall::SolidOctahedron { model, .. } => model.transform_point(&Point3::origin()),
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct Scene {
    pub clear_color: Rgba,
    pub calls: Vec<DrawCall>,
}

impl Scene {
    /// Background quad, then the emitters in their current phase.
    pub fn build(state: &FlareState, config: &FlareConfig) -> Self {
        let style = &config.style;
        let color = Rgba::from_unit([style.color[0], style.color[1], style.color[2], 1.0]);
        let z = style.background_depth;

        let mut calls = Vec::with_capacity(1 + config.emitters * config.flare_points);
        calls.push(DrawCall::TexturedQuad {
            corners: [
                Point3::new(0.0, 0.0, z),
                Point3::new(5.0, 0.0, z),
                Point3::new(5.0, 5.0, z),
                Point3::new(0.0, 5.0, z),
            ],
            uvs: [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        });

        let mut stack = MatrixStack::new();
        for [x, y, depth] in state.emitter_origins(style.depth) {
            stack.scoped(|stack| {
                stack.translate(x, y, depth);

                if !state.is_flared() {
                    stack.scale(style.rising_scale);
                    calls.push(DrawCall::SolidOctahedron {
                        model: *stack.current(),
                        color,
                    });
                    return;
                }

                let step = 360.0 / config.flare_points as f32;
                for j in 0..config.flare_points {
                    stack.scoped(|stack| {
                        stack.rotate_z(step * j as f32);
                        stack.translate(state.radius, 0.0, 0.0);
                        stack.scale(style.flare_scale);
                        calls.push(DrawCall::SolidOctahedron {
                            model: *stack.current(),
                            color,
                        });
                    });
                }
            });
        }

        Self {
            clear_color: Rgba::from_unit(style.clear_color),
            calls,
        }
    }

    pub fn octahedra(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::SolidOctahedron { .. }))
    }
}
