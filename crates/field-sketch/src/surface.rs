//! Parametric surfaces: the catenoid "wormhole" and toroidal rings around it
//!
//! Surfaces are sampled over a (u, v) lattice into `SurfacePatch` arrays,
//! rows indexed by v and columns by u, then triangulated for export.

use crate::config::SurfaceConfig;
use crate::error::{SketchError, SketchResult};
use crate::grid::Axis;
use nalgebra::Vector3;
use ndarray::Array2;
use std::f64::consts::PI;
use tracing::info;

pub trait ParametricSurface {
    fn point(&self, u: f64, v: f64) -> Vector3<f64>;

    fn sample(&self, u: &Axis, v: &Axis) -> SurfacePatch {
        let us = u.values();
        let vs = v.values();
        let shape = (vs.len(), us.len());

        let mut patch = SurfacePatch {
            x: Array2::zeros(shape),
            y: Array2::zeros(shape),
            z: Array2::zeros(shape),
        };
        for (row, &vv) in vs.iter().enumerate() {
            for (col, &uu) in us.iter().enumerate() {
                let p = self.point(uu, vv);
                patch.x[[row, col]] = p.x;
                patch.y[[row, col]] = p.y;
                patch.z[[row, col]] = p.z;
            }
        }
        patch
    }
}

/// Catenoid of unit amplitude: radius `cosh(z / throat_scale)` at height z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catenoid {
    pub throat_scale: f64,
}

impl Catenoid {
    pub fn radius_at(&self, z: f64) -> f64 {
        (z / self.throat_scale).cosh()
    }
}

impl ParametricSurface for Catenoid {
    fn point(&self, u: f64, v: f64) -> Vector3<f64> {
        let rho = self.radius_at(v);
        Vector3::new(rho * u.cos(), rho * u.sin(), v)
    }
}

/// Torus with its axis along z. `u` runs around the axis, `v` around the tube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    pub center_z: f64,
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl ParametricSurface for Torus {
    fn point(&self, u: f64, v: f64) -> Vector3<f64> {
        let rho = self.major_radius + self.minor_radius * v.cos();
        Vector3::new(
            rho * u.cos(),
            rho * u.sin(),
            self.center_z + self.minor_radius * v.sin(),
        )
    }
}

/// Sampled surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePatch {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
}

impl SurfacePatch {
    /// (rows, cols) = (v samples, u samples)
    pub fn shape(&self) -> (usize, usize) {
        self.x.dim()
    }

    pub fn point(&self, row: usize, col: usize) -> Vector3<f64> {
        Vector3::new(self.x[[row, col]], self.y[[row, col]], self.z[[row, col]])
    }

    /// Corners of every lattice cell, counter-clockwise in (u, v)
    pub fn quads(&self) -> impl Iterator<Item = [Vector3<f64>; 4]> + '_ {
        let (rows, cols) = self.shape();
        (0..rows.saturating_sub(1)).flat_map(move |r| {
            (0..cols.saturating_sub(1)).map(move |c| {
                [
                    self.point(r, c),
                    self.point(r, c + 1),
                    self.point(r + 1, c + 1),
                    self.point(r + 1, c),
                ]
            })
        })
    }

    /// `[x_min, x_max, y_min, y_max, z_min, z_max]`
    pub fn bounds(&self) -> [f64; 6] {
        let extent = |a: &Array2<f64>| {
            a.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        };
        let (x0, x1) = extent(&self.x);
        let (y0, y1) = extent(&self.y);
        let (z0, z1) = extent(&self.z);
        [x0, x1, y0, y1, z0, z1]
    }
}

/// Triangle mesh for export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Two triangles per lattice cell
    pub fn from_patch(patch: &SurfacePatch) -> Self {
        let (rows, cols) = patch.shape();
        let mut mesh = Mesh {
            positions: Vec::with_capacity(rows * cols * 3),
            indices: Vec::new(),
        };

        for r in 0..rows {
            for c in 0..cols {
                let p = patch.point(r, c);
                mesh.positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
            }
        }

        for r in 0..rows.saturating_sub(1) {
            for c in 0..cols.saturating_sub(1) {
                let a = (r * cols + c) as u32;
                let b = a + 1;
                let d = a + cols as u32;
                let e = d + 1;
                mesh.indices.extend_from_slice(&[a, b, e, a, e, d]);
            }
        }

        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }
}

/// Catenoid plus optional toroidal rings around it
#[derive(Debug, Clone)]
pub struct WormholeScene {
    pub catenoid: Catenoid,
    pub surface: SurfacePatch,
    pub rings: Vec<(Torus, SurfacePatch)>,
}

impl WormholeScene {
    /// Catenoid alone
    pub fn bare(config: &SurfaceConfig) -> SketchResult<Self> {
        config.validate()?;
        let u = Axis::linspace(config.u.start, config.u.stop, config.u.count)?;
        let v = Axis::linspace(config.v.start, config.v.stop, config.v.count)?;
        let catenoid = Catenoid {
            throat_scale: config.throat_scale,
        };
        let surface = catenoid.sample(&u, &v);
        info!("Sampled catenoid on a {}x{} (v, u) lattice", v.count, u.count);

        Ok(Self {
            catenoid,
            surface,
            rings: Vec::new(),
        })
    }

    /// Catenoid with `config.rings.count` tori at evenly spaced heights
    pub fn with_rings(config: &SurfaceConfig) -> SketchResult<Self> {
        let mut scene = Self::bare(config)?;
        let rings = &config.rings;
        if rings.count == 0 {
            return Ok(scene);
        }
        if rings.minor_radius.is_nan() || rings.minor_radius <= 0.0 || rings.tube_samples < 2 {
            return Err(SketchError::Config(format!(
                "rings need a positive minor radius and at least 2 tube samples, got {} and {}",
                rings.minor_radius, rings.tube_samples
            )));
        }

        let u = Axis::linspace(0.0, 2.0 * PI, config.u.count)?;
        let tube = Axis::linspace(0.0, 2.0 * PI, rings.tube_samples)?;
        let (v0, v1) = (config.v.start, config.v.stop);
        let spacing = (v1 - v0) / (rings.count + 1) as f64;

        for n in 1..=rings.count {
            let center_z = v0 + n as f64 * spacing;
            let torus = Torus {
                center_z,
                major_radius: scene.catenoid.radius_at(center_z) + rings.clearance,
                minor_radius: rings.minor_radius,
            };
            scene.rings.push((torus, torus.sample(&u, &tube)));
        }
        info!("Placed {} toroid ring(s) around the throat", scene.rings.len());

        Ok(scene)
    }

    /// All surfaces merged into one mesh
    pub fn mesh(&self) -> Mesh {
        let mut mesh = Mesh::from_patch(&self.surface);
        for (_, patch) in &self.rings {
            mesh.merge(&Mesh::from_patch(patch));
        }
        mesh
    }

    pub fn bounds(&self) -> [f64; 6] {
        let mut b = self.surface.bounds();
        for (_, patch) in &self.rings {
            let r = patch.bounds();
            for axis in 0..3 {
                b[2 * axis] = b[2 * axis].min(r[2 * axis]);
                b[2 * axis + 1] = b[2 * axis + 1].max(r[2 * axis + 1]);
            }
        }
        b
    }
}
