//! Toroidal-coil field model evaluated over a sample lattice
//!
//! Each lattice point is independent: an oscillating complex current element
//! is crossed with the radial unit vector and scaled by mu0 / (4 pi r^2).
//! Only the real part of the result is kept, and only at the final
//! accumulation into the output arrays.

use crate::config::SourceParameters;
use crate::error::{SketchError, SketchResult};
use crate::grid::SampleGrid;
use nalgebra::Vector3;
use ndarray::{Array3, Zip};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Permeability of free space (H/m)
pub const MU0: f64 = 4.0 * PI * 1e-7;

/// Radius substituted for a point exactly at the origin
pub const R_EPSILON: f64 = 1e-12;

/// Per-axis field components on a lattice
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSample {
    pub bx: Array3<f64>,
    pub by: Array3<f64>,
    pub bz: Array3<f64>,
}

impl FieldSample {
    pub fn zeros(shape: (usize, usize, usize)) -> Self {
        Self {
            bx: Array3::zeros(shape),
            by: Array3::zeros(shape),
            bz: Array3::zeros(shape),
        }
    }

    /// Zeroed sample matching a grid's shape
    pub fn for_grid(grid: &SampleGrid) -> Self {
        Self::zeros(grid.shape())
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.bx.dim()
    }

    pub fn vector(&self, i: usize, j: usize, k: usize) -> Vector3<f64> {
        Vector3::new(self.bx[[i, j, k]], self.by[[i, j, k]], self.bz[[i, j, k]])
    }

    /// Element-wise |B|
    pub fn magnitude(&self) -> Array3<f64> {
        let mut out = Array3::zeros(self.shape());
        Zip::from(&mut out)
            .and(&self.bx)
            .and(&self.by)
            .and(&self.bz)
            .for_each(|m, &x, &y, &z| *m = (x * x + y * y + z * z).sqrt());
        out
    }

    /// Add another sample into this one (superposition)
    pub fn accumulate(&mut self, other: &FieldSample) -> SketchResult<()> {
        if other.shape() != self.shape() {
            return Err(SketchError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        self.bx += &other.bx;
        self.by += &other.by;
        self.bz += &other.bz;
        Ok(())
    }

    pub fn is_finite(&self) -> bool {
        self.bx
            .iter()
            .chain(self.by.iter())
            .chain(self.bz.iter())
            .all(|v| v.is_finite())
    }
}

/// Field contribution of one source at a single point.
///
/// `current_density` is the reference current density (A/m^2).
pub fn point_field(point: Vector3<f64>, current_density: f64, params: &SourceParameters) -> Vector3<f64> {
    let mut r = point.norm();
    if r == 0.0 {
        r = R_EPSILON;
    }
    let r_hat = (point / r).map(Complex64::from);

    // Same angle twice, associated differently; the rounding of each is kept.
    let theta = params.frequency * 2.0 * PI * (r / params.windings_radius);
    let phase_angle = 2.0 * PI * params.frequency * r / params.windings_radius;
    let phase = Complex64::new(0.0, phase_angle).exp();

    // Current element: direction rotates in the y-z plane with r
    let amplitude = current_density * r;
    let idl = Vector3::new(0.0, theta.cos(), theta.sin())
        .map(|c| Complex64::from(amplitude * c) * phase);

    let b = idl
        .cross(&r_hat)
        .map(|c| c * (MU0 / (4.0 * PI)) / (r * r));

    Vector3::new(b.x.re, b.y.re, b.z.re)
}

/// Accumulate the field of one source over every lattice point into `outputs`.
///
/// Values are added, never overwritten, so several sources can be evaluated
/// into the same sample. Every source is driven by the reference current
/// density of `params`; `source_current` only labels the pass.
///
/// Points are evaluated in parallel; every point only writes its own slot,
/// so the result does not depend on scheduling.
pub fn evaluate(
    outputs: &mut FieldSample,
    source_current: f64,
    grid: &SampleGrid,
    params: &SourceParameters,
) -> SketchResult<()> {
    if outputs.shape() != grid.shape() {
        return Err(SketchError::ShapeMismatch {
            expected: grid.shape(),
            actual: outputs.shape(),
        });
    }

    let current_density = params.current_density();
    tracing::debug!(
        "Evaluating {} points, I = {:.3e} A, J = {:.3e} A/m^2",
        grid.len(),
        source_current,
        current_density
    );

    Zip::from(&mut outputs.bx)
        .and(&mut outputs.by)
        .and(&mut outputs.bz)
        .and(&grid.x)
        .and(&grid.y)
        .and(&grid.z)
        .par_for_each(|bx, by, bz, &x, &y, &z| {
            let b = point_field(Vector3::new(x, y, z), current_density, params);
            *bx += b.x;
            *by += b.y;
            *bz += b.z;
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;

    fn unit_params() -> SourceParameters {
        SourceParameters {
            current: 1.0,
            frequency: 1.0,
            windings_radius: 1.0,
            outer_diameter: 3.0,
            ..SourceParameters::default()
        }
    }

    #[test]
    fn test_shape_matches_grid() {
        let grid = GridSpec::cube(0.2, 4).build().unwrap();
        let mut out = FieldSample::for_grid(&grid);
        evaluate(&mut out, 1.0, &grid, &unit_params()).unwrap();
        assert_eq!(out.bx.dim(), (4, 4, 4));
        assert_eq!(out.by.dim(), (4, 4, 4));
        assert_eq!(out.bz.dim(), (4, 4, 4));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let grid = GridSpec::cube(0.2, 4).build().unwrap();
        let mut out = FieldSample::zeros((4, 4, 3));
        assert!(evaluate(&mut out, 1.0, &grid, &unit_params()).is_err());
    }

    #[test]
    fn test_single_point_scenario() {
        let params = unit_params();
        let grid = SampleGrid::single(Vector3::new(0.1, 0.0, 0.0));
        let mut out = FieldSample::for_grid(&grid);
        evaluate(&mut out, 1.0, &grid, &params).unwrap();

        assert_eq!(out.bx.len(), 1);
        assert!(out.is_finite());
        let b = out.vector(0, 0, 0);
        assert!(b.norm() < params.current_density().abs());
        assert!(b.norm() > 0.0);
    }

    #[test]
    fn test_single_point_closed_form() {
        // At (r, 0, 0): Idl x r_hat = (0, Idl_z, -Idl_y)
        let params = unit_params();
        let r: f64 = 0.1;
        let theta = 2.0 * PI * r;
        let j = params.current_density();
        let b = point_field(Vector3::new(r, 0.0, 0.0), j, &params);

        let scale = 1e-7 / (r * r) * j * r;
        let expected_y = scale * (theta.sin() * theta.cos());
        let expected_z = -scale * (theta.cos() * theta.cos());
        assert_eq!(b.x, 0.0);
        assert!((b.y - expected_y).abs() < 1e-10 * expected_y.abs());
        assert!((b.z - expected_z).abs() < 1e-10 * expected_z.abs());
    }

    #[test]
    fn test_origin_is_finite() {
        let grid = SampleGrid::single(Vector3::zeros());
        let mut out = FieldSample::for_grid(&grid);
        evaluate(&mut out, 1.0, &grid, &unit_params()).unwrap();
        assert!(out.is_finite());
    }

    #[test]
    fn test_all_zero_grid_is_finite() {
        let grid = SampleGrid::from_arrays(
            Array3::zeros((3, 2, 2)),
            Array3::zeros((3, 2, 2)),
            Array3::zeros((3, 2, 2)),
        )
        .unwrap();
        let mut out = FieldSample::for_grid(&grid);
        evaluate(&mut out, SourceParameters::default().current, &grid, &SourceParameters::default()).unwrap();
        assert!(out.is_finite());
    }

    #[test]
    fn test_accumulates_instead_of_overwriting() {
        let params = unit_params();
        let grid = GridSpec::cube(0.2, 3).build().unwrap();

        let mut once = FieldSample::for_grid(&grid);
        evaluate(&mut once, 1.0, &grid, &params).unwrap();

        let mut twice = FieldSample::for_grid(&grid);
        evaluate(&mut twice, 1.0, &grid, &params).unwrap();
        evaluate(&mut twice, 1.0, &grid, &params).unwrap();

        Zip::from(&twice.bx).and(&once.bx).for_each(|&t, &o| assert_eq!(t, 2.0 * o));
    }

    #[test]
    fn test_source_current_does_not_scale_field() {
        let params = unit_params();
        let grid = GridSpec::cube(0.2, 3).build().unwrap();

        let mut forward = FieldSample::for_grid(&grid);
        let mut reverse = FieldSample::for_grid(&grid);
        evaluate(&mut forward, 2.5, &grid, &params).unwrap();
        evaluate(&mut reverse, -2.5, &grid, &params).unwrap();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_accumulate_sample() {
        let mut a = FieldSample::zeros((2, 2, 2));
        let mut b = FieldSample::zeros((2, 2, 2));
        b.bx.fill(1.0);
        b.bz.fill(-2.0);
        a.accumulate(&b).unwrap();
        a.accumulate(&b).unwrap();
        assert_eq!(a.vector(1, 1, 1), Vector3::new(2.0, 0.0, -4.0));
        assert!(a.accumulate(&FieldSample::zeros((1, 2, 2))).is_err());
    }
}
