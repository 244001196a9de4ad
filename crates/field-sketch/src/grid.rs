//! Sampling lattice built from three 1D axes
//!
//! The lattice is the outer product of the axes with `ij` indexing:
//! x varies along the first array axis, y along the second, z along the third.

use crate::error::{SketchError, SketchResult};
use nalgebra::Vector3;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Evenly spaced samples over a closed interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

impl Axis {
    pub fn linspace(start: f64, stop: f64, count: usize) -> SketchResult<Self> {
        if count == 0 {
            return Err(SketchError::InvalidAxis("sample count must be at least 1".into()));
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(SketchError::InvalidAxis(format!(
                "bounds must be finite, got [{}, {}]",
                start, stop
            )));
        }
        Ok(Self { start, stop, count })
    }

    /// Sample values, both ends inclusive. A single-sample axis yields `[start]`.
    pub fn values(&self) -> Vec<f64> {
        if self.count == 1 {
            return vec![self.start];
        }
        let step = (self.stop - self.start) / (self.count - 1) as f64;
        (0..self.count)
            .map(|i| {
                if i == self.count - 1 {
                    self.stop
                } else {
                    self.start + i as f64 * step
                }
            })
            .collect()
    }
}

/// Ordered 3D lattice of sample points
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    pub x: Array3<f64>,
    pub y: Array3<f64>,
    pub z: Array3<f64>,
}

impl SampleGrid {
    pub fn from_axes(x: &Axis, y: &Axis, z: &Axis) -> Self {
        let xs = x.values();
        let ys = y.values();
        let zs = z.values();
        let shape = (xs.len(), ys.len(), zs.len());

        Self {
            x: Array3::from_shape_fn(shape, |(i, _, _)| xs[i]),
            y: Array3::from_shape_fn(shape, |(_, j, _)| ys[j]),
            z: Array3::from_shape_fn(shape, |(_, _, k)| zs[k]),
        }
    }

    /// Build a grid from explicit coordinate arrays, which must share one shape.
    pub fn from_arrays(x: Array3<f64>, y: Array3<f64>, z: Array3<f64>) -> SketchResult<Self> {
        let expected = x.dim();
        for actual in [y.dim(), z.dim()] {
            if actual != expected {
                return Err(SketchError::ShapeMismatch { expected, actual });
            }
        }
        Ok(Self { x, y, z })
    }

    /// A 1x1x1 grid holding a single point
    pub fn single(point: Vector3<f64>) -> Self {
        Self {
            x: Array3::from_elem((1, 1, 1), point.x),
            y: Array3::from_elem((1, 1, 1), point.y),
            z: Array3::from_elem((1, 1, 1), point.z),
        }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.x.dim()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn point(&self, i: usize, j: usize, k: usize) -> Vector3<f64> {
        Vector3::new(self.x[[i, j, k]], self.y[[i, j, k]], self.z[[i, j, k]])
    }

    /// Copy of this grid with every point shifted by `offset`
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self {
            x: self.x.mapv(|v| v + offset.x),
            y: self.y.mapv(|v| v + offset.y),
            z: self.z.mapv(|v| v + offset.z),
        }
    }

    /// Coordinate extent as `[x_min, x_max, y_min, y_max, z_min, z_max]`
    pub fn bounds(&self) -> [f64; 6] {
        let extent = |a: &Array3<f64>| {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let axis = Axis::linspace(-0.2, 0.2, 40).unwrap();
        let v = axis.values();
        assert_eq!(v.len(), 40);
        assert_eq!(v[0], -0.2);
        assert_eq!(v[39], 0.2);
        assert!((v[1] - v[0] - 0.4 / 39.0).abs() < 1e-15);
    }

    #[test]
    fn test_linspace_single_sample() {
        let axis = Axis::linspace(3.0, 5.0, 1).unwrap();
        assert_eq!(axis.values(), vec![3.0]);
    }

    #[test]
    fn test_linspace_rejects_empty_and_nan() {
        assert!(Axis::linspace(0.0, 1.0, 0).is_err());
        assert!(Axis::linspace(f64::NAN, 1.0, 4).is_err());
    }

    #[test]
    fn test_axis_ordering() {
        let x = Axis::linspace(0.0, 1.0, 2).unwrap();
        let y = Axis::linspace(10.0, 12.0, 3).unwrap();
        let z = Axis::linspace(100.0, 103.0, 4).unwrap();
        let grid = SampleGrid::from_axes(&x, &y, &z);

        assert_eq!(grid.shape(), (2, 3, 4));
        assert_eq!(grid.len(), 24);
        let p = grid.point(1, 2, 3);
        assert_eq!((p.x, p.y, p.z), (1.0, 12.0, 103.0));
        let p = grid.point(0, 1, 2);
        assert_eq!((p.x, p.y, p.z), (0.0, 11.0, 102.0));
    }

    #[test]
    fn test_translated_shifts_every_point() {
        let axis = Axis::linspace(-1.0, 1.0, 3).unwrap();
        let grid = SampleGrid::from_axes(&axis, &axis, &axis);
        let shifted = grid.translated(Vector3::new(0.0, 0.0, -0.00125));

        assert_eq!(shifted.shape(), grid.shape());
        assert_eq!(shifted.x, grid.x);
        assert_eq!(shifted.y, grid.y);
        assert!((shifted.point(2, 2, 0).z - (-1.00125)).abs() < 1e-15);
    }

    #[test]
    fn test_from_arrays_shape_mismatch() {
        let a = Array3::zeros((2, 2, 2));
        let b = Array3::zeros((2, 2, 3));
        let err = SampleGrid::from_arrays(a.clone(), b, a).unwrap_err();
        assert!(matches!(err, SketchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_bounds() {
        let x = Axis::linspace(-0.2, 0.2, 5).unwrap();
        let y = Axis::linspace(0.0, 1.0, 2).unwrap();
        let z = Axis::linspace(-3.0, -1.0, 3).unwrap();
        let grid = SampleGrid::from_axes(&x, &y, &z);
        assert_eq!(grid.bounds(), [-0.2, 0.2, 0.0, 1.0, -3.0, -1.0]);
    }
}
