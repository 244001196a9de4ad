//! Property-based tests for the field sampler.
//!
//! Covers: determinism, superposition, shape preservation and the origin
//! substitution over randomly sized lattices and source parameters.

use field_sketch::config::{GridSpec, SourceParameters};
use field_sketch::{evaluate, Axis, FieldSample, SampleGrid};
use nalgebra::Vector3;
use ndarray::{Array3, Zip};
use proptest::prelude::*;

fn params(frequency: f64, windings_radius: f64) -> SourceParameters {
    SourceParameters {
        current: 1.0,
        frequency,
        windings_radius,
        outer_diameter: 4.0 * windings_radius,
        ..SourceParameters::default()
    }
}

fn grid(half: f64, nx: usize, ny: usize, nz: usize) -> SampleGrid {
    let x = Axis::linspace(-half, half, nx).unwrap();
    let y = Axis::linspace(-half, half, ny).unwrap();
    let z = Axis::linspace(-half * 0.5, half, nz).unwrap();
    SampleGrid::from_axes(&x, &y, &z)
}

proptest! {
    /// Two passes with identical inputs agree bit for bit.
    #[test]
    fn evaluation_is_deterministic(
        n in 1usize..6,
        half in 0.01f64..1.0,
        freq in 0.1f64..1e6,
        current in -1e6f64..1e6,
    ) {
        let g = grid(half, n, n + 1, n + 2);
        let p = params(freq, 0.063);

        let mut a = FieldSample::for_grid(&g);
        let mut b = FieldSample::for_grid(&g);
        evaluate(&mut a, current, &g, &p).unwrap();
        evaluate(&mut b, current, &g, &p).unwrap();

        let bits = |s: &FieldSample| -> Vec<u64> {
            s.bx.iter().chain(s.by.iter()).chain(s.bz.iter()).map(|v| v.to_bits()).collect()
        };
        prop_assert_eq!(bits(&a), bits(&b));
    }

    /// Evaluating two sources into one sample equals summing separate samples.
    #[test]
    fn superposition_holds(
        n in 1usize..5,
        i1 in -1e3f64..1e3,
        i2 in -1e3f64..1e3,
        freq in 0.1f64..10.0,
    ) {
        let g = grid(0.2, n, n, n);
        let p = params(freq, 1.0);

        let mut combined = FieldSample::for_grid(&g);
        evaluate(&mut combined, i1, &g, &p).unwrap();
        evaluate(&mut combined, i2, &g, &p).unwrap();

        let mut first = FieldSample::for_grid(&g);
        let mut second = FieldSample::for_grid(&g);
        evaluate(&mut first, i1, &g, &p).unwrap();
        evaluate(&mut second, i2, &g, &p).unwrap();

        for (c, a, b) in [
            (&combined.bx, &first.bx, &second.bx),
            (&combined.by, &first.by, &second.by),
            (&combined.bz, &first.bz, &second.bz),
        ] {
            Zip::from(c).and(a).and(b).for_each(|&c, &a, &b| {
                assert_eq!(c, a + b);
            });
        }
    }

    /// Output arrays always take the grid's shape.
    #[test]
    fn output_shape_matches_grid(nx in 1usize..6, ny in 1usize..6, nz in 1usize..6) {
        let g = grid(0.2, nx, ny, nz);
        let mut out = FieldSample::for_grid(&g);
        evaluate(&mut out, 1.0, &g, &SourceParameters::default()).unwrap();
        prop_assert_eq!(out.bx.dim(), (nx, ny, nz));
        prop_assert_eq!(out.by.dim(), (nx, ny, nz));
        prop_assert_eq!(out.bz.dim(), (nx, ny, nz));
    }

    /// A lattice collapsed onto the origin never yields NaN or infinity.
    #[test]
    fn origin_lattice_is_finite(
        nx in 1usize..4,
        ny in 1usize..4,
        current in -1e9f64..1e9,
        freq in 1.0f64..1e7,
    ) {
        let shape = (nx, ny, 2);
        let g = SampleGrid::from_arrays(Array3::zeros(shape), Array3::zeros(shape), Array3::zeros(shape)).unwrap();
        let mut out = FieldSample::for_grid(&g);
        evaluate(&mut out, current, &g, &params(freq, 0.063)).unwrap();
        prop_assert!(out.is_finite());
    }
}

#[test]
fn four_cube_scenario() {
    let g = GridSpec::cube(0.2, 4).build().unwrap();
    let mut out = FieldSample::for_grid(&g);
    evaluate(&mut out, 340_000_000.0, &g, &SourceParameters::default()).unwrap();
    assert_eq!(out.shape(), (4, 4, 4));
    assert!(out.is_finite());
}

#[test]
fn single_point_scenario() {
    let p = params(1.0, 1.0);
    let g = SampleGrid::single(Vector3::new(0.1, 0.0, 0.0));
    let mut out = FieldSample::for_grid(&g);
    evaluate(&mut out, 1.0, &g, &p).unwrap();

    assert_eq!(out.bx.len(), 1);
    assert_eq!(out.by.len(), 1);
    assert_eq!(out.bz.len(), 1);
    assert!(out.is_finite());
    assert!(out.vector(0, 0, 0).norm() < p.current_density().abs());
}
