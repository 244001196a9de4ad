//! field-sketch: synthetic 3D field and surface visualizations
//!
//! This crate provides:
//! - A sampling lattice built from three linspace axes
//! - Point-wise evaluation of the toroidal-coil field model with superposition
//! - Catenoid ("wormhole") and toroid-ring parametric surfaces
//! - Binary STL / FIELD frame export and plotters-based rendering
//!
//! Lengths are in meters throughout.

pub mod coil;
pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod grid;
pub mod render;
pub mod surface;

pub use coil::{Arrow, CoilScene};
pub use config::{CoilSceneConfig, GridSpec, SketchConfig, SourceParameters, SurfaceConfig};
pub use error::{SketchError, SketchResult};
pub use field::{evaluate, FieldSample, MU0, R_EPSILON};
pub use grid::{Axis, SampleGrid};
pub use surface::{Catenoid, Mesh, SurfacePatch, Torus, WormholeScene};
