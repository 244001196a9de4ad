//! Scene configuration
//!
//! Defaults reproduce the fixed constants of the counter-rotating coil and
//! wormhole scenes. Any subset can be overridden from a JSON file; missing
//! fields fall back to the defaults.

use crate::error::{SketchError, SketchResult};
use crate::grid::{Axis, SampleGrid};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

/// Constants of the coil field model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceParameters {
    /// Reference drive current (A)
    pub current: f64,
    /// Drive frequency (Hz)
    pub frequency: f64,
    /// Characteristic winding radius (m)
    pub windings_radius: f64,
    /// Coil outer diameter (m)
    pub outer_diameter: f64,
    /// Supply voltage (V), informational
    pub voltage: f64,
    /// Coil impedance (ohm), informational
    pub impedance: f64,
}

impl Default for SourceParameters {
    fn default() -> Self {
        Self {
            current: 340_000_000.0,
            frequency: 2_516_461.0,
            windings_radius: 0.063,
            outer_diameter: 0.177,
            voltage: 100_000.0,
            impedance: 0.0300164,
        }
    }
}

impl SourceParameters {
    /// Annular cross-section between the outer diameter and the winding radius (m^2)
    pub fn cross_sectional_area(&self) -> f64 {
        PI * (self.outer_diameter / 2.0).powi(2) - PI * self.windings_radius.powi(2)
    }

    /// Current density of the reference current (A/m^2), shared by every source
    pub fn current_density(&self) -> f64 {
        self.current / self.cross_sectional_area()
    }

    pub fn validate(&self) -> SketchResult<()> {
        let fields = [
            ("current", self.current),
            ("frequency", self.frequency),
            ("windings_radius", self.windings_radius),
            ("outer_diameter", self.outer_diameter),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SketchError::Config(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.windings_radius <= 0.0 {
            return Err(SketchError::Config(format!(
                "windings_radius must be positive, got {}",
                self.windings_radius
            )));
        }
        if self.cross_sectional_area() == 0.0 {
            return Err(SketchError::Config(
                "outer diameter equals winding diameter, cross-section area is zero".into(),
            ));
        }
        Ok(())
    }
}

/// Three axes spanning the sampling lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::cube(0.2, 40)
    }
}

impl GridSpec {
    /// Symmetric cube `[-half_extent, half_extent]^3` with `count` samples per axis
    pub fn cube(half_extent: f64, count: usize) -> Self {
        let axis = Axis {
            start: -half_extent,
            stop: half_extent,
            count,
        };
        Self { x: axis, y: axis, z: axis }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.x.count = count;
        self.y.count = count;
        self.z.count = count;
        self
    }

    pub fn build(&self) -> SketchResult<SampleGrid> {
        let x = Axis::linspace(self.x.start, self.x.stop, self.x.count)?;
        let y = Axis::linspace(self.y.start, self.y.stop, self.y.count)?;
        let z = Axis::linspace(self.z.start, self.z.stop, self.z.count)?;
        Ok(SampleGrid::from_axes(&x, &y, &z))
    }
}

/// One coil of the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoilSpec {
    pub label: String,
    /// Signed drive current (A)
    pub current: f64,
    /// Coil centre (m)
    pub center: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoilSceneConfig {
    pub source: SourceParameters,
    pub grid: GridSpec,
    pub coils: Vec<CoilSpec>,
    /// Keep every n-th lattice node along each axis for the quiver
    pub subsample_rate: usize,
    /// Drawn arrow length (m)
    pub arrow_length: f64,
    pub image_size: (u32, u32),
}

impl Default for CoilSceneConfig {
    fn default() -> Self {
        let source = SourceParameters::default();
        Self {
            coils: vec![
                CoilSpec {
                    label: "Coil 1".into(),
                    current: source.current,
                    center: [0.0, 0.0, 0.00125],
                },
                CoilSpec {
                    label: "Coil 2".into(),
                    current: -source.current,
                    center: [0.0, 0.0, -0.00125],
                },
            ],
            source,
            grid: GridSpec::default(),
            subsample_rate: 2,
            arrow_length: 0.01,
            image_size: (1200, 1000),
        }
    }
}

impl CoilSceneConfig {
    pub fn validate(&self) -> SketchResult<()> {
        self.source.validate()?;
        if self.subsample_rate == 0 {
            return Err(SketchError::Config("subsample_rate must be at least 1".into()));
        }
        if self.coils.is_empty() {
            return Err(SketchError::Config("scene has no coils".into()));
        }
        Ok(())
    }
}

/// Toroidal rings wrapped around the wormhole throat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub count: usize,
    /// Gap between the catenoid wall and the ring's centre circle (scene units)
    pub clearance: f64,
    pub minor_radius: f64,
    /// Samples around the tube cross-section
    pub tube_samples: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            count: 3,
            clearance: 0.08,
            minor_radius: 0.05,
            tube_samples: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Angular parameter
    pub u: Axis,
    /// Height parameter
    pub v: Axis,
    /// Divisor of `v` inside `cosh`; larger values widen the throat
    pub throat_scale: f64,
    pub rings: RingConfig,
    pub alpha: f64,
    pub image_size: (u32, u32),
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            u: Axis {
                start: 0.0,
                stop: 2.0 * PI,
                count: 100,
            },
            v: Axis {
                start: -1.0,
                stop: 1.0,
                count: 100,
            },
            throat_scale: 10.0,
            rings: RingConfig::default(),
            alpha: 0.5,
            image_size: (800, 800),
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> SketchResult<()> {
        if !(self.throat_scale.is_finite() && self.throat_scale != 0.0) {
            return Err(SketchError::Config(format!(
                "throat_scale must be finite and non-zero, got {}",
                self.throat_scale
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(SketchError::Config(format!("alpha must be in [0, 1], got {}", self.alpha)));
        }
        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub coil: CoilSceneConfig,
    pub surface: SurfaceConfig,
}

impl SketchConfig {
    pub fn from_json(json: &str) -> SketchResult<Self> {
        let config: SketchConfig = serde_json::from_str(json)?;
        config.coil.validate()?;
        config.surface.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SketchResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}
