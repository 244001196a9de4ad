//! Counter-rotating toroidal coil scene
//!
//! Every coil is evaluated on the common lattice shifted into the coil's own
//! frame, into a separate field sample. Arrows for the quiver plot are taken
//! from a subsampled lattice and normalized for display.

use crate::config::{CoilSceneConfig, CoilSpec};
use crate::error::{SketchError, SketchResult};
use crate::field::{evaluate, FieldSample};
use crate::grid::SampleGrid;
use nalgebra::Vector3;
use tracing::info;

/// A quiver glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub position: Vector3<f64>,
    /// Unit direction
    pub direction: Vector3<f64>,
    /// |B| before normalization
    pub magnitude: f64,
}

impl Arrow {
    pub fn tip(&self, length: f64) -> Vector3<f64> {
        self.position + self.direction * length
    }
}

/// Normalized arrows at every `rate`-th lattice node along each axis
pub fn quiver_arrows(grid: &SampleGrid, sample: &FieldSample, rate: usize) -> Vec<Arrow> {
    let rate = rate.max(1);
    let (nx, ny, nz) = grid.shape();
    let mut arrows = Vec::new();

    for i in (0..nx).step_by(rate) {
        for j in (0..ny).step_by(rate) {
            for k in (0..nz).step_by(rate) {
                let b = sample.vector(i, j, k);
                let mag = b.norm();
                if !mag.is_finite() || mag == 0.0 {
                    continue;
                }
                arrows.push(Arrow {
                    position: grid.point(i, j, k),
                    direction: b / mag,
                    magnitude: mag,
                });
            }
        }
    }

    arrows
}

/// Field of one coil on the scene lattice
#[derive(Debug, Clone)]
pub struct CoilField {
    pub coil: CoilSpec,
    pub sample: FieldSample,
}

#[derive(Debug, Clone)]
pub struct CoilScene {
    pub config: CoilSceneConfig,
    /// Lattice in scene coordinates, used for arrow positions
    pub grid: SampleGrid,
    pub fields: Vec<CoilField>,
}

impl CoilScene {
    pub fn compute(config: &CoilSceneConfig) -> SketchResult<Self> {
        config.validate()?;
        let grid = config.grid.build()?;
        let (nx, ny, nz) = grid.shape();
        info!(
            "Sampling {} coil(s) on a {}x{}x{} lattice, J_ref = {:.4e} A/m^2",
            config.coils.len(),
            nx,
            ny,
            nz,
            config.source.current_density()
        );

        let mut fields = Vec::with_capacity(config.coils.len());
        for coil in &config.coils {
            let center = Vector3::from(coil.center);
            let local = grid.translated(-center);
            let mut sample = FieldSample::for_grid(&local);
            evaluate(&mut sample, coil.current, &local, &config.source)?;
            info!("{}: I = {:.3e} A, centre = {:?}", coil.label, coil.current, coil.center);
            fields.push(CoilField {
                coil: coil.clone(),
                sample,
            });
        }

        Ok(Self {
            config: config.clone(),
            grid,
            fields,
        })
    }

    /// Superposition of all coils
    pub fn total_field(&self) -> SketchResult<FieldSample> {
        let mut total = FieldSample::for_grid(&self.grid);
        for field in &self.fields {
            total.accumulate(&field.sample)?;
        }
        Ok(total)
    }

    /// Quiver arrows of one coil, subsampled at the configured rate
    pub fn arrows(&self, coil_index: usize) -> SketchResult<Vec<Arrow>> {
        let field = self.fields.get(coil_index).ok_or_else(|| {
            SketchError::Config(format!(
                "coil index {} out of range ({} coils)",
                coil_index,
                self.fields.len()
            ))
        })?;
        Ok(quiver_arrows(&self.grid, &field.sample, self.config.subsample_rate))
    }
}
