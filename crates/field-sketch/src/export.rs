//! Binary exports: STL meshes and FIELD frames
//! All values little-endian; lengths in meters.

use crate::error::SketchResult;
use crate::field::FieldSample;
use crate::grid::SampleGrid;
use crate::surface::Mesh;
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const FIELD_MAGIC: &[u8; 8] = b"FIELD\0\0\0";

/// Write a binary STL stream
pub fn write_stl_to<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    // 80-byte header
    let mut header = [b' '; 80];
    let label = b"field-sketch STL - units: m";
    header[..label.len()].copy_from_slice(label);
    writer.write_all(&header)?;

    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    for tri in mesh.indices.chunks_exact(3) {
        let v0 = mesh.vertex(tri[0]);
        let v1 = mesh.vertex(tri[1]);
        let v2 = mesh.vertex(tri[2]);

        for n in face_normal(v0, v1, v2) {
            writer.write_all(&n.to_le_bytes())?;
        }
        for v in [v0, v1, v2] {
            for coord in v {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }

        // Attribute byte count (unused)
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write a binary STL file
pub fn write_stl(mesh: &Mesh, path: &Path) -> SketchResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl_to(mesh, &mut writer)?;
    writer.flush()?;
    info!("Exported STL: {} triangles to {:?}", mesh.triangle_count(), path);
    Ok(())
}

/// Unit face normal by the right-hand rule; degenerate triangles (e.g. a
/// collapsed seam) get +z
fn face_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let (a, b, c) = (Vector3::from(v0), Vector3::from(v1), Vector3::from(v2));
    let n = (b - a)
        .cross(&(c - a))
        .try_normalize(1e-10)
        .unwrap_or_else(Vector3::z);
    [n.x, n.y, n.z]
}

/// A sampled vector field flattened for external viewers
pub struct FieldFrame {
    pub shape: (usize, usize, usize),
    /// `[x_min, x_max, y_min, y_max, z_min, z_max]`
    pub bounds: [f64; 6],
    pub positions: Vec<f32>,  // x, y, z per node
    pub vectors: Vec<f32>,    // Bx, By, Bz per node
    pub magnitudes: Vec<f32>, // |B| per node
}

impl FieldFrame {
    /// Every lattice node in row-major (i, j, k) order
    pub fn from_sample(grid: &SampleGrid, sample: &FieldSample) -> Self {
        let n = grid.len();
        let mut positions = Vec::with_capacity(n * 3);
        let mut vectors = Vec::with_capacity(n * 3);
        let mut magnitudes = Vec::with_capacity(n);

        let (nx, ny, nz) = grid.shape();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    let p = grid.point(i, j, k);
                    let b = sample.vector(i, j, k);
                    positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
                    vectors.extend_from_slice(&[b.x as f32, b.y as f32, b.z as f32]);
                    magnitudes.push(b.norm() as f32);
                }
            }
        }

        Self {
            shape: grid.shape(),
            bounds: grid.bounds(),
            positions,
            vectors,
            magnitudes,
        }
    }

    pub fn to_binary(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(8 + 12 + 24 + 4 + self.magnitudes.len() * 28);

        data.extend_from_slice(FIELD_MAGIC);

        let (nx, ny, nz) = self.shape;
        for d in [nx, ny, nz] {
            data.extend_from_slice(&(d as u32).to_le_bytes());
        }
        for &b in &self.bounds {
            data.extend_from_slice(&(b as f32).to_le_bytes());
        }

        data.extend_from_slice(&(self.magnitudes.len() as u32).to_le_bytes());
        for &v in self.positions.iter().chain(&self.vectors).chain(&self.magnitudes) {
            data.extend_from_slice(&v.to_le_bytes());
        }

        data
    }

    pub fn write(&self, path: &Path) -> SketchResult<()> {
        std::fs::write(path, self.to_binary())?;
        info!("Exported FIELD frame: {} nodes to {:?}", self.magnitudes.len(), path);
        Ok(())
    }
}
