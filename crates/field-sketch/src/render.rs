//! 3D quiver and surface plots
//!
//! The output format follows the file extension: `.svg` uses the SVG backend,
//! anything else the bitmap backend. Scene z is drawn as the chart's vertical
//! axis.

use crate::coil::CoilScene;
use crate::config::SurfaceConfig;
use crate::error::{SketchError, SketchResult};
use crate::surface::{SurfacePatch, WormholeScene};
use nalgebra::Vector3;
use plotters::coord::cartesian::Cartesian3d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;
use tracing::info;

pub const QUIVER_TITLE: &str = "3D Magnetic Field Vectors from Counter-Rotating Toroidal Coils";

const RING_COLOR: RGBColor = RGBColor(255, 140, 0);

type Coord3d = Cartesian3d<RangedCoordf64, RangedCoordf64, RangedCoordf64>;

/// A chart-space polygon with its fill
type Face = (Vec<(f64, f64, f64)>, ShapeStyle);

fn render_err<E: Display>(e: E) -> SketchError {
    SketchError::Render(e.to_string())
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Scene (x, y, z) to chart (x, vertical, depth)
fn to_chart(p: Vector3<f64>) -> (f64, f64, f64) {
    (p.x, p.z, p.y)
}

/// Chart ranges (x, vertical, depth) for scene bounds, padded on every side
fn chart_ranges(b: [f64; 6], pad: f64) -> (Range<f64>, Range<f64>, Range<f64>) {
    (
        b[0] - pad..b[1] + pad,
        b[4] - pad..b[5] + pad,
        b[2] - pad..b[3] + pad,
    )
}

/// Blue and red for the first two coils, palette colours after that
pub fn coil_color(index: usize) -> RGBColor {
    match index {
        0 => BLUE,
        1 => RED,
        _ => {
            let c = Palette99::pick(index).to_rgba();
            RGBColor(c.0, c.1, c.2)
        }
    }
}

pub fn render_quiver(scene: &CoilScene, path: &Path) -> SketchResult<()> {
    let size = scene.config.image_size;
    if is_svg(path) {
        draw_quiver(SVGBackend::new(path, size).into_drawing_area(), scene)?;
    } else {
        draw_quiver(BitMapBackend::new(path, size).into_drawing_area(), scene)?;
    }
    info!("Rendered quiver plot to {:?}", path);
    Ok(())
}

fn draw_quiver<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, scene: &CoilScene) -> SketchResult<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let length = scene.config.arrow_length;
    let (xr, vr, dr) = chart_ranges(scene.grid.bounds(), length);
    let (x_end, v_end, d_end) = (xr.end, vr.end, dr.end);
    let (x_start, v_start, d_start) = (xr.start, vr.start, dr.start);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(QUIVER_TITLE, ("sans-serif", 24))
        .build_cartesian_3d(xr, vr, dr)
        .map_err(render_err)?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.85;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()
        .map_err(render_err)?;

    let label_style = ("sans-serif", 16).into_font().color(&BLACK);
    chart
        .draw_series([
            Text::new("X (m)", (x_end, v_start, d_start), label_style.clone()),
            Text::new("Y (m)", (x_start, v_start, d_end), label_style.clone()),
            Text::new("Z (m)", (x_start, v_end, d_start), label_style),
        ])
        .map_err(render_err)?;

    for (index, field) in scene.fields.iter().enumerate() {
        let arrows = scene.arrows(index)?;
        let color = coil_color(index);
        tracing::debug!("{}: drawing {} arrows", field.coil.label, arrows.len());

        chart
            .draw_series(arrows.iter().map(|a| {
                PathElement::new(
                    vec![to_chart(a.position), to_chart(a.tip(length))],
                    color.stroke_width(1),
                )
            }))
            .map_err(render_err)?
            .label(field.coil.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

pub fn render_surface(
    scene: &WormholeScene,
    config: &SurfaceConfig,
    title: &str,
    path: &Path,
) -> SketchResult<()> {
    let size = config.image_size;
    if is_svg(path) {
        draw_surface(SVGBackend::new(path, size).into_drawing_area(), scene, config, title)?;
    } else {
        draw_surface(BitMapBackend::new(path, size).into_drawing_area(), scene, config, title)?;
    }
    info!("Rendered surface plot to {:?}", path);
    Ok(())
}

fn draw_surface<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    scene: &WormholeScene,
    config: &SurfaceConfig,
    title: &str,
) -> SketchResult<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let (xr, vr, dr) = chart_ranges(scene.bounds(), 0.05);
    let (x_end, v_end, d_end) = (xr.end, vr.end, dr.end);
    let (x_start, v_start, d_start) = (xr.start, vr.start, dr.start);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(title, ("sans-serif", 24))
        .build_cartesian_3d(xr, vr, dr)
        .map_err(render_err)?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.5;
        pb.pitch = 0.3;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()
        .map_err(render_err)?;

    let label_style = ("sans-serif", 16).into_font().color(&BLACK);
    chart
        .draw_series([
            Text::new("X", (x_end, v_start, d_start), label_style.clone()),
            Text::new("Y", (x_start, v_start, d_end), label_style.clone()),
            Text::new("Z", (x_start, v_end, d_start), label_style),
        ])
        .map_err(render_err)?;

    let mut patches = vec![(&scene.surface, BLUE.mix(config.alpha).filled())];
    patches.extend(scene.rings.iter().map(|(_, ring)| (ring, RING_COLOR.mix(0.8).filled())));
    let faces = back_to_front(chart.as_coord_spec(), &patches);
    tracing::debug!("Drawing {} faces", faces.len());

    chart
        .draw_series(faces.into_iter().map(|(points, style)| Polygon::new(points, style)))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Quads of every patch in painter's order: farthest from the screen first,
/// so nearer faces (surface or ring) cover the ones behind them
fn back_to_front(coord: &Coord3d, patches: &[(&SurfacePatch, ShapeStyle)]) -> Vec<Face> {
    let mut faces: Vec<(i32, Face)> = patches
        .iter()
        .flat_map(|&(patch, style)| {
            patch.quads().map(move |quad| {
                let points: Vec<_> = quad.iter().map(|&p| to_chart(p)).collect();
                let depth = points.iter().map(|(x, v, d)| coord.projected_depth(x, v, d)).sum::<i32>();
                (depth, (points, style))
            })
        })
        .collect();
    faces.sort_by_key(|(depth, _)| std::cmp::Reverse(*depth));
    faces.into_iter().map(|(_, face)| face).collect()
}
