//! Render pass construction and pumping.

pub mod batch;
pub mod device;
pub mod style;

pub use device::MapRenderer;
pub use style::{ShapeStyle, StyledShape};

use log::debug;

use crate::geom::simplify::{should_simplify, simplify_ring, tolerance_for_zoom};
use crate::render::batch::{BatchRun, BatchStatus, BATCH_ACTIVATION_THRESHOLD};
use crate::store::feature::{Feature, Geometry};

/// Turns a culled candidate set into styled shapes on the device.
///
/// Small sets render synchronously inside `begin_pass`; large sets become a
/// sliced [`BatchRun`] that `pump` advances one slice at a time. Starting a
/// new pass supersedes whatever was in flight: output is idempotent per
/// inputs, so the stale pass is simply dropped.
pub struct Renderer {
    style: ShapeStyle,
    batch_size: usize,
    pass: Option<PassState>,
}

struct PassState {
    run: BatchRun<Feature, StyledShape>,
    simplify: bool,
    tolerance: f64,
}

impl Renderer {
    pub fn new(style: ShapeStyle, batch_size: usize) -> Self {
        Self { style, batch_size, pass: None }
    }

    /// Start a fresh pass over `candidates` at the given zoom.
    ///
    /// Clears the device, then either renders everything in one synchronous
    /// pass (at or below the batching threshold) or queues a sliced run and
    /// processes its first slice.
    pub fn begin_pass(&mut self, candidates: Vec<Feature>, zoom: f64, device: &mut dyn MapRenderer) {
        let simplify = should_simplify(zoom, candidates.len());
        let tolerance = tolerance_for_zoom(zoom);
        device.clear_shapes();

        if candidates.len() > BATCH_ACTIVATION_THRESHOLD {
            debug!(
                "render pass: {} candidates, sliced by {} (simplify: {})",
                candidates.len(),
                self.batch_size,
                simplify
            );
            self.pass = Some(PassState {
                run: BatchRun::new(candidates, self.batch_size),
                simplify,
                tolerance,
            });
            self.pump(device);
        } else {
            let style = self.style;
            let run = BatchRun::new(candidates, self.batch_size);
            let shapes = run.run_to_completion(&mut |f| build_shape(f, style, simplify, tolerance));
            device.draw_shapes(&shapes);
            self.pass = None;
        }
    }

    /// Advance the in-flight pass by one slice and emit its results.
    /// Returns true while more slices remain.
    pub fn pump(&mut self, device: &mut dyn MapRenderer) -> bool {
        let Some(pass) = self.pass.as_mut() else {
            return false;
        };
        let style = self.style;
        let simplify = pass.simplify;
        let tolerance = pass.tolerance;
        let status = pass.run.run_slice(&mut |f| build_shape(f, style, simplify, tolerance));
        device.draw_shapes(pass.run.last_slice());

        if status == BatchStatus::Done {
            debug!(
                "render pass complete: {} shapes, {} skipped",
                pass.run.results().len(),
                pass.run.failure_count()
            );
            self.pass = None;
            false
        } else {
            true
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pass.is_some()
    }
}

/// The per-item transform step: attach the style, simplifying the outer
/// ring when the pass calls for it.
///
/// Hole rings are dropped while simplification is active; they are not
/// visible at the zoom levels that enable it. `MultiPolygon` geometries
/// pass through untouched.
fn build_shape(
    feature: &Feature,
    style: ShapeStyle,
    simplify: bool,
    tolerance: f64,
) -> Result<StyledShape, String> {
    let geometry = match &feature.geometry {
        Geometry::Polygon(rings) => {
            let outer = rings.first().ok_or_else(|| "polygon has no outer ring".to_string())?;
            if simplify {
                Geometry::Polygon(vec![simplify_ring(outer, tolerance)])
            } else {
                feature.geometry.clone()
            }
        }
        Geometry::MultiPolygon(_) => feature.geometry.clone(),
    };
    Ok(StyledShape { geometry, style })
}
