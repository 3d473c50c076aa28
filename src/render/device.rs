use crate::basemap::TileSource;
use crate::render::style::StyledShape;

/// Map rendering collaborator.
///
/// Design rule: only implementations of this trait touch the actual map
/// widget. The engine hands over styled geometry and base-layer choices;
/// tile fetching, projection and pixel work stay on the other side.
///
/// Implementations also raise the interaction events (pointer, draw
/// lifecycle, view changes, tile errors) that the host wires back into the
/// engine's entry points.
pub trait MapRenderer {
    /// Select the base tile source. Called once at startup and again if the
    /// primary source fails.
    fn set_base_layer(&mut self, source: &TileSource);

    /// Remove every drawn shape ahead of a fresh pass.
    fn clear_shapes(&mut self);

    /// Draw a batch of shapes. During a sliced pass this is called once per
    /// slice, in input order, so large collections appear incrementally.
    fn draw_shapes(&mut self, shapes: &[StyledShape]);
}
