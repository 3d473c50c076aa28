use crate::store::feature::Geometry;

/// Fixed stroke/fill parameters for drawn areas. One style serves every
/// polygon; per-feature styling is not a concern of this pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
    pub stroke_color: [u8; 3],
    pub stroke_weight: f32,
    pub stroke_opacity: f32,
    pub fill_color: [u8; 3],
    pub fill_opacity: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: [0x3b, 0x82, 0xf6],
            stroke_weight: 2.0,
            stroke_opacity: 0.8,
            fill_color: [0x3b, 0x82, 0xf6],
            fill_opacity: 0.2,
        }
    }
}

/// One drawable unit handed to the map renderer: already culled, already
/// simplified for the current zoom.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledShape {
    pub geometry: Geometry,
    pub style: ShapeStyle,
}
