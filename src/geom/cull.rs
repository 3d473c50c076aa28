//! Viewport culling.
//!
//! Inclusion is a bounding-box test against the viewport rectangle, not an
//! exact polygon intersection. False positives render harmlessly, false
//! negatives would drop visible shapes.

use crate::geom::LatLngBounds;
use crate::store::feature::{Feature, Geometry};

/// Below this collection size the filter is a pass-through; scanning would
/// cost more than it saves.
pub const CULL_MIN_POLYGONS: usize = 100;

/// Axis-aligned bounds of a polygon's outer ring.
///
/// `MultiPolygon` geometries yield `None`: the filter only evaluates
/// `Polygon` features. A known limitation, kept.
pub fn outer_ring_bounds(geometry: &Geometry) -> Option<LatLngBounds> {
    let ring = geometry.outer_ring()?;
    let mut points = ring.iter();
    let mut bounds = LatLngBounds::from_point(points.next()?);
    for p in points {
        bounds.extend(p);
    }
    Some(bounds)
}

/// Whether a feature's outer-ring bounds overlap the viewport.
pub fn is_visible(feature: &Feature, viewport: &LatLngBounds) -> bool {
    match outer_ring_bounds(&feature.geometry) {
        Some(bounds) => bounds.intersects(viewport),
        None => false,
    }
}

/// Keep the features whose bounds overlap `viewport`, in input order.
///
/// Collections under [`CULL_MIN_POLYGONS`] come back unchanged.
pub fn filter_visible(features: &[Feature], viewport: &LatLngBounds) -> Vec<Feature> {
    if features.len() < CULL_MIN_POLYGONS {
        return features.to_vec();
    }
    features
        .iter()
        .filter(|f| is_visible(f, viewport))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::LngLat;

    fn square(lng: f64, lat: f64, size: f64) -> Feature {
        Feature::new(Geometry::Polygon(vec![vec![
            LngLat::new(lng, lat),
            LngLat::new(lng + size, lat),
            LngLat::new(lng + size, lat + size),
            LngLat::new(lng, lat + size),
            LngLat::new(lng, lat),
        ]]))
    }

    #[test]
    fn small_collections_bypass_the_filter() {
        let features: Vec<Feature> = (0..99).map(|i| square(i as f64, 0.0, 0.5)).collect();
        let viewport = LatLngBounds::new(1000.0, 1000.0, 1001.0, 1001.0);
        let out = filter_visible(&features, &viewport);
        assert_eq!(out, features);
    }

    #[test]
    fn large_collections_are_culled_in_order() {
        let mut features: Vec<Feature> = (0..100).map(|i| square(i as f64 * 2.0, 0.0, 0.5)).collect();
        features.push(square(0.25, 0.25, 0.1)); // inside the viewport too
        let viewport = LatLngBounds::new(0.0, 0.0, 3.0, 3.0);
        let out = filter_visible(&features, &viewport);
        // Squares at lng 0 and 2 intersect, plus the tiny one appended last.
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], features[0]);
        assert_eq!(out[1], features[1]);
        assert_eq!(out[2], features[100]);
    }

    #[test]
    fn offscreen_bbox_is_excluded() {
        let viewport = LatLngBounds::new(0.0, 0.0, 1.0, 1.0);
        assert!(!is_visible(&square(5.0, 5.0, 0.5), &viewport));
        assert!(is_visible(&square(0.2, 0.2, 0.5), &viewport));
    }

    #[test]
    fn multipolygon_is_treated_as_not_visible() {
        let f = Feature::new(Geometry::MultiPolygon(vec![vec![vec![
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(1.0, 1.0),
        ]]]));
        let viewport = LatLngBounds::new(-1.0, -1.0, 2.0, 2.0);
        assert!(!is_visible(&f, &viewport));
    }

    #[test]
    fn empty_outer_ring_is_not_visible() {
        let f = Feature::new(Geometry::Polygon(vec![]));
        let viewport = LatLngBounds::new(-1.0, -1.0, 1.0, 1.0);
        assert!(!is_visible(&f, &viewport));
    }
}
