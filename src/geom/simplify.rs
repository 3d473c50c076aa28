//! Zoom-driven ring simplification.
//!
//! This is a single-pass local importance filter: each interior vertex is
//! tested against the segment joining its *original* neighbors, not against
//! a shrinking baseline. Weaker than recursive Douglas-Peucker, but O(n),
//! and the output must stay exactly this; do not upgrade the policy.

use crate::geom::LngLat;

/// Simplification is considered at all below this zoom.
pub const SIMPLIFY_MAX_ZOOM: f64 = 12.0;

/// ... and only once the candidate set is larger than this.
pub const SIMPLIFY_MIN_POLYGONS: usize = 50;

/// Whether a render pass should simplify at all.
pub fn should_simplify(zoom: f64, candidate_count: usize) -> bool {
    zoom < SIMPLIFY_MAX_ZOOM && candidate_count > SIMPLIFY_MIN_POLYGONS
}

/// Tolerance step table. Units are decimal degrees, which distorts near the
/// poles; acceptable for the target operating region.
pub fn tolerance_for_zoom(zoom: f64) -> f64 {
    if zoom >= 15.0 {
        0.00001
    } else if zoom >= 12.0 {
        0.0001
    } else if zoom >= 10.0 {
        0.001
    } else {
        0.01
    }
}

/// Drop interior vertices that deviate from their neighbor segment by no
/// more than `tolerance` (strict `>` keeps a vertex).
///
/// The first and last vertex always survive. Rings of two or fewer points
/// come back unchanged.
pub fn simplify_ring(ring: &[LngLat], tolerance: f64) -> Vec<LngLat> {
    if ring.len() <= 2 {
        return ring.to_vec();
    }

    let mut out = Vec::with_capacity(ring.len());
    out.push(ring[0]);
    for i in 1..ring.len() - 1 {
        let d = point_segment_distance(&ring[i], &ring[i - 1], &ring[i + 1]);
        if d > tolerance {
            out.push(ring[i]);
        }
    }
    out.push(ring[ring.len() - 1]);
    out
}

/// Planar distance from `p` to the segment `a`-`b`, clamped to the
/// endpoints. A degenerate segment degrades to point distance.
pub fn point_segment_distance(p: &LngLat, a: &LngLat, b: &LngLat) -> f64 {
    let vx = b.lng - a.lng;
    let vy = b.lat - a.lat;
    let wx = p.lng - a.lng;
    let wy = p.lat - a.lat;

    let len_sq = vx * vx + vy * vy;
    let t = if len_sq != 0.0 { (wx * vx + wy * vy) / len_sq } else { -1.0 };

    let (cx, cy) = if t < 0.0 {
        (a.lng, a.lat)
    } else if t > 1.0 {
        (b.lng, b.lat)
    } else {
        (a.lng + t * vx, a.lat + t * vy)
    };

    let dx = p.lng - cx;
    let dy = p.lat - cy;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<LngLat> {
        points.iter().map(|&(lng, lat)| LngLat::new(lng, lat)).collect()
    }

    #[test]
    fn short_rings_pass_through() {
        let one = ring(&[(0.0, 0.0)]);
        let two = ring(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(simplify_ring(&one, 0.5), one);
        assert_eq!(simplify_ring(&two, 0.5), two);
    }

    #[test]
    fn endpoints_always_survive() {
        let r = ring(&[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0), (1.5, 0.0)]);
        let out = simplify_ring(&r, 10.0);
        assert_eq!(out.first(), r.first());
        assert_eq!(out.last(), r.last());
    }

    #[test]
    fn collinear_interior_points_drop() {
        // Midpoints on a straight line have zero deviation.
        let r = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let out = simplify_ring(&r, 0.0001);
        assert_eq!(out, ring(&[(0.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn deviating_points_survive() {
        let r = ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let out = simplify_ring(&r, 0.5);
        assert_eq!(out, r);
    }

    #[test]
    fn distance_exactly_at_tolerance_is_dropped() {
        // Interior vertex deviates by exactly 1.0 from the neighbor segment.
        let r = ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let out = simplify_ring(&r, 1.0);
        assert_eq!(out, ring(&[(0.0, 0.0), (2.0, 0.0)]));
    }

    #[test]
    fn neighbors_are_taken_from_the_original_ring() {
        // A run of near-collinear points: each is judged against its own
        // original neighbors, so the whole run can drop at once even though
        // the survivors end up far apart.
        let r = ring(&[
            (0.0, 0.0),
            (1.0, 0.001),
            (2.0, 0.0),
            (3.0, 0.001),
            (4.0, 0.0),
        ]);
        let out = simplify_ring(&r, 0.01);
        assert_eq!(out, ring(&[(0.0, 0.0), (4.0, 0.0)]));
    }

    #[test]
    fn tolerance_step_table() {
        assert_eq!(tolerance_for_zoom(18.0), 0.00001);
        assert_eq!(tolerance_for_zoom(15.0), 0.00001);
        assert_eq!(tolerance_for_zoom(13.5), 0.0001);
        assert_eq!(tolerance_for_zoom(12.0), 0.0001);
        assert_eq!(tolerance_for_zoom(10.0), 0.001);
        assert_eq!(tolerance_for_zoom(9.9), 0.01);
        assert_eq!(tolerance_for_zoom(0.0), 0.01);
    }

    #[test]
    fn simplify_gate() {
        assert!(should_simplify(11.9, 51));
        assert!(!should_simplify(12.0, 51));
        assert!(!should_simplify(11.9, 50));
        assert!(!should_simplify(14.0, 500));
    }

    #[test]
    fn degenerate_segment_uses_point_distance() {
        let p = LngLat::new(3.0, 4.0);
        let a = LngLat::new(0.0, 0.0);
        let d = point_segment_distance(&p, &a, &a);
        assert!((d - 5.0).abs() < 1e-12);
    }
}
