//! Shared geographic value types.
//!
//! Design rule: everything in `geom/*` is pure. No collaborator types,
//! no logging, no I/O.

pub mod cull;
pub mod simplify;

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters, matching the host map's distance function.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic position. Serializes as a GeoJSON `[lng, lat]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Great-circle distance in meters (haversine on a spherical earth).
    pub fn distance_m(&self, other: &LngLat) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(p: [f64; 2]) -> Self {
        Self { lng: p[0], lat: p[1] }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

/// An ordered, implicitly-closed sequence of positions bounding a polygon
/// or a hole.
pub type Ring = Vec<LngLat>;

/// The rectangular geographic extent currently visible.
///
/// Compared by value: two bounds are "the same viewport" exactly when all
/// four edges are bit-equal, never when they are the same allocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLngBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl LatLngBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Closed-interval axis-aligned intersection test.
    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// Grow to cover `p`.
    pub fn extend(&mut self, p: &LngLat) {
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
    }

    /// Degenerate bounds covering a single position.
    pub fn from_point(p: &LngLat) -> Self {
        Self { west: p.lng, south: p.lat, east: p.lng, north: p.lat }
    }
}
