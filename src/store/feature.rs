//! GeoJSON-shaped feature model.
//!
//! Structural equality of [`Geometry`] is the primitive used for duplicate
//! suppression and for edit matching when no identifier is present, so the
//! derived `PartialEq` (exact float comparison included) is load-bearing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geom::Ring;

/// Free-form feature properties, insertion-ordered.
pub type Properties = IndexMap<String, Value>;

/// Polygon coordinate payload: outer ring first, then hole rings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// The outer ring of a `Polygon`; `None` for `MultiPolygon`.
    pub fn outer_ring(&self) -> Option<&Ring> {
        match self {
            Geometry::Polygon(rings) => rings.first(),
            Geometry::MultiPolygon(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

/// One polygon record: geometry plus optional identifier and properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    tag: FeatureTag,
    /// Identifiers in the wild are strings or numbers; kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self { tag: FeatureTag::Feature, id: None, geometry, properties: None }
    }

    pub fn with_id(geometry: Geometry, id: Value) -> Self {
        Self { tag: FeatureTag::Feature, id: Some(id), geometry, properties: None }
    }
}
