//! Free-text place search collaborator.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(String),
    #[error("geocoding response did not parse: {0}")]
    Decode(String),
}

/// One place hit, already flattened to what the UI needs.
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeHit {
    pub id: u64,
    pub display_name: String,
    pub category: String,
    pub kind: String,
    pub lat: f64,
    pub lng: f64,
}

/// Place search collaborator.
///
/// The engine debounces calls and absorbs errors into an empty result set;
/// implementations are free to fail loudly through [`GeocodeError`].
pub trait Geocoder {
    fn search(&mut self, query: &str) -> Result<Vec<GeocodeHit>, GeocodeError>;
}

/// Query URL for implementations backed by a Nominatim-style HTTP service.
pub fn search_url(base: &str, query: &str, limit: u32) -> Result<Url, GeocodeError> {
    let mut url = Url::parse(base).map_err(|err| GeocodeError::Request(err.to_string()))?;
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("format", "json")
        .append_pair("limit", &limit.to_string())
        .append_pair("addressdetails", "1");
    Ok(url)
}
