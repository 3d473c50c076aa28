//! Base-layer tile sources.
//!
//! Tile fetching and drawing belong to the map renderer; this module only
//! describes *where* tiles come from and builds the request URLs, so a
//! renderer implementation stays free of WMS details.

use std::f64::consts::PI;

use url::Url;

/// WGS84 semi-major axis, the Web-Mercator sphere radius.
const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Web-Mercator bounding box in meters: `[min_x, min_y, max_x, max_y]`.
pub type MercatorBbox = [f64; 4];

#[derive(Clone, Debug, PartialEq)]
pub enum TileSource {
    /// A WMS GetMap endpoint (the primary imagery source).
    Wms { base_url: String, layers: String, format: String },
    /// Slippy-map `{z}/{x}/{y}` tiles (the fallback source).
    Xyz { url_template: String },
}

impl TileSource {
    pub fn wms(base_url: impl Into<String>, layers: impl Into<String>) -> Self {
        TileSource::Wms {
            base_url: base_url.into(),
            layers: layers.into(),
            format: "image/jpeg".to_string(),
        }
    }

    pub fn xyz(url_template: impl Into<String>) -> Self {
        TileSource::Xyz { url_template: url_template.into() }
    }

    /// Request URL for one 256x256 tile at slippy coordinates.
    ///
    /// `None` when the configured base URL does not parse.
    pub fn tile_url(&self, x: u32, y: u32, z: u8) -> Option<String> {
        match self {
            TileSource::Wms { base_url, layers, format } => {
                let bbox = tile_to_web_mercator(x, y, z);
                wms_getmap_url(base_url, layers, format, bbox, 256, 256)
                    .ok()
                    .map(|url| url.to_string())
            }
            TileSource::Xyz { url_template } => Some(
                url_template
                    .replace("{z}", &z.to_string())
                    .replace("{x}", &x.to_string())
                    .replace("{y}", &y.to_string()),
            ),
        }
    }
}

/// Web-Mercator bounds of a slippy tile.
pub fn tile_to_web_mercator(x: u32, y: u32, z: u8) -> MercatorBbox {
    let n = 2f64.powi(z as i32);
    let circumference = 2.0 * PI * MERCATOR_RADIUS_M;

    let min_lon = (x as f64 / n) * 360.0 - 180.0;
    let max_lon = ((x as f64 + 1.0) / n) * 360.0 - 180.0;
    let min_x = (min_lon / 360.0) * circumference;
    let max_x = (max_lon / 360.0) * circumference;

    // Tile y grows southward.
    let min_lat_rad = (PI * (1.0 - 2.0 * (y as f64 + 1.0) / n)).sinh().atan();
    let max_lat_rad = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan();
    let min_y = (PI / 4.0 + min_lat_rad / 2.0).tan().ln() * MERCATOR_RADIUS_M;
    let max_y = (PI / 4.0 + max_lat_rad / 2.0).tan().ln() * MERCATOR_RADIUS_M;

    [min_x, min_y, max_x, max_y]
}

/// Build a WMS 1.1.1 GetMap URL in EPSG:3857.
pub fn wms_getmap_url(
    base_url: &str,
    layers: &str,
    format: &str,
    bbox: MercatorBbox,
    width: u32,
    height: u32,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut()
        .append_pair("SERVICE", "WMS")
        .append_pair("REQUEST", "GetMap")
        .append_pair("VERSION", "1.1.1")
        .append_pair("LAYERS", layers)
        .append_pair("STYLES", "")
        .append_pair("FORMAT", format)
        .append_pair("TRANSPARENT", "FALSE")
        .append_pair("SRS", "EPSG:3857")
        .append_pair("WIDTH", &width.to_string())
        .append_pair("HEIGHT", &height.to_string())
        .append_pair("BBOX", &format!("{},{},{},{}", bbox[0], bbox[1], bbox[2], bbox[3]));
    Ok(url)
}
