//! Engine tuning knobs.
//!
//! Hosts may override defaults from `key = value` text (`#` starts a
//! comment). Unknown keys and unparseable values keep their defaults; a
//! config file can never prevent startup.

use crate::basemap::TileSource;
use crate::geom::LngLat;
use crate::render::batch::DEFAULT_BATCH_SIZE;
use crate::store::persist::DEFAULT_STORAGE_KEY;

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Initial map center.
    pub center: LngLat,
    /// Initial zoom level.
    pub zoom: f64,
    /// Slice size for batched render passes.
    pub batch_size: usize,
    /// Storage key for the persisted polygon collection.
    pub storage_key: String,
    pub wms_base_url: String,
    pub wms_layers: String,
    /// XYZ template used when the WMS source fails.
    pub fallback_tile_template: String,
    /// Quiet period before the geocoder is called.
    pub search_debounce_ms: u64,
    /// Quiet period before the visible set is recomputed and re-rendered.
    pub viewport_debounce_ms: u64,
    /// Quiet period before a pan/zoom is committed to the view state.
    pub view_debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            center: LngLat::new(7.5, 51.5),
            zoom: 10.0,
            batch_size: DEFAULT_BATCH_SIZE,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            wms_base_url: "https://www.wms.nrw.de/geobasis/wms_nw_dop".to_string(),
            wms_layers: "nw_dop".to_string(),
            fallback_tile_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            search_debounce_ms: 300,
            viewport_debounce_ms: 300,
            view_debounce_ms: 150,
        }
    }
}

impl EngineConfig {
    /// Parse overrides from config text.
    pub fn from_text(text: &str) -> Self {
        let mut cfg = Self::default();
        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();
            match key.to_ascii_lowercase().as_str() {
                "center_lng" => {
                    if let Ok(v) = value.parse() {
                        cfg.center.lng = v;
                    }
                }
                "center_lat" => {
                    if let Ok(v) = value.parse() {
                        cfg.center.lat = v;
                    }
                }
                "zoom" => {
                    if let Ok(v) = value.parse::<f64>() {
                        if v >= 0.0 {
                            cfg.zoom = v;
                        }
                    }
                }
                "batch_size" => {
                    if let Ok(v) = value.parse::<usize>() {
                        if v >= 1 {
                            cfg.batch_size = v;
                        }
                    }
                }
                "storage_key" => {
                    if !value.is_empty() {
                        cfg.storage_key = value.to_string();
                    }
                }
                "wms_base_url" => {
                    if !value.is_empty() {
                        cfg.wms_base_url = value.to_string();
                    }
                }
                "wms_layers" => {
                    if !value.is_empty() {
                        cfg.wms_layers = value.to_string();
                    }
                }
                "fallback_tile_template" => {
                    if !value.is_empty() {
                        cfg.fallback_tile_template = value.to_string();
                    }
                }
                _ => {}
            }
        }
        cfg
    }

    pub fn primary_source(&self) -> TileSource {
        TileSource::wms(self.wms_base_url.clone(), self.wms_layers.clone())
    }

    pub fn fallback_source(&self) -> TileSource {
        TileSource::xyz(self.fallback_tile_template.clone())
    }
}
