//! Engine: the single writer of all shared state.
//!
//! The host map UI forwards its events into the entry points below and
//! calls [`Engine::tick`] from its frame/idle loop. Everything time-based
//! (debounced view commits, debounced geocoding, batched render passes)
//! advances only inside `tick`, one slice at a time, so no entry point ever
//! blocks the host beyond one synchronous slice.

use log::{debug, warn};

use crate::basemap::TileSource;
use crate::draw::DrawSession;
use crate::geocode::{GeocodeHit, Geocoder};
use crate::geom::cull::{filter_visible, CULL_MIN_POLYGONS};
use crate::geom::{LatLngBounds, LngLat, Ring};
use crate::render::device::MapRenderer;
use crate::render::style::ShapeStyle;
use crate::render::Renderer;
use crate::store::feature::{Feature, Geometry};
use crate::store::persist::BlobStore;
use crate::store::PolygonStore;
use crate::util::config::EngineConfig;
use crate::util::debounce::Debouncer;

/// Pan smaller than this does not count as a view change.
const CENTER_EPSILON_DEG: f64 = 0.0001;

/// Zoom delta smaller than this does not count as a zoom change.
const ZOOM_EPSILON: f64 = 0.1;

/// Zoom applied when flying to a search result.
const SEARCH_RESULT_ZOOM: f64 = 14.0;

/// Map center/zoom, owned by the engine and mutated only through
/// `view_changed` commits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub center: LngLat,
    pub zoom: f64,
}

pub struct Engine {
    device: Box<dyn MapRenderer>,
    geocoder: Box<dyn Geocoder>,
    store: PolygonStore,
    session: DrawSession,
    renderer: Renderer,

    view: ViewState,
    viewport: Option<LatLngBounds>,

    // Visible-set cache, keyed on the last-seen viewport by value.
    visible_cache: Vec<Feature>,
    cached_viewport: Option<LatLngBounds>,

    fallback_source: TileSource,
    on_fallback: bool,

    view_debounce: Debouncer,
    viewport_debounce: Debouncer,
    search_debounce: Debouncer,
    pending_view: Option<ViewState>,
    pending_viewport: Option<LatLngBounds>,
    pending_query: Option<String>,

    search_query: String,
    search_results: Vec<GeocodeHit>,

    render_requested: bool,
}

impl Engine {
    /// Build the engine, load the persisted collection, select the primary
    /// base layer and schedule the first render pass.
    pub fn new(
        config: EngineConfig,
        device: Box<dyn MapRenderer>,
        storage: Box<dyn BlobStore>,
        geocoder: Box<dyn Geocoder>,
    ) -> Self {
        let mut store = PolygonStore::new(storage, config.storage_key.clone());
        store.load();

        let mut engine = Self {
            device,
            geocoder,
            store,
            session: DrawSession::new(),
            renderer: Renderer::new(ShapeStyle::default(), config.batch_size),
            view: ViewState { center: config.center, zoom: config.zoom },
            viewport: None,
            visible_cache: Vec::new(),
            cached_viewport: None,
            fallback_source: config.fallback_source(),
            on_fallback: false,
            view_debounce: Debouncer::new(config.view_debounce_ms),
            viewport_debounce: Debouncer::new(config.viewport_debounce_ms),
            search_debounce: Debouncer::new(config.search_debounce_ms),
            pending_view: None,
            pending_viewport: None,
            pending_query: None,
            search_query: String::new(),
            search_results: Vec::new(),
            render_requested: false,
        };
        let primary = config.primary_source();
        engine.device.set_base_layer(&primary);
        engine.request_render();
        engine
    }

    // ----- drawing -----

    pub fn start_drawing(&mut self) {
        self.session.start();
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    /// Pointer-down on the map. Routed to the draw session while one is
    /// active; ignored otherwise (selection is the host's business).
    pub fn pointer_down(&mut self, p: LngLat) {
        if let Some(ring) = self.session.pointer_down(p) {
            self.commit_ring(ring);
        }
    }

    /// Double-activation (double-click/double-tap).
    pub fn double_click(&mut self) {
        if let Some(ring) = self.session.double_click() {
            self.commit_ring(ring);
        }
    }

    /// External stop signal. A session with enough vertices completes as if
    /// it had been closed explicitly; a shorter one is discarded.
    pub fn stop_drawing(&mut self) {
        if let Some(ring) = self.session.stop() {
            self.commit_ring(ring);
        }
    }

    fn commit_ring(&mut self, ring: Ring) {
        self.shape_created(Feature::new(Geometry::Polygon(vec![ring])));
    }

    // ----- collection events (renderer-raised) -----

    /// A finished shape, from the internal draw session or from the
    /// renderer's own editing tools. Duplicate geometry is suppressed.
    pub fn shape_created(&mut self, feature: Feature) {
        self.store.set_current(Some(feature.clone()));
        if self.store.add(feature) {
            self.collection_changed();
        }
    }

    /// An edited shape. `previous` is the pre-edit geometry when the host
    /// tracked it; without it (and without ids) only unchanged shapes match.
    pub fn shape_edited(&mut self, feature: Feature, previous: Option<&Geometry>) {
        self.store.set_current(Some(feature.clone()));
        if self.store.edit(feature, previous) {
            self.collection_changed();
        }
    }

    /// Delete reconciliation: `remaining` is what the host still renders.
    pub fn shapes_deleted(&mut self, remaining: Vec<Feature>) {
        self.store.reconcile_deleted(remaining);
        self.collection_changed();
    }

    pub fn clear_polygons(&mut self) {
        self.store.clear();
        self.collection_changed();
    }

    fn collection_changed(&mut self) {
        self.invalidate_visible_cache();
        self.request_render();
    }

    // ----- view -----

    /// Pan/zoom report from the renderer. Nothing is committed until the
    /// gesture has been quiet for the configured debounce windows.
    pub fn view_changed(&mut self, center: LngLat, zoom: f64, viewport: LatLngBounds, now_ms: u64) {
        self.pending_view = Some(ViewState { center, zoom });
        self.pending_viewport = Some(viewport);
        self.view_debounce.trigger(now_ms);
        self.viewport_debounce.trigger(now_ms);
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn viewport(&self) -> Option<LatLngBounds> {
        self.viewport
    }

    // ----- base layer -----

    /// Tile load failure. The first one permanently switches to the
    /// fallback source; later ones are the fallback's own problem.
    pub fn tile_error(&mut self) {
        if self.on_fallback {
            return;
        }
        warn!("base layer tile failed, switching to fallback source");
        self.on_fallback = true;
        self.device.set_base_layer(&self.fallback_source);
    }

    pub fn on_fallback_source(&self) -> bool {
        self.on_fallback
    }

    // ----- search -----

    /// Search box input. Whitespace clears results without ever reaching
    /// the geocoder; anything else is debounced.
    pub fn search_input(&mut self, text: &str, now_ms: u64) {
        self.search_query = text.to_string();
        if text.trim().is_empty() {
            self.search_results.clear();
            self.pending_query = None;
            self.search_debounce.cancel();
            return;
        }
        self.pending_query = Some(text.to_string());
        self.search_debounce.trigger(now_ms);
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_results(&self) -> &[GeocodeHit] {
        &self.search_results
    }

    /// Fly to the selected hit. The renderer reports the resulting view
    /// back through `view_changed` like any other move.
    pub fn select_search_result(&mut self, index: usize) {
        let Some(hit) = self.search_results.get(index) else {
            return;
        };
        self.view = ViewState { center: LngLat::new(hit.lng, hit.lat), zoom: SEARCH_RESULT_ZOOM };
        self.search_query = hit.display_name.clone();
        self.search_results.clear();
    }

    // ----- read access -----

    pub fn store(&self) -> &PolygonStore {
        &self.store
    }

    pub fn has_pending_render(&self) -> bool {
        self.render_requested || self.renderer.has_pending()
    }

    // ----- tick -----

    /// Advance debounced work and pump at most one render slice.
    ///
    /// `now_ms` is any monotonic host clock in milliseconds.
    pub fn tick(&mut self, now_ms: u64) {
        if self.view_debounce.fire_if_due(now_ms) {
            if let Some(next) = self.pending_view.take() {
                self.commit_view(next);
            }
        }
        if self.viewport_debounce.fire_if_due(now_ms) {
            if let Some(viewport) = self.pending_viewport.take() {
                self.viewport = Some(viewport);
                self.request_render();
            }
        }
        if self.search_debounce.fire_if_due(now_ms) {
            if let Some(query) = self.pending_query.take() {
                self.run_search(&query);
            }
        }

        if self.render_requested {
            self.render_requested = false;
            self.begin_render_pass();
        } else {
            self.renderer.pump(self.device.as_mut());
        }
    }

    fn commit_view(&mut self, next: ViewState) {
        let moved = (next.center.lng - self.view.center.lng).abs() > CENTER_EPSILON_DEG
            || (next.center.lat - self.view.center.lat).abs() > CENTER_EPSILON_DEG;
        let zoomed = (next.zoom - self.view.zoom).abs() > ZOOM_EPSILON;
        if !moved && !zoomed {
            return;
        }
        self.view = next;
        if zoomed {
            // Simplification tolerance depends on zoom.
            self.request_render();
        }
    }

    fn request_render(&mut self) {
        self.render_requested = true;
    }

    fn begin_render_pass(&mut self) {
        let candidates = self.visible_candidates();
        debug!("render pass over {} candidates at zoom {}", candidates.len(), self.view.zoom);
        self.renderer.begin_pass(candidates, self.view.zoom, self.device.as_mut());
    }

    /// The culled candidate set for the current viewport, cached until the
    /// viewport value or the collection changes.
    fn visible_candidates(&mut self) -> Vec<Feature> {
        if self.store.len() < CULL_MIN_POLYGONS {
            return self.store.features().to_vec();
        }
        let Some(viewport) = self.viewport else {
            return self.store.features().to_vec();
        };
        if self.cached_viewport == Some(viewport) {
            return self.visible_cache.clone();
        }
        let visible = filter_visible(self.store.features(), &viewport);
        self.visible_cache = visible.clone();
        self.cached_viewport = Some(viewport);
        visible
    }

    fn invalidate_visible_cache(&mut self) {
        self.cached_viewport = None;
        self.visible_cache.clear();
    }

    fn run_search(&mut self, query: &str) {
        match self.geocoder.search(query) {
            Ok(hits) => {
                debug!("geocoder returned {} hits for {query:?}", hits.len());
                self.search_results = hits;
            }
            Err(err) => {
                warn!("geocoding failed, showing no results: {err}");
                self.search_results.clear();
            }
        }
    }
}
