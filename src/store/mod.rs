//! The authoritative polygon collection.

pub mod feature;
pub mod persist;

use log::{debug, warn};

use crate::store::feature::{Feature, Geometry};
use crate::store::persist::{load_features, save_features, BlobStore};

/// Owns the polygon collection and the "current polygon" pointer, and keeps
/// the persisted copy in lockstep: every mutating call writes through the
/// blob-store collaborator before returning.
///
/// Design rule: this is the only writer of the collection. Rendering code
/// gets read-only views.
pub struct PolygonStore {
    backend: Box<dyn BlobStore>,
    key: String,
    features: Vec<Feature>,
    current: Option<Feature>,
}

impl PolygonStore {
    pub fn new(backend: Box<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self { backend, key: key.into(), features: Vec::new(), current: None }
    }

    /// Populate from storage (lenient decode; corrupt entries are dropped).
    pub fn load(&mut self) {
        self.features = load_features(&*self.backend, &self.key);
        debug!("loaded {} stored polygons", self.features.len());
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn current(&self) -> Option<&Feature> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, feature: Option<Feature>) {
        self.current = feature;
    }

    /// Append unless a member already carries structurally identical
    /// geometry. Properties and identifiers play no part in the decision.
    pub fn add(&mut self, feature: Feature) -> bool {
        if self.features.iter().any(|f| f.geometry == feature.geometry) {
            debug!("add skipped: geometrically identical polygon already stored");
            return false;
        }
        self.features.push(feature);
        self.persist();
        true
    }

    /// Replace an existing member in place, preserving collection order.
    ///
    /// Matching prefers identifiers when both sides carry one; otherwise it
    /// compares stored geometry against `previous` (or, when the caller has
    /// no previous version, against the edited feature's own geometry, a
    /// weak fallback that only matches unchanged shapes).
    pub fn edit(&mut self, feature: Feature, previous: Option<&Geometry>) -> bool {
        let index = {
            let target = previous.unwrap_or(&feature.geometry);
            self.features.iter().position(|f| match (&f.id, &feature.id) {
                (Some(stored), Some(edited)) => stored == edited,
                _ => f.geometry == *target,
            })
        };
        match index {
            Some(i) => {
                self.features[i] = feature;
                self.persist();
                true
            }
            None => {
                warn!("edited polygon matched no stored member; collection unchanged");
                false
            }
        }
    }

    /// Deletion by reconciliation: whatever layers the host still renders
    /// become the collection. Fragile if the rendered state ever diverges
    /// from this store; callers must pass the full surviving set.
    pub fn reconcile_deleted(&mut self, remaining: Vec<Feature>) {
        debug!(
            "delete reconciliation: {} -> {} polygons",
            self.features.len(),
            remaining.len()
        );
        self.features = remaining;
        self.current = None;
        self.persist();
    }

    /// Drop everything, including the current-polygon pointer.
    pub fn clear(&mut self) {
        self.features.clear();
        self.current = None;
        self.persist();
    }

    fn persist(&mut self) {
        if !save_features(&mut *self.backend, &self.key, &self.features) {
            warn!("polygon collection not persisted; keeping in-memory copy");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::LngLat;
    use crate::store::persist::StorageError;
    use serde_json::Value;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    type SharedBlobs = Rc<RefCell<HashMap<String, String>>>;

    struct MemoryStore {
        blobs: SharedBlobs,
    }

    impl BlobStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.blobs.borrow().get(key).cloned()
        }

        fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.blobs.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn store_with_blobs() -> (PolygonStore, SharedBlobs) {
        let blobs: SharedBlobs = Rc::new(RefCell::new(HashMap::new()));
        let backend = MemoryStore { blobs: Rc::clone(&blobs) };
        (PolygonStore::new(Box::new(backend), "aoi-polygons"), blobs)
    }

    fn triangle(offset: f64) -> Feature {
        Feature::new(Geometry::Polygon(vec![vec![
            LngLat::new(offset, 0.0),
            LngLat::new(offset + 1.0, 0.0),
            LngLat::new(offset, 1.0),
            LngLat::new(offset, 0.0),
        ]]))
    }

    fn persisted_count(blobs: &SharedBlobs) -> usize {
        let raw = blobs.borrow().get("aoi-polygons").cloned().unwrap();
        serde_json::from_str::<Vec<Value>>(&raw).unwrap().len()
    }

    #[test]
    fn add_suppresses_geometric_duplicates() {
        let (mut store, blobs) = store_with_blobs();
        assert!(store.add(triangle(0.0)));
        assert!(!store.add(triangle(0.0)));
        assert!(store.add(triangle(3.0)));
        assert_eq!(store.len(), 2);
        assert_eq!(persisted_count(&blobs), 2);
    }

    #[test]
    fn near_duplicates_stay_distinct() {
        let (mut store, _) = store_with_blobs();
        assert!(store.add(triangle(0.0)));
        assert!(store.add(triangle(0.0000001)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn edit_matches_by_id_first() {
        let (mut store, _) = store_with_blobs();
        let original = Feature::with_id(
            Geometry::Polygon(vec![vec![
                LngLat::new(0.0, 0.0),
                LngLat::new(1.0, 0.0),
                LngLat::new(0.0, 1.0),
                LngLat::new(0.0, 0.0),
            ]]),
            Value::from("a"),
        );
        store.add(original.clone());
        store.add(triangle(5.0));

        let edited = Feature::with_id(triangle(9.0).geometry, Value::from("a"));
        assert!(store.edit(edited.clone(), None));
        assert_eq!(store.features()[0], edited);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn edit_falls_back_to_previous_geometry() {
        let (mut store, _) = store_with_blobs();
        let before = triangle(0.0);
        store.add(before.clone());

        let after = triangle(2.0);
        assert!(store.edit(after.clone(), Some(&before.geometry)));
        assert_eq!(store.features(), &[after]);
    }

    #[test]
    fn edit_without_match_leaves_collection_alone() {
        let (mut store, _) = store_with_blobs();
        store.add(triangle(0.0));
        assert!(!store.edit(triangle(7.0), None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reconcile_deleted_replaces_the_collection() {
        let (mut store, blobs) = store_with_blobs();
        store.add(triangle(0.0));
        store.add(triangle(2.0));
        store.add(triangle(4.0));
        store.set_current(Some(triangle(0.0)));

        store.reconcile_deleted(vec![triangle(2.0)]);
        assert_eq!(store.len(), 1);
        assert!(store.current().is_none());
        assert_eq!(persisted_count(&blobs), 1);
    }

    #[test]
    fn clear_empties_collection_and_current() {
        let (mut store, blobs) = store_with_blobs();
        store.add(triangle(0.0));
        store.set_current(Some(triangle(0.0)));
        store.clear();
        assert!(store.is_empty());
        assert!(store.current().is_none());
        assert_eq!(persisted_count(&blobs), 0);
    }

    #[test]
    fn load_restores_persisted_polygons() {
        let (mut store, blobs) = store_with_blobs();
        store.add(triangle(0.0));
        store.add(triangle(2.0));

        let backend = MemoryStore { blobs: Rc::clone(&blobs) };
        let mut fresh = PolygonStore::new(Box::new(backend), "aoi-polygons");
        fresh.load();
        assert_eq!(fresh.features(), store.features());
    }
}
