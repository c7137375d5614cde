//! Feature store with a single selection pointer.

use crate::features::{Feature, FeatureId, FeatureStyle, Geometry};
use crate::geo::LatLng;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no feature with id {0}")]
    NotFound(FeatureId),
    #[error("no feature is selected")]
    NothingSelected,
}

/// Ordered collection of drawn features (insertion order = draw order) with
/// at most one selected feature.
///
/// Invariant: `selected` always references a feature currently in the store.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<Feature>,
    selected: Option<FeatureId>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new feature with a fresh id. Always succeeds.
    pub fn add(&mut self, geometry: Geometry) -> FeatureId {
        let feature = Feature::new(geometry);
        let id = feature.id;
        self.features.push(feature);
        id
    }

    /// Append an already-identified feature (used when restoring a saved
    /// record, so ids stay stable across reloads).
    pub fn insert(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Select a feature, restyling the previous selection back to normal.
    ///
    /// Selecting the current selection only re-asserts its style.
    pub fn select(&mut self, id: FeatureId) -> Result<(), StoreError> {
        if !self.features.iter().any(|f| f.id == id) {
            return Err(StoreError::NotFound(id));
        }
        if let Some(prev) = self.selected {
            if prev != id {
                if let Some(f) = self.feature_mut(prev) {
                    f.style = FeatureStyle::normal();
                }
            }
        }
        self.selected = Some(id);
        if let Some(f) = self.feature_mut(id) {
            f.style = FeatureStyle::selected();
        }
        Ok(())
    }

    /// Clear the selection, restoring the feature's normal style.
    pub fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            if let Some(f) = self.feature_mut(id) {
                f.style = FeatureStyle::normal();
            }
        }
    }

    /// Clear the selection if a click at `point` is not claimed by any
    /// feature. Returns `true` if the selection was cleared.
    ///
    /// The click is hit-tested synchronously; a feature click goes through
    /// `feature_at` + `select` and claims the point before this runs.
    pub fn deselect_if_empty_click(&mut self, point: LatLng) -> bool {
        if self.selected.is_none() {
            return false;
        }
        if self.features.iter().any(|f| f.geometry.claims_click(point)) {
            return false;
        }
        self.deselect();
        true
    }

    /// Select the topmost feature claiming a click at `point`, if any.
    pub fn select_at(&mut self, point: LatLng) -> Option<FeatureId> {
        let id = self.feature_at(point)?;
        // the id comes from the live feature list, so select cannot miss
        self.select(id).ok()?;
        Some(id)
    }

    /// Topmost feature claiming a click at `point` (last drawn wins).
    pub fn feature_at(&self, point: LatLng) -> Option<FeatureId> {
        self.features
            .iter()
            .rev()
            .find(|f| f.geometry.claims_click(point))
            .map(|f| f.id)
    }

    /// Remove a feature, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: FeatureId) -> Result<Feature, StoreError> {
        let pos = self
            .features
            .iter()
            .position(|f| f.id == id)
            .ok_or(StoreError::NotFound(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.features.remove(pos))
    }

    /// Remove the selected feature, or report that nothing is selected.
    pub fn remove_selected(&mut self) -> Result<Feature, StoreError> {
        let id = self.selected.ok_or(StoreError::NothingSelected)?;
        self.remove(id)
    }

    /// Remove every feature and clear the selection.
    pub fn clear(&mut self) {
        self.features.clear();
        self.selected = None;
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    fn feature_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    pub fn selected_id(&self) -> Option<FeatureId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Feature> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
