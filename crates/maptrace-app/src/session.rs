//! Map annotation session: the owning object behind the UI command surface.
//!
//! All mutation happens on the caller's thread in response to discrete
//! input events; the only outbound work is the geocoding lookup, which
//! suspends nothing but the search panel.

use log::{info, warn};
use maptrace_core::features::FeatureId;
use maptrace_core::geo::LatLng;
use maptrace_core::metrics;
use maptrace_core::persist;
use maptrace_core::storage::{STORAGE_KEY, StorageSlot};
use maptrace_core::store::FeatureStore;
use maptrace_core::tools::{DrawController, ToolKind};
use maptrace_core::viewport::Viewport;
use maptrace_core::Geometry;
use maptrace_geocode::{GeocodeClient, GeocodeError};

use crate::confirm::ConfirmPrompt;
use crate::search::{SEARCH_RESULT_ZOOM, SearchMarker, SearchPanel};

/// Zoom cap when fitting the view to a selected shape.
pub const FIT_MAX_ZOOM: u8 = 16;

/// Zoom used when centering on a selected marker.
pub const MARKER_ZOOM: u8 = 15;

/// One user session over the map.
///
/// Owns the feature store, drawing controller, viewport, storage slot, and
/// search state; every mutating command persists the store before returning.
pub struct MapSession<S, C> {
    store: FeatureStore,
    tools: DrawController,
    pub viewport: Viewport,
    storage: S,
    confirm: C,
    geocoder: GeocodeClient,
    search_panel: SearchPanel,
    search_marker: Option<SearchMarker>,
    status: Option<String>,
}

impl<S: StorageSlot, C: ConfirmPrompt> MapSession<S, C> {
    /// Create a session, restoring any previously saved drawings.
    pub fn new(storage: S, confirm: C) -> Self {
        Self::with_geocoder(storage, confirm, GeocodeClient::new())
    }

    pub fn with_geocoder(storage: S, confirm: C, geocoder: GeocodeClient) -> Self {
        let mut session = Self {
            store: FeatureStore::new(),
            tools: DrawController::new(),
            viewport: Viewport::default(),
            storage,
            confirm,
            geocoder,
            search_panel: SearchPanel::default(),
            search_marker: None,
            status: None,
        };
        session.restore();
        session
    }

    /// Restore drawings from the storage slot. A missing or unreadable slot
    /// degrades to an empty store.
    fn restore(&mut self) {
        let blob = match self.storage.read(STORAGE_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return,
            Err(e) => {
                warn!("failed to read stored drawings: {e}");
                return;
            }
        };
        let features = persist::decode(&blob);
        let count = features.len();
        for feature in features {
            self.store.insert(feature);
        }
        if count > 0 {
            info!("restored {count} saved drawings");
            self.status = Some(format!("Loaded {count} saved drawing(s)."));
        }
    }

    /// Write the store to the storage slot. Failures are logged, never
    /// surfaced to the user.
    fn persist(&mut self) {
        let blob = persist::encode(self.store.features());
        if let Err(e) = self.storage.write(STORAGE_KEY, &blob) {
            warn!("failed to save drawings: {e}");
        }
    }

    // --- drawing commands -------------------------------------------------

    /// Arm one of the five creation tools.
    pub fn activate_tool(&mut self, kind: ToolKind) {
        self.tools.activate(kind);
        self.status = Some("Drawing... Click on the map to start.".to_string());
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.tools.active_tool()
    }

    /// Route a map click: an armed tool consumes it, otherwise it selects
    /// the clicked feature or deselects on empty ground.
    pub fn map_click(&mut self, point: LatLng) {
        if self.tools.is_active() {
            if let Some(geometry) = self.tools.add_point(point) {
                self.feature_created(geometry);
            }
            return;
        }

        // a feature click claims the point before empty-click deselection
        if self.store.select_at(point).is_none() {
            self.store.deselect_if_empty_click(point);
        }
        self.status = None;
    }

    /// Complete an in-progress line or polygon gesture.
    pub fn finish_drawing(&mut self) -> Option<FeatureId> {
        let geometry = self.tools.finish()?;
        Some(self.feature_created(geometry))
    }

    fn feature_created(&mut self, geometry: Geometry) -> FeatureId {
        let id = self.store.add(geometry);
        self.persist();
        self.status = None;
        id
    }

    // --- selection commands -----------------------------------------------

    /// Fit the view to the selected feature, or prompt if nothing is
    /// selected.
    pub fn zoom_to_selection(&mut self) {
        let Some(feature) = self.store.selected() else {
            self.status = Some("Please select an area first by clicking on it.".to_string());
            return;
        };
        match &feature.geometry {
            Geometry::Marker(position) => self.viewport.set_view(*position, MARKER_ZOOM),
            geometry => self.viewport.fit_bounds(geometry.bounds(), FIT_MAX_ZOOM),
        }
        self.status = Some("Zoomed to selected area!".to_string());
    }

    /// Delete the selected feature, behind a confirmation prompt.
    pub fn delete_selected(&mut self) {
        if self.store.selected_id().is_none() {
            self.status = Some("Please select a feature to delete first.".to_string());
            return;
        }
        if !self
            .confirm
            .confirm("Are you sure you want to delete this drawing?")
        {
            return;
        }
        match self.store.remove_selected() {
            Ok(_) => {
                self.persist();
                self.status = Some("Drawing deleted.".to_string());
            }
            Err(e) => warn!("delete failed: {e}"),
        }
    }

    /// Delete every drawing and erase the storage slot, behind a
    /// confirmation prompt.
    pub fn clear_all(&mut self) {
        if !self
            .confirm
            .confirm("Are you sure you want to clear all drawn areas?")
        {
            return;
        }
        self.store.clear();
        // erase the slot entirely, not an empty array
        if let Err(e) = self.storage.erase(STORAGE_KEY) {
            warn!("failed to erase stored drawings: {e}");
        }
        self.status = Some("All areas cleared.".to_string());
    }

    // --- search -----------------------------------------------------------

    /// Run a geocoding search and update the search panel.
    pub fn search(&mut self, query: &str) {
        self.search_panel = match self.geocoder.search(query) {
            Ok(places) if places.is_empty() => {
                SearchPanel::NoResults("No results found. Try a different search term.".to_string())
            }
            Ok(places) => SearchPanel::Results(places),
            Err(GeocodeError::EmptyQuery) => {
                SearchPanel::Prompt("Please enter a search term".to_string())
            }
            Err(e) => {
                warn!("search failed: {e}");
                SearchPanel::NoResults("Error searching. Please try again.".to_string())
            }
        };
    }

    /// Jump to one of the current search results: drop the search marker,
    /// open its popup text, and recenter the map.
    pub fn choose_result(&mut self, index: usize) {
        let (marker, status) = {
            let SearchPanel::Results(places) = &self.search_panel else {
                return;
            };
            let Some(place) = places.get(index) else {
                return;
            };
            (
                SearchMarker::for_place(place),
                format!("Found: {}", place.display_name),
            )
        };
        self.viewport.set_view(marker.position, SEARCH_RESULT_ZOOM);
        self.search_marker = Some(marker);
        self.status = Some(status);
        self.search_panel = SearchPanel::Idle;
    }

    // --- read side ---------------------------------------------------------

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn search_panel(&self) -> &SearchPanel {
        &self.search_panel
    }

    pub fn search_marker(&self) -> Option<&SearchMarker> {
        self.search_marker.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Lines for the info panel: a transient status message if one is
    /// pending, otherwise count and selection metrics.
    pub fn panel_lines(&self) -> Vec<String> {
        if let Some(status) = &self.status {
            return vec![status.clone()];
        }
        metrics::panel_lines(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysConfirm, NeverConfirm};
    use maptrace_core::features::FeatureKind;
    use maptrace_core::storage::MemoryStorage;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn session<C: ConfirmPrompt>(
        storage: &MemoryStorage,
        confirm: C,
    ) -> MapSession<&MemoryStorage, C> {
        init_logging();
        // unroutable endpoint so no test touches the real service
        MapSession::with_geocoder(
            storage,
            confirm,
            GeocodeClient::with_endpoint("http://127.0.0.1:1/search"),
        )
    }

    fn draw_marker<S: StorageSlot, C: ConfirmPrompt>(
        session: &mut MapSession<S, C>,
        lat: f64,
        lng: f64,
    ) {
        session.activate_tool(ToolKind::Marker);
        session.map_click(LatLng::new(lat, lng));
    }

    #[test]
    fn test_draw_creates_and_persists() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);

        draw_marker(&mut session, 40.0, -74.0);
        assert_eq!(session.store().len(), 1);
        // one-shot tool: disarmed after creation
        assert_eq!(session.active_tool(), None);
        // persisted immediately
        assert!(storage.read(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_features_survive_a_session_restart() {
        let storage = MemoryStorage::new();
        {
            let mut first = session(&storage, AlwaysConfirm);
            draw_marker(&mut first, 40.0, -74.0);
            first.activate_tool(ToolKind::Circle);
            first.map_click(LatLng::new(10.0, 10.0));
            first.map_click(LatLng::new(10.01, 10.0));
            assert_eq!(first.store().len(), 2);
        }

        let second = session(&storage, AlwaysConfirm);
        assert_eq!(second.store().len(), 2);
        let kinds: Vec<_> = second.store().iter().map(|f| f.kind()).collect();
        assert_eq!(kinds, vec![FeatureKind::Marker, FeatureKind::Circle]);
        assert_eq!(
            second.status(),
            Some("Loaded 2 saved drawing(s).")
        );
    }

    #[test]
    fn test_click_selects_and_empty_click_deselects() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);

        draw_marker(&mut session, 40.0, -74.0);
        let id = session.store().features()[0].id;

        session.map_click(LatLng::new(40.0, -74.0));
        assert_eq!(session.store().selected_id(), Some(id));

        // far away: nothing claims the click, selection clears
        session.map_click(LatLng::new(0.0, 0.0));
        assert_eq!(session.store().selected_id(), None);
    }

    #[test]
    fn test_delete_selected_requires_selection() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        draw_marker(&mut session, 40.0, -74.0);

        session.delete_selected();
        assert_eq!(session.store().len(), 1);
        assert_eq!(
            session.status(),
            Some("Please select a feature to delete first.")
        );
    }

    #[test]
    fn test_delete_selected_removes_and_persists() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        draw_marker(&mut session, 40.0, -74.0);
        draw_marker(&mut session, 41.0, -74.0);

        session.map_click(LatLng::new(41.0, -74.0));
        session.delete_selected();

        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().selected_id(), None);
        let blob = storage.read(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(persist::decode(&blob).len(), 1);
    }

    #[test]
    fn test_declined_confirmation_changes_nothing() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, NeverConfirm);
        draw_marker(&mut session, 40.0, -74.0);
        session.map_click(LatLng::new(40.0, -74.0));

        session.delete_selected();
        assert_eq!(session.store().len(), 1);

        session.clear_all();
        assert_eq!(session.store().len(), 1);
        assert!(storage.read(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_clear_all_erases_the_slot() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        draw_marker(&mut session, 40.0, -74.0);
        assert!(storage.read(STORAGE_KEY).unwrap().is_some());

        session.clear_all();
        assert!(session.store().is_empty());
        // the slot is absent, not an empty array
        assert_eq!(storage.read(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_zoom_to_selection_without_selection_prompts() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        let before = session.viewport;

        session.zoom_to_selection();
        assert_eq!(session.viewport, before);
        assert_eq!(
            session.status(),
            Some("Please select an area first by clicking on it.")
        );
    }

    #[test]
    fn test_zoom_to_selected_marker() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        draw_marker(&mut session, 48.8584, 2.2945);
        session.map_click(LatLng::new(48.8584, 2.2945));

        session.zoom_to_selection();
        assert_eq!(session.viewport.center, LatLng::new(48.8584, 2.2945));
        assert_eq!(session.viewport.zoom, MARKER_ZOOM);
    }

    #[test]
    fn test_zoom_to_selected_rectangle_caps_zoom() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        session.activate_tool(ToolKind::Rectangle);
        session.map_click(LatLng::new(0.0, 0.0));
        session.map_click(LatLng::new(0.001, 0.001));
        session.map_click(LatLng::new(0.0005, 0.0005));

        session.zoom_to_selection();
        assert!(session.viewport.zoom <= FIT_MAX_ZOOM);
        assert_eq!(session.viewport.center, LatLng::new(0.0005, 0.0005));
    }

    #[test]
    fn test_polyline_drawn_via_finish() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);

        session.activate_tool(ToolKind::Line);
        session.map_click(LatLng::new(0.0, 0.0));
        session.map_click(LatLng::new(1.0, 0.0));
        let id = session.finish_drawing().unwrap();

        assert_eq!(session.store().get(id).unwrap().kind(), FeatureKind::Line);
        assert_eq!(session.finish_drawing(), None);
    }

    #[test]
    fn test_empty_search_prompts_without_network() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);

        session.search("   ");
        assert_eq!(
            *session.search_panel(),
            SearchPanel::Prompt("Please enter a search term".to_string())
        );
    }

    #[test]
    fn test_failed_search_reports_no_results() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);

        session.search("new york");
        assert_eq!(
            *session.search_panel(),
            SearchPanel::NoResults("Error searching. Please try again.".to_string())
        );
    }

    #[test]
    fn test_choose_result_drops_marker_and_recenters() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        session.search_panel = SearchPanel::Results(vec![maptrace_geocode::Place {
            display_name: "New York, United States".to_string(),
            lat: 40.7127281,
            lon: -74.0060152,
        }]);

        session.choose_result(0);
        assert_eq!(session.viewport.zoom, SEARCH_RESULT_ZOOM);
        assert_eq!(
            session.viewport.center,
            LatLng::new(40.7127281, -74.0060152)
        );
        let marker = session.search_marker().unwrap();
        assert!(marker.popup.contains("New York"));
        assert_eq!(*session.search_panel(), SearchPanel::Idle);
        assert_eq!(session.status(), Some("Found: New York, United States"));
        // search markers never enter the feature store
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_choose_result_out_of_range_is_ignored() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);
        session.choose_result(3);
        assert_eq!(session.search_marker(), None);
    }

    #[test]
    fn test_panel_shows_metrics_after_status_clears() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage, AlwaysConfirm);

        session.activate_tool(ToolKind::Marker);
        assert_eq!(
            session.panel_lines(),
            vec!["Drawing... Click on the map to start.".to_string()]
        );

        session.map_click(LatLng::new(40.0, -74.0));
        let lines = session.panel_lines();
        assert_eq!(lines[0], "Total areas drawn: 1");
    }
}
