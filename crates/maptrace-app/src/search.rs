//! Search panel state and result selection.

use maptrace_core::geo::LatLng;
use maptrace_geocode::Place;

/// Zoom applied when jumping to a chosen search result.
pub const SEARCH_RESULT_ZOOM: u8 = 14;

/// State of the search results panel.
///
/// Zero hits and transport failures both land in `NoResults`; the user is
/// told to try again either way.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchPanel {
    #[default]
    Idle,
    /// The user needs to type something first.
    Prompt(String),
    Results(Vec<Place>),
    NoResults(String),
}

impl SearchPanel {
    /// Lines the shell renders for the panel: one compact label per result,
    /// the pending message, or nothing when idle.
    pub fn lines(&self) -> Vec<String> {
        match self {
            SearchPanel::Idle => Vec::new(),
            SearchPanel::Prompt(msg) | SearchPanel::NoResults(msg) => vec![msg.clone()],
            SearchPanel::Results(places) => places
                .iter()
                .map(|place| place.short_name().to_string())
                .collect(),
        }
    }
}

/// Marker dropped on a chosen search result. Lives outside the feature
/// store: it is not drawn, selected, or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMarker {
    pub position: LatLng,
    /// Popup text: full place name plus 6-decimal coordinates.
    pub popup: String,
}

impl SearchMarker {
    pub fn for_place(place: &Place) -> Self {
        Self {
            position: LatLng::new(place.lat, place.lon),
            popup: format!(
                "{}\nLat: {:.6}, Lon: {:.6}",
                place.display_name, place.lat, place.lon
            ),
        }
    }
}
