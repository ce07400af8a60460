use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Event record as delivered by the backend
///
/// Only `id`, `category`, `lat` and `lng` matter for clustering; the rest is
/// carried through untouched for whoever renders the result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Event {
    /// Creates a located event with the given category
    pub fn at(id: impl Into<String>, category: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            lat: Some(lat),
            lng: Some(lng),
            ..Default::default()
        }
    }

    /// Returns the event position, or `None` when the event is unlocated
    ///
    /// An event is unlocated when a coordinate is missing or not finite, or
    /// when both coordinates are exactly zero (the backend's placeholder).
    pub fn location(&self) -> Option<LatLng> {
        let (lat, lng) = (self.lat?, self.lng?);
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if lat == 0.0 && lng == 0.0 {
            return None;
        }
        Some(LatLng { lat, lng })
    }

    pub fn is_located(&self) -> bool {
        self.location().is_some()
    }
}
