use super::event::{Event, LatLng};
use serde::{Deserialize, Serialize};

/// PixelPoint is a position on the rendering surface
///
/// The point is stored as [x, y] where:
/// - `[0]` is the horizontal offset from the left edge
/// - `[1]` is the vertical offset from the top edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint(pub [f64; 2]);

/// PixelList is a collection of PixelPoints
pub type PixelList = Vec<PixelPoint>;

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        PixelPoint([x, y])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    /// Returns squared euclidean distance between two points
    pub fn sq_dist(&self, b: &PixelPoint) -> f64 {
        let dx = self.0[0] - b.0[0];
        let dy = self.0[1] - b.0[1];
        dx * dx + dy * dy
    }

    /// Returns euclidean distance between two points
    pub fn dist(&self, b: &PixelPoint) -> f64 {
        self.sq_dist(b).sqrt()
    }
}

/// Smallest span (in degrees) `MapBounds::fit` gives an axis
pub const MIN_FIT_SPAN_DEG: f64 = 0.01;

/// Geographic rectangle currently visible on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl MapBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Computes bounds enclosing every located event
    ///
    /// An axis the events do not spread along (all on one latitude, say)
    /// borrows the other axis' span, and a single spot gets
    /// [`MIN_FIT_SPAN_DEG`] on both, so projection never collapses onto the
    /// viewport centre. `padding` then grows each side by that fraction of
    /// the span. Returns `None` when no event has a usable location.
    pub fn fit(events: &[Event], padding: f64) -> Option<MapBounds> {
        let mut min = LatLng::new(90.0, 180.0);
        let mut max = LatLng::new(-90.0, -180.0);
        let mut seen = false;

        for coord in events.iter().filter_map(Event::location) {
            seen = true;
            min.lat = min.lat.min(coord.lat);
            min.lng = min.lng.min(coord.lng);
            max.lat = max.lat.max(coord.lat);
            max.lng = max.lng.max(coord.lng);
        }

        if !seen {
            return None;
        }

        let mut lat_span = max.lat - min.lat;
        let mut lng_span = max.lng - min.lng;
        if lat_span < MIN_FIT_SPAN_DEG {
            lat_span = lng_span.max(MIN_FIT_SPAN_DEG);
        }
        if lng_span < MIN_FIT_SPAN_DEG {
            lng_span = lat_span;
        }

        let center = LatLng::new((max.lat + min.lat) / 2.0, (max.lng + min.lng) / 2.0);
        let half_lat = lat_span * (0.5 + padding);
        let half_lng = lng_span * (0.5 + padding);
        Some(MapBounds {
            north: center.lat + half_lat,
            south: center.lat - half_lat,
            east: center.lng + half_lng,
            west: center.lng - half_lng,
        })
    }
}

/// Size of the rendering surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint([self.width / 2.0, self.height / 2.0])
    }
}

/// Arithmetic mean of the given pixel positions
pub fn pixel_centroid<'a>(points: impl IntoIterator<Item = &'a PixelPoint>) -> Option<PixelPoint> {
    let mut center = PixelPoint([0.0, 0.0]);
    let mut n = 0usize;
    for pt in points {
        for j in 0..2 {
            center.0[j] += pt.0[j];
        }
        n += 1;
    }
    if n == 0 {
        return None;
    }
    for j in 0..2 {
        center.0[j] /= n as f64;
    }
    Some(center)
}

/// Arithmetic mean of the given coordinates
pub fn geo_centroid<'a>(coords: impl IntoIterator<Item = &'a LatLng>) -> Option<LatLng> {
    let (mut lat, mut lng, mut n) = (0.0, 0.0, 0usize);
    for c in coords {
        lat += c.lat;
        lng += c.lng;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(LatLng::new(lat / n as f64, lng / n as f64))
}
