use super::event::LatLng;
use super::point::{MapBounds, PixelPoint, ViewportSize};

/// Spans smaller than this (in degrees) are treated as collapsed bounds
pub const MIN_SPAN_DEG: f64 = 1e-12;

/// Projects a coordinate onto the viewport
///
/// Linear (equirectangular) mapping of `bounds` onto `[0, width] x [0, height]`
/// with north at the top. Coordinates outside `bounds` land outside that
/// range; nothing is clamped. Bounds orientation is not validated.
///
/// When either span of `bounds` collapses to zero (or is not finite) the
/// viewport centre is returned instead of dividing by zero.
pub fn project(coord: &LatLng, bounds: &MapBounds, viewport: &ViewportSize) -> PixelPoint {
    let lat_span = bounds.lat_span();
    let lng_span = bounds.lng_span();

    if !usable_span(lat_span) || !usable_span(lng_span) {
        return viewport.center();
    }

    let x = (coord.lng - bounds.west) / lng_span * viewport.width;
    let y = (bounds.north - coord.lat) / lat_span * viewport.height;
    PixelPoint([x, y])
}

fn usable_span(span: f64) -> bool {
    span.is_finite() && span.abs() >= MIN_SPAN_DEG
}
