/// Mean Earth radius in kilometres, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A single resolved fix from the location provider.
///
/// Transient: consumed for the incremental distance delta and the route,
/// never retained beyond the previous-position slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub point: Point,
    pub timestamp_ms: u64,
}

impl PositionSample {
    pub fn new(lat: f64, lon: f64, timestamp_ms: u64) -> Self {
        Self {
            point: Point::new(lat, lon),
            timestamp_ms,
        }
    }
}

/// Great-circle distance between two points in kilometres, assuming a
/// spherical Earth.
pub fn haversine_km(a: Point, b: Point) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
