use itertools::{Itertools, MinMaxResult};

use crate::geo::Point;

pub const FOLLOW_ZOOM: u8 = 16;

/// View-model for the route map: the controller drives it with
/// set-view/pan-to/append-point and the canvas renderer reads the route and
/// viewport back out. Knows nothing about the terminal.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    center: Option<Point>,
    zoom: u8,
    route: Vec<Point>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Centers the view, typically on the first fix of a session.
    pub fn set_view(&mut self, center: Point, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
    }

    /// Re-centers without touching the zoom level.
    pub fn pan_to(&mut self, center: Point) {
        self.center = Some(center);
    }

    pub fn append_point(&mut self, point: Point) {
        self.route.push(point);
    }

    pub fn clear(&mut self) {
        self.center = None;
        self.zoom = 0;
        self.route.clear();
    }

    pub fn center(&self) -> Option<Point> {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn route(&self) -> &[Point] {
        &self.route
    }

    /// Bounding box of the recorded route as ((min lat, min lon),
    /// (max lat, max lon)), for the canvas viewport.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let lats = self.route.iter().map(|p| p.lat).minmax();
        let lons = self.route.iter().map(|p| p.lon).minmax();

        let (min_lat, max_lat) = match lats {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let (min_lon, max_lon) = match lons {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };

        Some((Point::new(min_lat, min_lon), Point::new(max_lat, max_lon)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_has_no_center_or_bounds() {
        let map = RouteMap::new();
        assert_eq!(map.center(), None);
        assert_eq!(map.bounds(), None);
        assert!(map.route().is_empty());
    }

    #[test]
    fn set_view_then_pan_keeps_zoom() {
        let mut map = RouteMap::new();
        map.set_view(Point::new(51.5, -0.1), FOLLOW_ZOOM);
        map.pan_to(Point::new(51.6, -0.2));

        assert_eq!(map.center(), Some(Point::new(51.6, -0.2)));
        assert_eq!(map.zoom(), FOLLOW_ZOOM);
    }

    #[test]
    fn bounds_cover_all_route_points() {
        let mut map = RouteMap::new();
        map.append_point(Point::new(51.5, -0.1));
        map.append_point(Point::new(51.7, -0.3));
        map.append_point(Point::new(51.6, 0.2));

        let (min, max) = map.bounds().unwrap();
        assert_eq!(min, Point::new(51.5, -0.3));
        assert_eq!(max, Point::new(51.7, 0.2));
    }

    #[test]
    fn single_point_bounds_collapse_to_that_point() {
        let mut map = RouteMap::new();
        map.append_point(Point::new(10.0, 20.0));

        let (min, max) = map.bounds().unwrap();
        assert_eq!(min, Point::new(10.0, 20.0));
        assert_eq!(max, Point::new(10.0, 20.0));
    }

    #[test]
    fn clear_resets_everything() {
        let mut map = RouteMap::new();
        map.set_view(Point::new(1.0, 2.0), FOLLOW_ZOOM);
        map.append_point(Point::new(1.0, 2.0));
        map.clear();

        assert_eq!(map.center(), None);
        assert_eq!(map.zoom(), 0);
        assert!(map.route().is_empty());
    }
}
