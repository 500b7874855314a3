//! R-tree index over bus stops.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries use a two-stage filtering approach:
//! 1. **R-tree filter**: a degree-space bounding box for fast
//!    approximate filtering
//! 2. **Haversine filter**: accurate geodesic distance on the filtered
//!    results
//!
//! Stops without a latitude carry no position and are never indexed.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use crate::models::BusStop;
use crate::spatial::queries::{haversine_distance_km, km_to_degrees_approx};

#[derive(Clone)]
struct StopNode {
    stop: Arc<BusStop>,
    point: [f64; 2],
}

impl StopNode {
    fn new(latitude: f64, stop: Arc<BusStop>) -> Self {
        Self {
            point: [stop.longitude, latitude],
            stop,
        }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over the stops with a known position.
///
/// Cheap to clone; stops are held in `Arc`s.
#[derive(Clone)]
pub struct StopIndex {
    tree: RTree<StopNode>,
}

impl StopIndex {
    /// Build an index from stored stops, skipping any without a
    /// latitude.
    pub fn new(stops: impl IntoIterator<Item = BusStop>) -> Self {
        let nodes: Vec<StopNode> = stops
            .into_iter()
            .filter_map(|stop| {
                stop.latitude
                    .map(|latitude| StopNode::new(latitude, Arc::new(stop)))
            })
            .collect();

        debug!(stops = nodes.len(), "built stop index");

        Self {
            tree: RTree::bulk_load(nodes),
        }
    }

    /// Number of indexed stops.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All indexed stops within `radius_km` of `point`.
    ///
    /// Returns an empty list for a non-positive or non-finite radius.
    pub fn stops_near(&self, point: Point, radius_km: f64) -> Vec<Arc<BusStop>> {
        if radius_km <= 0.0 || !radius_km.is_finite() {
            return Vec::new();
        }

        // A kilometre of longitude spans more degrees away from the
        // equator; widen the box accordingly so the prefilter never
        // drops an in-range stop.
        let lat_margin = km_to_degrees_approx(radius_km);
        let cos_lat = point.y().to_radians().cos().abs();
        let lng_margin = if cos_lat > f64::EPSILON {
            lat_margin / cos_lat
        } else {
            180.0
        };

        let envelope = AABB::from_corners(
            [point.x() - lng_margin, point.y() - lat_margin],
            [point.x() + lng_margin, point.y() + lat_margin],
        );

        self.tree
            .locate_in_envelope(&envelope)
            .filter(|node| {
                haversine_distance_km(point.y(), point.x(), node.point[1], node.point[0])
                    <= radius_km
            })
            .map(|node| node.stop.clone())
            .collect()
    }

    /// Up to `n` indexed stops, nearest first.
    pub fn nearest_stops(&self, point: Point, n: usize) -> Vec<Arc<BusStop>> {
        self.tree
            .nearest_neighbor_iter(&[point.x(), point.y()])
            .take(n)
            .map(|node| node.stop.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, latitude: Option<f64>, longitude: f64) -> BusStop {
        BusStop {
            id: id.into(),
            bus_id: None,
            latitude,
            longitude,
        }
    }

    // The stored stop set the destination screen works against.
    fn city_stops() -> Vec<BusStop> {
        vec![
            stop("stop-1", Some(37.7849), -122.4094),
            stop("stop-2", Some(37.7649), -122.4294),
            stop("stop-3", Some(37.7949), -122.3994),
            stop("stop-4", Some(37.7549), -122.4094),
            stop("stop-5", Some(37.7449), -122.4494),
        ]
    }

    fn union_square() -> Point {
        Point::new(-122.4075, 37.7879)
    }

    #[test]
    fn test_index_skips_stops_without_latitude() {
        let mut stops = city_stops();
        stops.push(stop("ghost", None, -122.4075));

        let index = StopIndex::new(stops);
        assert_eq!(index.len(), 5);

        let near = index.stops_near(union_square(), 10_000.0);
        assert!(near.iter().all(|s| s.id.as_str() != "ghost"));
    }

    #[test]
    fn test_stops_near_filters_by_haversine_radius() {
        let index = StopIndex::new(city_stops());

        let near = index.stops_near(union_square(), 2.0);
        let mut ids: Vec<&str> = near.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();

        assert_eq!(ids, ["stop-1", "stop-3"]);
    }

    #[test]
    fn test_stops_near_rejects_bad_radius() {
        let index = StopIndex::new(city_stops());

        assert!(index.stops_near(union_square(), 0.0).is_empty());
        assert!(index.stops_near(union_square(), -5.0).is_empty());
        assert!(index.stops_near(union_square(), f64::NAN).is_empty());
        assert!(index.stops_near(union_square(), f64::INFINITY).is_empty());
    }

    #[test]
    fn test_nearest_stops_orders_by_distance() {
        let index = StopIndex::new(city_stops());

        let nearest = index.nearest_stops(union_square(), 2);
        let ids: Vec<&str> = nearest.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, ["stop-1", "stop-3"]);
    }

    #[test]
    fn test_empty_index() {
        let index = StopIndex::new(Vec::new());

        assert!(index.is_empty());
        assert!(index.stops_near(union_square(), 5.0).is_empty());
        assert!(index.nearest_stops(union_square(), 3).is_empty());
    }
}
