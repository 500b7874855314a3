//! Core value types shared across the crate.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::identifiers::{BusIdentifier, StopIdentifier};

/// A geographic coordinate in decimal degrees.
///
/// This is the shape the mobile bridge consumes (`{latitude, longitude}`
/// objects); spatial code converts to [`geo::Point`] where x = longitude
/// and y = latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<LatLng> for Point {
    fn from(value: LatLng) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

impl From<Point> for LatLng {
    fn from(point: Point) -> Self {
        Self {
            latitude: point.y(),
            longitude: point.x(),
        }
    }
}

/// A stored bus stop, shaped after the `bus_stops` row the app keeps in
/// its hosted database.
///
/// `latitude` is nullable in storage; a stop without it has no usable
/// position and is skipped by every query in this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    pub id: StopIdentifier,
    pub bus_id: Option<BusIdentifier>,
    pub latitude: Option<f64>,
    pub longitude: f64,
}

impl BusStop {
    /// Position of the stop, or `None` when the latitude is absent.
    pub fn location(&self) -> Option<Point> {
        self.latitude.map(|lat| Point::new(self.longitude, lat))
    }
}

/// A stop paired with its distance from a queried destination.
///
/// Serializes flattened with the distance in kilometres under
/// `distance`, matching the record the UI renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestStop {
    #[serde(flatten)]
    pub stop: BusStop,
    #[serde(rename = "distance")]
    pub distance_km: f64,
}
