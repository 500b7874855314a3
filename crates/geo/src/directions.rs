//! The slice of the mapping vendor's directions response the app
//! consumes.
//!
//! Only the fields the core needs are modelled: the response status,
//! each route's overview polyline, and the first leg's distance and
//! duration. Everything else in the payload is ignored on
//! deserialization.

use geo::LineString;
use serde::Deserialize;

use crate::models::LatLng;
use crate::polyline::decode_polyline;

const BASE_FARE_USD: f64 = 2.0;
const FARE_PER_KM_USD: f64 = 1.5;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub overview_polyline: OverviewPolyline,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    pub distance: TextValue,
    pub duration: TextValue,
}

/// A human-readable text plus the raw value behind it (metres for
/// distances, seconds for durations).
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u32,
}

/// A drivable route ready for rendering and fare display.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    pub points: Vec<LatLng>,
    pub distance_meters: u32,
    pub duration_seconds: u32,
    pub distance_text: String,
    pub duration_text: String,
}

impl DirectionsResponse {
    /// The first returned route, decoded for rendering.
    ///
    /// `None` unless the status is `OK` and a route with at least one
    /// leg exists — the caller treats that as "unable to find route",
    /// not an error.
    pub fn primary_route(&self) -> Option<RoutePath> {
        if self.status != "OK" {
            return None;
        }
        let route = self.routes.first()?;
        let leg = route.legs.first()?;

        Some(RoutePath {
            points: decode_polyline(&route.overview_polyline.points),
            distance_meters: leg.distance.value,
            duration_seconds: leg.duration.value,
            distance_text: leg.distance.text.clone(),
            duration_text: leg.duration.text.clone(),
        })
    }
}

impl RoutePath {
    /// Route geometry as a [`geo::LineString`] (x = longitude,
    /// y = latitude) for the map layer.
    pub fn line_string(&self) -> LineString {
        LineString::from(
            self.points
                .iter()
                .map(|p| (p.longitude, p.latitude))
                .collect::<Vec<_>>(),
        )
    }

    /// Fare estimate in USD: base fare plus a per-kilometre rate.
    pub fn estimated_fare(&self) -> f64 {
        let km = f64::from(self.distance_meters) / 1000.0;
        BASE_FARE_USD + km * FARE_PER_KM_USD
    }
}
