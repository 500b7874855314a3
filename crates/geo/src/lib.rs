//! # ride-link-geo
//!
//! Geographic core for the RideLink ride-hailing app.
//!
//! The mobile app keeps its screens, auth, and storage on the UI side;
//! this crate owns the computations those screens lean on:
//!
//! - **Polyline codec**: decode (and encode) the mapping vendor's
//!   encoded polyline format for map rendering
//! - **Distance**: great-circle distances in kilometres (haversine,
//!   R = 6371 km)
//! - **Nearest stop**: pick the closest bus stop to a destination
//! - **Stop index**: R-tree radius and k-nearest queries over stops
//! - **Directions payload**: the slice of the vendor's directions JSON
//!   the app consumes, decoded into a renderable route path
//! - **Driver tracking**: the tracking lifecycle as an explicit state
//!   machine, fed by the caller (no I/O here)
//!
//! Everything is pure and synchronous; fetching stops or directions and
//! persisting anything stays with the caller.
//!
//! ## Example
//!
//! ```
//! use ride_link_geo::prelude::*;
//!
//! let stops = vec![
//!     BusStop {
//!         id: "stop-1".into(),
//!         bus_id: Some("bus-101".into()),
//!         latitude: Some(37.7849),
//!         longitude: -122.4094,
//!     },
//!     BusStop {
//!         id: "stop-2".into(),
//!         bus_id: Some("bus-102".into()),
//!         latitude: Some(37.7649),
//!         longitude: -122.4294,
//!     },
//! ];
//!
//! // Union Square; the closest stop is stop-1.
//! let destination = LatLng::new(37.7879, -122.4075);
//! let nearest = find_nearest_stop(destination, &stops).unwrap();
//! assert_eq!(nearest.stop.id.as_str(), "stop-1");
//! assert!(nearest.distance_km < 1.0);
//! ```

pub mod directions;
pub mod identifiers;
pub mod models;
pub mod polyline;
pub mod spatial;
pub mod tracking;

// Re-exports for convenience
pub mod prelude {
    pub use crate::directions::{DirectionsResponse, RoutePath};
    pub use crate::identifiers::{BusIdentifier, DriverIdentifier, StopIdentifier};
    pub use crate::models::{BusStop, LatLng, NearestStop};
    pub use crate::polyline::{
        decode_polyline, decode_polyline_strict, encode_polyline, DecodeError,
    };
    pub use crate::spatial::{
        find_nearest_stop, haversine_between, haversine_distance_km, StopIndex, EARTH_RADIUS_KM,
    };
    pub use crate::tracking::{LocationFix, LocationTracker, TrackingError, TrackingState};
}

pub use prelude::*;
