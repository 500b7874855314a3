//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use index::StopIndex;
pub use queries::{find_nearest_stop, haversine_between, haversine_distance_km, EARTH_RADIUS_KM};
