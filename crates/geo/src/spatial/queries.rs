//! Distance calculations and the nearest-stop scan.
//!
//! Distances use the haversine formula with R = 6371 km. The formula is
//! kept verbatim (atan2 form, kilometres) so results stay numerically
//! comparable with the other clients of the stop data.

use crate::models::{BusStop, LatLng, NearestStop};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres spanned by one degree of latitude.
const KM_PER_DEGREE: f64 = 111.32;

/// Great-circle distance between two coordinates, in kilometres.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// [`haversine_distance_km`] over [`LatLng`] values.
pub fn haversine_between(a: LatLng, b: LatLng) -> f64 {
    haversine_distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Convert degrees of latitude to approximate kilometres (for bounding
/// box prefilters).
pub fn degrees_to_km_approx(degrees: f64) -> f64 {
    degrees * KM_PER_DEGREE
}

/// Convert kilometres to approximate degrees of latitude (for bounding
/// box prefilters).
pub fn km_to_degrees_approx(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

/// Find the stop closest to `destination`.
///
/// Stops without a latitude are skipped. Returns `None` when the slice
/// is empty or no stop is eligible; that is a normal outcome ("no stops
/// configured"), not a failure. Ties go to the earliest stop in the
/// slice. There is no distance ceiling: a far-away stop is still the
/// nearest if it is the only eligible one.
pub fn find_nearest_stop(destination: LatLng, stops: &[BusStop]) -> Option<NearestStop> {
    let mut nearest = None;
    let mut min_distance = f64::INFINITY;

    for stop in stops {
        let Some(latitude) = stop.latitude else {
            continue;
        };

        let distance = haversine_distance_km(
            destination.latitude,
            destination.longitude,
            latitude,
            stop.longitude,
        );
        if distance < min_distance {
            min_distance = distance;
            nearest = Some(NearestStop {
                stop: stop.clone(),
                distance_km: distance,
            });
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stop(id: &str, latitude: Option<f64>, longitude: f64) -> BusStop {
        BusStop {
            id: id.into(),
            bus_id: None,
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_haversine_san_francisco_to_los_angeles() {
        let distance = haversine_distance_km(37.7749, -122.4194, 34.0522, -118.2437);
        assert!((distance - 559.0).abs() < 2.0, "got {distance}");
    }

    #[test]
    fn test_haversine_symmetry() {
        let there = haversine_distance_km(-6.2088, 106.8456, 40.7505, -73.9935);
        let back = haversine_distance_km(40.7505, -73.9935, -6.2088, 106.8456);
        assert_relative_eq!(there, back);
    }

    #[test]
    fn test_haversine_identity_is_zero() {
        assert_eq!(haversine_distance_km(37.7879, -122.4075, 37.7879, -122.4075), 0.0);
    }

    #[test]
    fn test_haversine_across_antimeridian() {
        // One degree of longitude at the equator, wrapped across 180.
        let distance = haversine_distance_km(0.0, 179.5, 0.0, -179.5);
        assert_relative_eq!(distance, 111.19, epsilon = 0.05);
    }

    #[test]
    fn test_haversine_at_pole() {
        // Both points are the north pole, whatever the longitude says.
        let distance = haversine_distance_km(90.0, 0.0, 90.0, 120.0);
        assert!(distance < 1e-6);
    }

    #[test]
    fn test_degree_km_helpers() {
        assert_relative_eq!(degrees_to_km_approx(1.0), 111.32);
        assert_relative_eq!(km_to_degrees_approx(111.32), 1.0);
    }

    #[test]
    fn test_nearest_prefers_closer_stop() {
        let stops = vec![
            stop("a", Some(37.7849), -122.4094),
            stop("b", Some(37.7649), -122.4294),
        ];

        let nearest = find_nearest_stop(LatLng::new(37.7879, -122.4075), &stops).unwrap();
        assert_eq!(nearest.stop.id.as_str(), "a");
        assert!(nearest.distance_km > 0.0 && nearest.distance_km < 1.0);
    }

    #[test]
    fn test_nearest_skips_stops_without_latitude() {
        // The coordinate-less stop would be nearest if it counted.
        let stops = vec![
            stop("ghost", None, -122.4075),
            stop("real", Some(37.7649), -122.4294),
        ];

        let nearest = find_nearest_stop(LatLng::new(37.7879, -122.4075), &stops).unwrap();
        assert_eq!(nearest.stop.id.as_str(), "real");
    }

    #[test]
    fn test_nearest_none_when_no_eligible_stop() {
        assert!(find_nearest_stop(LatLng::new(37.7879, -122.4075), &[]).is_none());

        let only_ghost = vec![stop("ghost", None, -122.4075)];
        assert!(find_nearest_stop(LatLng::new(37.7879, -122.4075), &only_ghost).is_none());
    }

    #[test]
    fn test_nearest_tie_goes_to_first() {
        let stops = vec![
            stop("first", Some(37.7849), -122.4094),
            stop("second", Some(37.7849), -122.4094),
        ];

        let nearest = find_nearest_stop(LatLng::new(37.7879, -122.4075), &stops).unwrap();
        assert_eq!(nearest.stop.id.as_str(), "first");
    }

    #[test]
    fn test_nearest_has_no_distance_ceiling() {
        // Jakarta is the only stop; a San Francisco destination still
        // matches it.
        let stops = vec![stop("far", Some(-6.2088), 106.8456)];

        let nearest = find_nearest_stop(LatLng::new(37.7879, -122.4075), &stops).unwrap();
        assert_eq!(nearest.stop.id.as_str(), "far");
        assert!(nearest.distance_km > 10_000.0);
    }
}
