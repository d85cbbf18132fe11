//! Distance calculations
//!
//! Two deliberately different metrics live here. Search ranking uses the
//! great-circle distance in kilometers. The route simplifier uses a planar
//! distance measured directly in degrees, which is accurate enough at the
//! scale of a few meters it works at.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::coord::Coordinate;

/// Great-circle distance between two points in kilometers (Haversine formula)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// [`haversine_km`] for two [`Coordinate`]s
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    haversine_km(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Planar distance from `point` to the segment `seg_start`..`seg_end`
///
/// The point is projected onto the segment's supporting line, the
/// projection parameter is clamped to [0, 1], and the Euclidean distance
/// to that clamped projection is returned. A degenerate segment (both ends
/// equal) degrades to point-to-point distance.
pub fn point_to_segment_distance(
    point: Coordinate,
    seg_start: Coordinate,
    seg_end: Coordinate,
) -> f64 {
    let a = point.latitude - seg_start.latitude;
    let b = point.longitude - seg_start.longitude;
    let c = seg_end.latitude - seg_start.latitude;
    let d = seg_end.longitude - seg_start.longitude;

    let len_sq = c * c + d * d;
    if len_sq == 0.0 {
        return (a * a + b * b).sqrt();
    }

    let t = ((a * c + b * d) / len_sq).clamp(0.0, 1.0);

    let dx = point.latitude - (seg_start.latitude + t * c);
    let dy = point.longitude - (seg_start.longitude + t * d);

    (dx * dx + dy * dy).sqrt()
}
