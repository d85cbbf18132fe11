//! Polyline simplification
//!
//! Single-pass filter: every interior point is compared once against the
//! segment joining its neighbours in the input, and dropped when it lies
//! within `tolerance` of that segment. This is an O(n) approximation of
//! Douglas-Peucker, not an implementation of it. Two adjacent dropped
//! points can add up to more deviation than `tolerance`.

use crate::coord::distance::point_to_segment_distance;
use crate::coord::Coordinate;

/// Simplify a polyline, always keeping its first and last point
///
/// Inputs with fewer than 3 points are returned unchanged.
pub fn simplify(points: &[Coordinate], tolerance: f64) -> Vec<Coordinate> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut simplified = Vec::with_capacity(points.len());
    simplified.push(points[0]);

    simplified.extend(
        points
            .windows(3)
            .filter(|w| point_to_segment_distance(w[1], w[0], w[2]) > tolerance)
            .map(|w| w[1]),
    );

    simplified.push(points[points.len() - 1]);
    simplified
}
