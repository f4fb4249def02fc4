//! # Geographic Utilities
//!
//! Small geometry kernel for lake-scale route annotation.
//!
//! Every function here works on plain latitude/longitude pairs and treats a
//! few tens of kilometres of lake as locally flat. That is an explicit
//! simplification: none of this is a geodesic calculation, and results should
//! not be compared against a full geodesy library beyond a few decimal places.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`bearing`] | Initial compass bearing between two points, `[0, 360)` |
//! | [`midpoint`] | Arithmetic mean of two coordinates |
//! | [`distance`] | Planar distance in coordinate-degree units |
//! | [`path_length`] | Sum of planar segment distances along a path |
//! | [`compute_bounds`] | Bounding box of a path |
//!
//! ## Example
//!
//! ```rust
//! use itinerary_map::{Coordinate, geo_utils};
//!
//! let panajachel = Coordinate::new(14.7422, -91.1591);
//! let san_juan = Coordinate::new(14.6947, -91.2858);
//!
//! let heading = geo_utils::bearing(&panajachel, &san_juan);
//! assert!(heading > 180.0 && heading < 270.0); // roughly west-south-west
//!
//! let mid = geo_utils::midpoint(&panajachel, &san_juan);
//! assert!((mid.latitude - 14.71845).abs() < 1e-9);
//! ```
//!
//! ## Units
//!
//! [`distance`] and [`path_length`] return degrees, not metres. They exist for
//! relative comparisons ("is this segment too short to annotate") only.

use geo::{BoundingRect, Coord, Distance, Euclidean, LineString, Point};
use crate::{Bounds, Coordinate};

// =============================================================================
// Direction Functions
// =============================================================================

/// Initial compass bearing from `from` to `to`, in degrees within `[0, 360)`.
///
/// Uses the standard spherical initial-bearing formula:
///
/// ```text
/// θ = atan2(sin Δλ · cos φ2, cos φ1 · sin φ2 − sin φ1 · cos φ2 · cos Δλ)
/// ```
///
/// 0° is north, 90° east. Identical points yield 0°.
///
/// # Example
///
/// ```rust
/// use itinerary_map::{Coordinate, geo_utils};
///
/// let south = Coordinate::new(14.60, -91.20);
/// let north = Coordinate::new(14.70, -91.20);
/// assert!(geo_utils::bearing(&south, &north).abs() < 1e-9);
/// assert!((geo_utils::bearing(&north, &south) - 180.0).abs() < 1e-9);
/// ```
pub fn bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    // rem_euclid can round a tiny negative angle up to exactly 360.0
    let normalized = y.atan2(x).to_degrees().rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Arithmetic midpoint of two coordinates.
///
/// Not the spherical midpoint; at lake scale the difference is far below what
/// a glyph placement can show.
#[inline]
pub fn midpoint(a: &Coordinate, b: &Coordinate) -> Coordinate {
    Coordinate::new(
        (a.latitude + b.latitude) / 2.0,
        (a.longitude + b.longitude) / 2.0,
    )
}

// =============================================================================
// Distance Functions
// =============================================================================

/// Planar Euclidean distance between two coordinates, in degree units.
///
/// Only meaningful for relative comparisons; it is not a real-world distance.
///
/// # Example
///
/// ```rust
/// use itinerary_map::{Coordinate, geo_utils};
///
/// let a = Coordinate::new(14.70, -91.20);
/// let b = Coordinate::new(14.73, -91.16);
/// assert!((geo_utils::distance(&a, &b) - 0.05).abs() < 1e-9);
/// ```
#[inline]
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    Euclidean::distance(to_point(a), to_point(b))
}

/// Total planar length of a path in degree units.
///
/// Empty and single-point paths have length 0.0.
pub fn path_length(points: &[Coordinate]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a path.
///
/// Returns `None` for an empty path. A single point yields a degenerate box
/// whose corners coincide.
///
/// # Example
///
/// ```rust
/// use itinerary_map::{Coordinate, geo_utils};
///
/// let path = vec![
///     Coordinate::new(14.74, -91.16),
///     Coordinate::new(14.69, -91.29),
///     Coordinate::new(14.64, -91.23),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&path).unwrap();
/// assert_eq!(bounds.min_lat, 14.64);
/// assert_eq!(bounds.max_lat, 14.74);
/// assert_eq!(bounds.min_lng, -91.29);
/// assert_eq!(bounds.max_lng, -91.16);
/// ```
pub fn compute_bounds(points: &[Coordinate]) -> Option<Bounds> {
    let line: LineString<f64> = points
        .iter()
        .map(|c| Coord { x: c.longitude, y: c.latitude })
        .collect();

    let rect = line.bounding_rect()?;
    Some(Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}

#[inline]
fn to_point(c: &Coordinate) -> Point<f64> {
    Point::new(c.longitude, c.latitude)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new(14.70, -91.20);
        let north = Coordinate::new(14.80, -91.20);
        let south = Coordinate::new(14.60, -91.20);
        let east = Coordinate::new(14.70, -91.10);
        let west = Coordinate::new(14.70, -91.30);

        assert!(approx_eq(bearing(&origin, &north), 0.0, 1e-9));
        assert!(approx_eq(bearing(&origin, &south), 180.0, 1e-9));
        // Near the equator east/west stay within a hair of 90/270
        assert!(approx_eq(bearing(&origin, &east), 90.0, 0.05));
        assert!(approx_eq(bearing(&origin, &west), 270.0, 0.05));
    }

    #[test]
    fn test_bearing_range() {
        let a = Coordinate::new(14.7422, -91.1591);
        let targets = [
            Coordinate::new(14.80, -91.10),
            Coordinate::new(14.60, -91.10),
            Coordinate::new(14.60, -91.30),
            Coordinate::new(14.80, -91.30),
            Coordinate::new(14.7422, -91.1591),
        ];
        for t in &targets {
            let b = bearing(&a, t);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
    }

    #[test]
    fn test_bearing_same_point_is_zero() {
        let p = Coordinate::new(14.7422, -91.1591);
        assert_eq!(bearing(&p, &p), 0.0);
    }

    #[test]
    fn test_bearing_reverse_differs_by_half_turn() {
        let a = Coordinate::new(14.7422, -91.1591);
        let b = Coordinate::new(14.6947, -91.2858);
        let forward = bearing(&a, &b);
        let back = bearing(&b, &a);
        // Lake scale: the great-circle correction is tiny
        assert!(approx_eq((forward - back).abs(), 180.0, 0.1));
    }

    #[test]
    fn test_midpoint() {
        let a = Coordinate::new(14.70, -91.20);
        let b = Coordinate::new(14.75, -91.25);
        let mid = midpoint(&a, &b);
        assert!(approx_eq(mid.latitude, 14.725, 1e-12));
        assert!(approx_eq(mid.longitude, -91.225, 1e-12));
    }

    #[test]
    fn test_distance_planar() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!(approx_eq(distance(&a, &b), 5.0, 1e-12));
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_path_length() {
        let empty: Vec<Coordinate> = vec![];
        assert_eq!(path_length(&empty), 0.0);
        assert_eq!(path_length(&[Coordinate::new(1.0, 1.0)]), 0.0);

        let path = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ];
        assert!(approx_eq(path_length(&path), 2.0, 1e-12));
    }

    #[test]
    fn test_compute_bounds_empty() {
        assert!(compute_bounds(&[]).is_none());
    }

    #[test]
    fn test_compute_bounds_single_point() {
        let p = Coordinate::new(14.7422, -91.1591);
        let bounds = compute_bounds(&[p]).unwrap();
        assert_eq!(bounds.min_lat, bounds.max_lat);
        assert_eq!(bounds.min_lng, bounds.max_lng);
        assert_eq!(bounds.center(), p);
    }
}
