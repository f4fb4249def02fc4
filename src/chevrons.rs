//! Direction chevrons along the water path.
//!
//! One glyph per path segment, placed at the segment midpoint and rotated to
//! the segment's bearing. Segments shorter than
//! [`ChevronConfig::min_segment_length`] get no glyph; closely spaced knots
//! would otherwise stack arrows on top of each other.

use crate::geo_utils::{bearing, distance, midpoint};
use crate::Coordinate;

/// Glyph artwork points right (east) at 0°; compass bearings start at north.
const GLYPH_ROTATION_OFFSET: f64 = 90.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChevronConfig {
    /// Segments shorter than this (planar degrees) get no chevron.
    /// Default: 0.005 (~550 m of latitude)
    pub min_segment_length: f64,
}

impl Default for ChevronConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 0.005,
        }
    }
}

/// A direction glyph for one path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DirectionMarker {
    /// Segment midpoint
    pub position: Coordinate,
    /// Compass bearing of the segment, `[0, 360)`
    pub bearing: f64,
    /// Screen rotation for a right-pointing glyph (`bearing - 90`)
    pub rotation: f64,
    /// Index of the segment within the path
    pub index: usize,
}

/// Plan direction markers for a path.
///
/// # Example
///
/// ```rust
/// use itinerary_map::{plan_direction_markers, ChevronConfig, Coordinate};
///
/// let path = vec![
///     Coordinate::new(14.700, -91.200),
///     Coordinate::new(14.701, -91.200), // too close, skipped
///     Coordinate::new(14.751, -91.200),
/// ];
///
/// let markers = plan_direction_markers(&path, &ChevronConfig::default());
/// assert_eq!(markers.len(), 1);
/// assert_eq!(markers[0].index, 1);
/// assert!(markers[0].bearing.abs() < 1e-9); // due north
/// assert!((markers[0].rotation + 90.0).abs() < 1e-9);
/// ```
pub fn plan_direction_markers(path: &[Coordinate], config: &ChevronConfig) -> Vec<DirectionMarker> {
    path.windows(2)
        .enumerate()
        .filter(|(_, w)| distance(&w[0], &w[1]) >= config.min_segment_length)
        .map(|(index, w)| {
            let heading = bearing(&w[0], &w[1]);
            DirectionMarker {
                position: midpoint(&w[0], &w[1]),
                bearing: heading,
                rotation: heading - GLYPH_ROTATION_OFFSET,
                index,
            }
        })
        .collect()
}
