//! Water-path expansion.
//!
//! A straight chord between two lakeside towns often cuts across a headland
//! or a volcano flank on the rendered map. The augmenter inserts a few
//! shoreline-avoiding knots between known stop pairs so the drawn line stays
//! over open water. It is a visual aid, not a navigation engine.
//!
//! Pairs without knot data are joined by a straight segment. Stops are never
//! dropped, and the output starts and ends exactly on the route's first and
//! last coordinates.

use std::collections::HashMap;

use log::trace;

use crate::error::ConfigError;
use crate::route::Route;
use crate::Coordinate;

/// Dense coordinate sequence used only for drawing the route line.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterPath {
    pub points: Vec<Coordinate>,
}

impl WaterPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }
}

/// Lookup of waypoint knots between stop pairs.
///
/// Knots are stored in one direction; traversing the pair the other way uses
/// them reversed.
#[derive(Debug, Clone)]
pub struct WaterPathAugmenter {
    /// (from, to) lowercased -> knots from `from` towards `to`
    knots: HashMap<(String, String), Vec<Coordinate>>,
}

impl WaterPathAugmenter {
    pub fn builder() -> AugmenterBuilder {
        AugmenterBuilder::default()
    }

    /// Straight segments only.
    pub fn empty() -> Self {
        Self { knots: HashMap::new() }
    }

    /// Number of stop pairs with knot data.
    pub fn pair_count(&self) -> usize {
        self.knots.len()
    }

    /// Knots to insert when travelling from `from` to `to`, if any.
    pub fn knots_between(&self, from: &str, to: &str) -> Option<Vec<Coordinate>> {
        let from = from.to_lowercase();
        let to = to.to_lowercase();

        if let Some(forward) = self.knots.get(&(from.clone(), to.clone())) {
            return Some(forward.clone());
        }
        self.knots
            .get(&(to, from))
            .map(|backward| backward.iter().rev().copied().collect())
    }

    /// Expand a route into its water path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use itinerary_map::{build_route, ItineraryStep, LocationRegistry, WaterPathAugmenter};
    ///
    /// let registry = LocationRegistry::atitlan();
    /// let route = build_route(
    ///     &[
    ///         ItineraryStep::new("08:00", "Panajachel"),
    ///         ItineraryStep::new("11:00", "Santiago Atitlán"),
    ///     ],
    ///     &registry,
    /// );
    ///
    /// let path = WaterPathAugmenter::atitlan().build_water_path(&route);
    /// assert!(path.len() > route.len());
    /// assert_eq!(path.first(), Some(&route.stops[0].coordinate));
    /// assert_eq!(path.last(), Some(&route.stops[1].coordinate));
    /// ```
    pub fn build_water_path(&self, route: &Route) -> WaterPath {
        let Some(first) = route.first() else {
            return WaterPath::default();
        };

        let mut points: Vec<Coordinate> = Vec::with_capacity(route.len() * 3);
        points.push(first.coordinate);

        for pair in route.stops.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            match self.knots_between(&from.name, &to.name) {
                Some(knots) => points.extend(knots),
                None => trace!("straight segment {} -> {}", from.name, to.name),
            }
            points.push(to.coordinate);
        }

        WaterPath { points }
    }

    /// Knots for the curated Lake Atitlán stops.
    pub fn atitlan() -> Self {
        let mut builder = Self::builder();
        for (from, to, knots) in ATITLAN_KNOTS {
            let knots: Vec<Coordinate> = knots
                .iter()
                .map(|(lat, lng)| Coordinate::new(*lat, *lng))
                .collect();
            builder = builder.waypoints(*from, *to, knots);
        }
        builder.build().unwrap_or_else(|e| {
            log::error!("built-in water path table rejected: {}", e);
            Self::empty()
        })
    }
}

impl Default for WaterPathAugmenter {
    fn default() -> Self {
        Self::atitlan()
    }
}

/// Collects knot lists, validated in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct AugmenterBuilder {
    entries: Vec<(String, String, Vec<Coordinate>)>,
}

impl AugmenterBuilder {
    /// Register knots for travel from `from` to `to` (reverse direction implied).
    pub fn waypoints(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        knots: Vec<Coordinate>,
    ) -> Self {
        self.entries.push((from.into(), to.into(), knots));
        self
    }

    pub fn build(self) -> Result<WaterPathAugmenter, ConfigError> {
        let mut knots = HashMap::with_capacity(self.entries.len());

        for (from, to, points) in self.entries {
            let from_key = from.trim().to_lowercase();
            let to_key = to.trim().to_lowercase();
            if from_key.is_empty() || to_key.is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if from_key == to_key {
                return Err(ConfigError::DegenerateWaypointPair(from));
            }
            if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
                return Err(ConfigError::InvalidCoordinate {
                    name: format!("{} -> {}", from, to),
                    latitude: bad.latitude,
                    longitude: bad.longitude,
                });
            }

            // A later entry for the same pair (either direction) replaces it
            knots.remove(&(to_key.clone(), from_key.clone()));
            knots.insert((from_key, to_key), points);
        }

        Ok(WaterPathAugmenter { knots })
    }
}

const ATITLAN_KNOTS: &[(&str, &str, &[(f64, f64)])] = &[
    (
        "Panajachel",
        "San Juan La Laguna",
        &[(14.728, -91.185), (14.712, -91.235), (14.700, -91.268)],
    ),
    (
        "Panajachel",
        "San Pedro La Laguna",
        &[(14.728, -91.185), (14.708, -91.235)],
    ),
    (
        "Panajachel",
        "San Marcos La Laguna",
        &[(14.735, -91.190), (14.728, -91.230)],
    ),
    (
        "Panajachel",
        "Santiago Atitlán",
        &[(14.715, -91.180), (14.680, -91.210), (14.655, -91.225)],
    ),
    (
        "Panajachel",
        "San Lucas Tolimán",
        &[(14.715, -91.160), (14.680, -91.150), (14.650, -91.145)],
    ),
    (
        "San Pedro La Laguna",
        "Santiago Atitlán",
        &[(14.690, -91.255), (14.672, -91.238), (14.652, -91.232)],
    ),
    (
        "San Juan La Laguna",
        "Santiago Atitlán",
        &[(14.702, -91.277), (14.700, -91.258), (14.675, -91.240), (14.652, -91.232)],
    ),
    (
        "San Marcos La Laguna",
        "San Pedro La Laguna",
        &[(14.712, -91.262)],
    ),
    (
        "Santiago Atitlán",
        "San Lucas Tolimán",
        &[(14.655, -91.205), (14.650, -91.170)],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Stop;

    fn stop(name: &str, lat: f64, lng: f64) -> Stop {
        Stop {
            name: name.to_string(),
            coordinate: Coordinate::new(lat, lng),
            step_index: 0,
            is_return: false,
        }
    }

    fn augmenter() -> WaterPathAugmenter {
        WaterPathAugmenter::builder()
            .waypoints("A", "B", vec![Coordinate::new(0.5, 0.2), Coordinate::new(0.8, 0.6)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_route() {
        assert!(augmenter().build_water_path(&Route::default()).is_empty());
    }

    #[test]
    fn test_single_stop() {
        let route = Route { stops: vec![stop("A", 0.0, 0.0)] };
        let path = augmenter().build_water_path(&route);
        assert_eq!(path.points, vec![Coordinate::new(0.0, 0.0)]);
    }

    #[test]
    fn test_forward_knots_inserted() {
        let route = Route {
            stops: vec![stop("A", 0.0, 0.0), stop("B", 1.0, 1.0)],
        };
        let path = augmenter().build_water_path(&route);
        assert_eq!(
            path.points,
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.5, 0.2),
                Coordinate::new(0.8, 0.6),
                Coordinate::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_reverse_pair_uses_reversed_knots() {
        let route = Route {
            stops: vec![stop("b", 1.0, 1.0), stop("a", 0.0, 0.0)],
        };
        let path = augmenter().build_water_path(&route);
        assert_eq!(path.points[1], Coordinate::new(0.8, 0.6));
        assert_eq!(path.points[2], Coordinate::new(0.5, 0.2));
    }

    #[test]
    fn test_unknown_pair_is_straight() {
        let route = Route {
            stops: vec![stop("A", 0.0, 0.0), stop("C", 2.0, 2.0), stop("B", 1.0, 1.0)],
        };
        let path = augmenter().build_water_path(&route);
        assert_eq!(
            path.points,
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(2.0, 2.0),
                Coordinate::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_path_contains_stops_in_order() {
        let registry = crate::LocationRegistry::atitlan();
        let route = crate::build_route(
            &[
                crate::ItineraryStep::new("08:00", "Salida de Panajachel"),
                crate::ItineraryStep::new("09:30", "San Juan La Laguna"),
                crate::ItineraryStep::new("12:00", "Santiago"),
                crate::ItineraryStep::new("16:00", "Regreso a Panajachel"),
            ],
            &registry,
        );
        let path = WaterPathAugmenter::atitlan().build_water_path(&route);

        assert!(path.len() >= route.len());
        assert_eq!(path.first(), Some(&route.stops[0].coordinate));
        assert_eq!(path.last(), Some(&route.stops[route.len() - 1].coordinate));
        assert_eq!(path.first(), path.last());

        // every stop appears, in order
        let mut cursor = 0;
        for s in &route {
            let found = path.points[cursor..]
                .iter()
                .position(|p| *p == s.coordinate)
                .expect("stop missing from water path");
            cursor += found + 1;
        }
    }

    #[test]
    fn test_builder_validation() {
        let err = WaterPathAugmenter::builder()
            .waypoints("A", "a", vec![])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateWaypointPair(_)));

        let err = WaterPathAugmenter::builder()
            .waypoints("A", "B", vec![Coordinate::new(f64::NAN, 0.0)])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCoordinate { .. }));

        let err = WaterPathAugmenter::builder()
            .waypoints("", "B", vec![])
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyName);
    }

    #[test]
    fn test_later_entry_replaces_reverse_pair() {
        let augmenter = WaterPathAugmenter::builder()
            .waypoints("A", "B", vec![Coordinate::new(0.5, 0.5)])
            .waypoints("B", "A", vec![Coordinate::new(0.7, 0.7)])
            .build()
            .unwrap();
        assert_eq!(augmenter.pair_count(), 1);
        assert_eq!(
            augmenter.knots_between("A", "B"),
            Some(vec![Coordinate::new(0.7, 0.7)])
        );
    }

    #[test]
    fn test_atitlan_table_loads() {
        assert_eq!(WaterPathAugmenter::atitlan().pair_count(), ATITLAN_KNOTS.len());
    }
}
