//! # Route Building
//!
//! Turns an itinerary (time label + free-text activity) into an ordered,
//! deduplicated list of stops.
//!
//! ## Rules
//!
//! - Stops appear in itinerary order of first mention; they are never
//!   re-sorted by geography.
//! - A place mentioned again mid-itinerary does not produce a second stop.
//! - If the last step that names a place names the *first* stop, and at least
//!   two distinct places were visited, the tour is a round trip: a closing stop
//!   flagged `is_return` is appended.
//!
//! Fewer than two stops means there is nothing to draw; see
//! [`Route::is_drawable`].

use std::collections::HashSet;

use log::debug;

use crate::registry::LocationRegistry;
use crate::Coordinate;

/// One line of a tour itinerary, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryStep {
    pub time: String,
    pub activity: String,
}

impl ItineraryStep {
    pub fn new(time: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            activity: activity.into(),
        }
    }
}

/// A resolved point on the route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Stop {
    /// Canonical destination name (dedup key)
    pub name: String,
    pub coordinate: Coordinate,
    /// Index of the itinerary step this stop came from
    pub step_index: usize,
    /// True only for the closing stop of a round trip
    pub is_return: bool,
}

/// Ordered stops derived from an itinerary.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// A route needs at least two stops before a map is worth drawing.
    pub fn is_drawable(&self) -> bool {
        self.stops.len() >= 2
    }

    /// True when the last stop closes a round trip back to the first.
    pub fn is_loop(&self) -> bool {
        self.stops.last().is_some_and(|s| s.is_return)
    }

    pub fn first(&self) -> Option<&Stop> {
        self.stops.first()
    }

    pub fn last(&self) -> Option<&Stop> {
        self.stops.last()
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.stops.iter().map(|s| s.coordinate).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.stops.iter()
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Stop;
    type IntoIter = std::slice::Iter<'a, Stop>;

    fn into_iter(self) -> Self::IntoIter {
        self.stops.iter()
    }
}

/// Build a route from itinerary steps.
///
/// # Example
///
/// ```rust
/// use itinerary_map::{build_route, ItineraryStep, LocationRegistry};
///
/// let registry = LocationRegistry::atitlan();
/// let itinerary = vec![
///     ItineraryStep::new("08:00", "Salida desde Panajachel"),
///     ItineraryStep::new("10:00", "Llegada a San Juan La Laguna"),
///     ItineraryStep::new("14:00", "Regreso a Panajachel"),
/// ];
///
/// let route = build_route(&itinerary, &registry);
/// assert_eq!(route.len(), 3);
/// assert!(route.is_loop());
/// assert_eq!(route.stops[2].name, "Panajachel");
/// ```
pub fn build_route(itinerary: &[ItineraryStep], registry: &LocationRegistry) -> Route {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stops: Vec<Stop> = Vec::new();
    // (name, step index) of the most recent step that resolved at all
    let mut last_resolved: Option<(&str, usize)> = None;

    for (step_index, step) in itinerary.iter().enumerate() {
        let Some(hit) = registry.resolve(&step.activity) else {
            continue;
        };

        last_resolved = Some((hit.name, step_index));

        if seen.insert(hit.name) {
            stops.push(Stop {
                name: hit.name.to_string(),
                coordinate: hit.coordinate,
                step_index,
                is_return: false,
            });
        }
    }

    if let (Some(first), Some((last_name, last_step))) = (stops.first(), last_resolved) {
        // Two distinct places plus the return makes the minimum loop of three
        if stops.len() >= 2 && last_name == first.name {
            let closing = Stop {
                name: first.name.clone(),
                coordinate: first.coordinate,
                step_index: last_step,
                is_return: true,
            };
            stops.push(closing);
        }
    }

    let route = Route { stops };
    debug!(
        "built route: {} steps -> {} stops{}",
        itinerary.len(),
        route.len(),
        if route.is_loop() { " (round trip)" } else { "" }
    );
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(activities: &[&str]) -> Vec<ItineraryStep> {
        activities
            .iter()
            .enumerate()
            .map(|(i, a)| ItineraryStep::new(format!("{:02}:00", 8 + i), *a))
            .collect()
    }

    fn names(route: &Route) -> Vec<&str> {
        route.stops.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_round_trip() {
        let registry = LocationRegistry::atitlan();
        let route = build_route(
            &steps(&[
                "Salida desde Panajachel",
                "Llegada a San Juan La Laguna",
                "Regreso a Panajachel",
            ]),
            &registry,
        );

        assert_eq!(names(&route), vec!["Panajachel", "San Juan La Laguna", "Panajachel"]);
        assert!(route.len() >= 3);
        assert!(route.stops[2].is_return);
        assert!(!route.stops[0].is_return);
        assert!(!route.stops[1].is_return);
        assert_eq!(route.stops[2].step_index, 2);
        assert_eq!(route.stops[2].coordinate, route.stops[0].coordinate);
        assert!(route.is_loop());
    }

    #[test]
    fn test_single_stop_is_not_drawable() {
        let registry = LocationRegistry::atitlan();
        let route = build_route(&steps(&["Paseo por San Pedro"]), &registry);
        assert_eq!(route.len(), 1);
        assert!(!route.is_drawable());
        assert!(!route.is_loop());
    }

    #[test]
    fn test_empty_and_unresolvable() {
        let registry = LocationRegistry::atitlan();
        assert!(build_route(&[], &registry).is_empty());

        let route = build_route(&steps(&["Desayuno", "Tiempo libre"]), &registry);
        assert!(route.is_empty());
        assert!(!route.is_drawable());
    }

    #[test]
    fn test_alias_and_name_deduplicate() {
        let registry = LocationRegistry::atitlan();
        let route = build_route(
            &steps(&["Café en el café-bar", "Caminata por Panajachel"]),
            &registry,
        );
        assert_eq!(names(&route), vec!["Panajachel"]);
        assert_eq!(route.stops[0].step_index, 0);
    }

    #[test]
    fn test_mid_itinerary_revisit_dropped() {
        let registry = LocationRegistry::atitlan();
        let route = build_route(
            &steps(&[
                "Lancha a San Marcos",
                "Almuerzo en San Pedro",
                "De vuelta a San Marcos",
                "Tarde en Santiago",
            ]),
            &registry,
        );
        assert_eq!(
            names(&route),
            vec!["San Marcos La Laguna", "San Pedro La Laguna", "Santiago Atitlán"]
        );
        assert!(route.stops.iter().all(|s| !s.is_return));
    }

    #[test]
    fn test_return_requires_last_resolved_step() {
        let registry = LocationRegistry::atitlan();
        // Back at the start mid-way, but the tour ends elsewhere
        let route = build_route(
            &steps(&[
                "Salida de Panajachel",
                "San Antonio Palopó",
                "Pasamos por el muelle",
                "Fin del tour en Santa Cruz",
            ]),
            &registry,
        );
        assert_eq!(
            names(&route),
            vec!["Panajachel", "San Antonio Palopó", "Santa Cruz La Laguna"]
        );
        assert!(!route.is_loop());
    }

    #[test]
    fn test_unresolved_trailing_steps_do_not_break_loop() {
        let registry = LocationRegistry::atitlan();
        let route = build_route(
            &steps(&[
                "Salida de Panajachel",
                "Visita a Santiago",
                "Regreso al muelle",
                "Despedida",
            ]),
            &registry,
        );
        assert_eq!(route.len(), 3);
        assert!(route.is_loop());
        assert_eq!(route.stops[2].step_index, 2);
    }

    #[test]
    fn test_two_mentions_of_one_place_is_not_a_loop() {
        let registry = LocationRegistry::atitlan();
        let route = build_route(&steps(&["Panajachel", "Panajachel otra vez"]), &registry);
        assert_eq!(route.len(), 1);
        assert!(!route.is_loop());
    }

    #[test]
    fn test_order_is_first_appearance() {
        let registry = LocationRegistry::atitlan();
        let route = build_route(
            &steps(&["Sololá", "Santiago", "Sololá", "San Lucas", "Santiago"]),
            &registry,
        );
        assert_eq!(
            names(&route),
            vec!["Sololá", "Santiago Atitlán", "San Lucas Tolimán"]
        );
        let indices: Vec<usize> = route.stops.iter().map(|s| s.step_index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn test_build_is_repeatable() {
        let registry = LocationRegistry::atitlan();
        let itinerary = steps(&["Panajachel", "Santiago", "San Pedro", "Regreso a Panajachel"]);
        assert_eq!(build_route(&itinerary, &registry), build_route(&itinerary, &registry));
    }
}
