//! # Itinerary Map
//!
//! Derives a drawable tour route from free-text itinerary steps and annotates
//! it for a map.
//!
//! This library provides:
//! - Resolution of itinerary prose to curated destinations (alias table,
//!   longest match wins)
//! - Order-preserving route building with round-trip detection
//! - Water-path expansion so lake crossings don't cut across land
//! - Direction chevrons (bearing, midpoint, short-segment filtering)
//! - Scene composition for a map renderer: badges, tooltips, auto-fit viewport
//!   and an animated flow overlay
//!
//! Everything up to scene composition is pure and synchronous. The only
//! recurring work is the flow overlay, see [`flow`].
//!
//! ## Features
//!
//! - **`serde`** - Serialize/deserialize inputs, plans and scenes
//! - **`parallel`** - Plan a whole tour catalog with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use itinerary_map::{ItineraryStep, MapComposer, TourPlanner};
//!
//! let planner = TourPlanner::default(); // Lake Atitlán tables
//! let itinerary = vec![
//!     ItineraryStep::new("08:00", "Salida desde Panajachel"),
//!     ItineraryStep::new("10:00", "Llegada a San Juan La Laguna"),
//!     ItineraryStep::new("14:00", "Regreso a Panajachel"),
//! ];
//!
//! let plan = planner.plan(&itinerary);
//! assert!(plan.route.is_loop());
//!
//! if let Some(scene) = plan.compose(&MapComposer::default()) {
//!     println!("{} badges, {} chevrons", scene.stop_markers.len(), scene.chevrons.len());
//! }
//! ```

use log::{debug, info};

pub mod error;
pub mod geo_utils;

pub mod registry;
pub use registry::{Alias, LocationRegistry, NamedLocation, RegistryBuilder, ResolvedLocation};

pub mod route;
pub use route::{build_route, ItineraryStep, Route, Stop};

pub mod water_path;
pub use water_path::{AugmenterBuilder, WaterPath, WaterPathAugmenter};

pub mod chevrons;
pub use chevrons::{plan_direction_markers, ChevronConfig, DirectionMarker};

// Scene composition and the renderer seam
pub mod map;
pub use map::{
    fit_viewport, BadgePalette, MapComposer, MapRenderer, MapScene, MapStyle,
    MarkerIcon, MarkerSpec, Polyline, PolylineId, PolylineStyle, StopRole,
    Viewport, ViewportConfig,
};

pub mod flow;
pub use flow::{FlowAnimation, FlowConfig, FlowHandle, FlowTask, FrameOutcome};

pub use error::ConfigError;

// ============================================================================
// Core Types
// ============================================================================

/// A latitude/longitude pair in degrees.
///
/// # Example
/// ```
/// use itinerary_map::Coordinate;
/// let panajachel = Coordinate::new(14.7422, -91.1591);
/// assert!(panajachel.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the coordinate is finite and within WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Get the center point of the bounds.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// South-west and north-east corners, in that order.
    pub fn corners(&self) -> [Coordinate; 2] {
        [
            Coordinate::new(self.min_lat, self.min_lng),
            Coordinate::new(self.max_lat, self.max_lng),
        ]
    }
}

// ============================================================================
// Planning
// ============================================================================

/// Tunables for the derivation pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    pub chevrons: ChevronConfig,
}

/// Everything derived from one itinerary.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TourPlan {
    pub route: Route,
    pub water_path: WaterPath,
    pub direction_markers: Vec<DirectionMarker>,
}

impl TourPlan {
    /// Whether a map should be drawn at all (two or more stops).
    pub fn is_drawable(&self) -> bool {
        self.route.is_drawable()
    }

    /// Compose the map scene; `None` when there is nothing to draw.
    pub fn compose(&self, composer: &MapComposer) -> Option<MapScene> {
        composer.compose(&self.route, &self.water_path, &self.direction_markers)
    }
}

/// A catalog tour: identifier plus its itinerary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    pub id: String,
    pub itinerary: Vec<ItineraryStep>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlannedTour {
    pub tour_id: String,
    pub plan: TourPlan,
}

/// Run the full derivation pipeline for one itinerary.
///
/// Routes with fewer than two stops still come back (so callers can inspect
/// them); their water path and markers describe nothing worth drawing.
pub fn plan_tour(
    itinerary: &[ItineraryStep],
    registry: &LocationRegistry,
    augmenter: &WaterPathAugmenter,
    config: &PlannerConfig,
) -> TourPlan {
    let route = build_route(itinerary, registry);
    let water_path = augmenter.build_water_path(&route);
    let direction_markers = plan_direction_markers(water_path.points(), &config.chevrons);

    debug!(
        "planned tour: {} stops, {} path points, {} chevrons",
        route.len(),
        water_path.len(),
        direction_markers.len()
    );

    TourPlan {
        route,
        water_path,
        direction_markers,
    }
}

/// Registry, water-path table and config bundled for repeated planning.
///
/// All parts are read-only once built, so a planner can be shared freely
/// (including across threads).
#[derive(Debug, Clone, Default)]
pub struct TourPlanner {
    registry: LocationRegistry,
    augmenter: WaterPathAugmenter,
    config: PlannerConfig,
}

impl TourPlanner {
    pub fn new(registry: LocationRegistry, augmenter: WaterPathAugmenter, config: PlannerConfig) -> Self {
        Self { registry, augmenter, config }
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub fn augmenter(&self) -> &WaterPathAugmenter {
        &self.augmenter
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan(&self, itinerary: &[ItineraryStep]) -> TourPlan {
        plan_tour(itinerary, &self.registry, &self.augmenter, &self.config)
    }

    /// Plan every tour in a catalog, in catalog order.
    pub fn plan_catalog(&self, tours: &[Tour]) -> Vec<PlannedTour> {
        let start = std::time::Instant::now();

        let planned: Vec<PlannedTour> = tours
            .iter()
            .map(|tour| PlannedTour {
                tour_id: tour.id.clone(),
                plan: self.plan(&tour.itinerary),
            })
            .collect();

        info!(
            "planned {} tours ({} drawable) in {:?}",
            planned.len(),
            planned.iter().filter(|p| p.plan.is_drawable()).count(),
            start.elapsed()
        );
        planned
    }

    /// Plan every tour in a catalog using rayon. Output keeps catalog order.
    #[cfg(feature = "parallel")]
    pub fn plan_catalog_parallel(&self, tours: &[Tour]) -> Vec<PlannedTour> {
        use rayon::prelude::*;

        let start = std::time::Instant::now();

        let planned: Vec<PlannedTour> = tours
            .par_iter()
            .map(|tour| PlannedTour {
                tour_id: tour.id.clone(),
                plan: self.plan(&tour.itinerary),
            })
            .collect();

        info!(
            "planned {} tours in parallel in {:?}",
            planned.len(),
            start.elapsed()
        );
        planned
    }
}

// ============================================================================
// Tests
// ============================================================================
