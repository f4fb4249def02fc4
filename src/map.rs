//! # Map Composition
//!
//! Assembles a [`MapScene`] from a route, its water path and the planned
//! direction markers, then applies it to whatever draws the map through the
//! [`MapRenderer`] trait.
//!
//! ## Markers
//!
//! | Stop | Icon | Tooltip |
//! |------|------|---------|
//! | first stop of a round trip | [`MarkerIcon::StartEnd`] | `"<name> (Start / Return)"` |
//! | closing stop of a round trip | none | none |
//! | first stop otherwise | `Numbered` / [`StopRole::First`] | name |
//! | last stop of a one-way route | `Numbered` / [`StopRole::Last`] | name |
//! | everything else | `Numbered` / [`StopRole::Middle`] | name |
//!
//! Numbers follow route position, so a round trip's intermediate stops start
//! at 2.
//!
//! ## Viewport
//!
//! Two or more path points fit the bounds with padding and a zoom ceiling;
//! a single point centres at a fixed zoom; no points means no map.

use log::debug;

use crate::chevrons::DirectionMarker;
use crate::geo_utils::compute_bounds;
use crate::route::Route;
use crate::water_path::WaterPath;
use crate::{Bounds, Coordinate};

// ============================================================================
// Style & configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ViewportConfig {
    /// Padding around fitted bounds, in screen pixels. Default: 40
    pub padding: u32,
    /// Zoom ceiling when fitting bounds, so two close stops don't fill the screen.
    /// Default: 14.0
    pub max_zoom: f64,
    /// Zoom used when there is a single point to centre on. Default: 13.0
    pub single_point_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            padding: 40,
            max_zoom: 14.0,
            single_point_zoom: 13.0,
        }
    }
}

/// Badge colours by stop role (CSS colour strings).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BadgePalette {
    pub first: String,
    pub middle: String,
    pub last: String,
    pub start_end: String,
    pub chevron: String,
}

impl Default for BadgePalette {
    fn default() -> Self {
        Self {
            first: "#16a34a".to_string(),
            middle: "#475569".to_string(),
            last: "#dc2626".to_string(),
            start_end: "#7c3aed".to_string(),
            chevron: "#0369a1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PolylineStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    /// Alternating dash/gap lengths in pixels; `None` draws a solid line
    pub dash_array: Option<Vec<f64>>,
    pub dash_offset: f64,
}

impl PolylineStyle {
    pub fn solid(color: impl Into<String>, weight: f64, opacity: f64) -> Self {
        Self {
            color: color.into(),
            weight,
            opacity,
            dash_array: None,
            dash_offset: 0.0,
        }
    }

    pub fn dashed(color: impl Into<String>, weight: f64, opacity: f64, dash_array: Vec<f64>) -> Self {
        Self {
            dash_array: Some(dash_array),
            ..Self::solid(color, weight, opacity)
        }
    }

    /// Length of one dash/gap cycle, if the line is dashed.
    pub fn dash_period(&self) -> Option<f64> {
        let period: f64 = self.dash_array.as_ref()?.iter().sum();
        (period > 0.0).then_some(period)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MapStyle {
    pub palette: BadgePalette,
    pub viewport: ViewportConfig,
    /// The visible route line
    pub route_line: PolylineStyle,
    /// The animated dashed overlay drawn on top of the route line
    pub flow_line: PolylineStyle,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            palette: BadgePalette::default(),
            viewport: ViewportConfig::default(),
            route_line: PolylineStyle::solid("#0ea5e9", 4.0, 0.6),
            flow_line: PolylineStyle::dashed("#ffffff", 2.0, 0.9, vec![8.0, 12.0]),
        }
    }
}

// ============================================================================
// Scene types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopRole {
    First,
    Middle,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum MarkerIcon {
    /// Numbered badge for a stop
    Numbered {
        number: usize,
        role: StopRole,
        color: String,
    },
    /// Combined start/end badge for a round trip's first stop
    StartEnd { color: String },
    /// Direction glyph; `rotation` in degrees for a right-pointing glyph
    Chevron { rotation: f64, color: String },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerSpec {
    pub position: Coordinate,
    pub icon: MarkerIcon,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    pub points: Vec<Coordinate>,
    pub style: PolylineStyle,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "camelCase"))]
pub enum Viewport {
    FitBounds {
        bounds: Bounds,
        padding: u32,
        max_zoom: f64,
    },
    Center { center: Coordinate, zoom: f64 },
}

/// Everything needed to draw one tour map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MapScene {
    pub stop_markers: Vec<MarkerSpec>,
    pub chevrons: Vec<MarkerSpec>,
    pub route_line: Polyline,
    pub flow_line: Polyline,
    pub viewport: Viewport,
}

// ============================================================================
// Rendering collaborator
// ============================================================================

/// Handle to a polyline drawn by a [`MapRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolylineId(pub u32);

/// The drawing surface. Implemented by the host's map library binding.
pub trait MapRenderer {
    /// Fit the view to enclose `points`, with pixel padding and a zoom ceiling.
    fn fit_bounds(&mut self, points: &[Coordinate], padding: u32, max_zoom: f64);

    fn set_view(&mut self, center: Coordinate, zoom: f64);

    fn place_marker(&mut self, marker: &MarkerSpec);

    fn draw_polyline(&mut self, points: &[Coordinate], style: &PolylineStyle) -> PolylineId;

    /// Update a dashed line's offset and redraw it.
    fn set_dash_offset(&mut self, line: PolylineId, offset: f64);

    /// On-screen length of a drawn line in pixels, if the renderer knows it.
    fn rendered_length(&self, _line: PolylineId) -> Option<f64> {
        None
    }
}

impl MapScene {
    /// Draw the scene. Returns the flow overlay's handle for animation.
    pub fn render<R: MapRenderer + ?Sized>(&self, renderer: &mut R) -> PolylineId {
        renderer.draw_polyline(&self.route_line.points, &self.route_line.style);
        let flow = renderer.draw_polyline(&self.flow_line.points, &self.flow_line.style);

        // Chevrons first so stop badges sit on top
        for marker in self.chevrons.iter().chain(&self.stop_markers) {
            renderer.place_marker(marker);
        }

        match &self.viewport {
            Viewport::FitBounds { bounds, padding, max_zoom } => {
                renderer.fit_bounds(&bounds.corners(), *padding, *max_zoom);
            }
            Viewport::Center { center, zoom } => renderer.set_view(*center, *zoom),
        }

        flow
    }
}

// ============================================================================
// Composition
// ============================================================================

/// Decide the viewport for a set of points. `None` when there is nothing to show.
///
/// # Example
///
/// ```rust
/// use itinerary_map::{fit_viewport, Coordinate, Viewport, ViewportConfig};
///
/// let config = ViewportConfig::default();
/// assert!(fit_viewport(&[], &config).is_none());
///
/// let one = [Coordinate::new(14.74, -91.16)];
/// assert!(matches!(fit_viewport(&one, &config), Some(Viewport::Center { .. })));
/// ```
pub fn fit_viewport(points: &[Coordinate], config: &ViewportConfig) -> Option<Viewport> {
    match points {
        [] => None,
        [only] => Some(Viewport::Center {
            center: *only,
            zoom: config.single_point_zoom,
        }),
        _ => compute_bounds(points).map(|bounds| Viewport::FitBounds {
            bounds,
            padding: config.padding,
            max_zoom: config.max_zoom,
        }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapComposer {
    style: MapStyle,
}

impl MapComposer {
    pub fn new(style: MapStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    /// Compose the scene, or `None` when the route is too short to draw.
    pub fn compose(
        &self,
        route: &Route,
        water_path: &WaterPath,
        direction_markers: &[DirectionMarker],
    ) -> Option<MapScene> {
        if !route.is_drawable() {
            debug!("route has {} stop(s); nothing to draw", route.len());
            return None;
        }
        let viewport = fit_viewport(water_path.points(), &self.style.viewport)?;

        let stop_markers = self.stop_markers(route);
        let chevrons = direction_markers
            .iter()
            .map(|m| MarkerSpec {
                position: m.position,
                icon: MarkerIcon::Chevron {
                    rotation: m.rotation,
                    color: self.style.palette.chevron.clone(),
                },
                tooltip: None,
            })
            .collect();

        Some(MapScene {
            stop_markers,
            chevrons,
            route_line: Polyline {
                points: water_path.points.clone(),
                style: self.style.route_line.clone(),
            },
            flow_line: Polyline {
                points: water_path.points.clone(),
                style: self.style.flow_line.clone(),
            },
            viewport,
        })
    }

    fn stop_markers(&self, route: &Route) -> Vec<MarkerSpec> {
        let palette = &self.style.palette;
        let is_loop = route.is_loop();
        let last_index = route.iter().rposition(|s| !s.is_return);

        route
            .iter()
            .enumerate()
            .filter(|(_, stop)| !stop.is_return)
            .map(|(i, stop)| {
                let (icon, tooltip) = if is_loop && i == 0 {
                    (
                        MarkerIcon::StartEnd {
                            color: palette.start_end.clone(),
                        },
                        format!("{} (Start / Return)", stop.name),
                    )
                } else {
                    let role = if i == 0 {
                        StopRole::First
                    } else if !is_loop && Some(i) == last_index {
                        StopRole::Last
                    } else {
                        StopRole::Middle
                    };
                    let color = match role {
                        StopRole::First => &palette.first,
                        StopRole::Middle => &palette.middle,
                        StopRole::Last => &palette.last,
                    };
                    (
                        MarkerIcon::Numbered {
                            number: i + 1,
                            role,
                            color: color.clone(),
                        },
                        stop.name.clone(),
                    )
                };

                MarkerSpec {
                    position: stop.coordinate,
                    icon,
                    tooltip: Some(tooltip),
                }
            })
            .collect()
    }
}
