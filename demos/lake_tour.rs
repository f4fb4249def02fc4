//! Plan a Lake Atitlán round trip and draw it on a console "renderer".
//!
//! Run with: cargo run --example lake_tour

use itinerary_map::{
    Coordinate, FlowConfig, FlowTask, FrameOutcome, ItineraryStep, MapComposer, MapRenderer,
    MarkerIcon, MarkerSpec, PolylineId, PolylineStyle, TourPlanner,
};

/// Prints every drawing call instead of drawing.
#[derive(Default)]
struct ConsoleRenderer {
    next_line: u32,
}

impl MapRenderer for ConsoleRenderer {
    fn fit_bounds(&mut self, points: &[Coordinate], padding: u32, max_zoom: f64) {
        println!(
            "   fit bounds {:?} padding={}px max_zoom={}",
            points, padding, max_zoom
        );
    }

    fn set_view(&mut self, center: Coordinate, zoom: f64) {
        println!("   center on {:?} at zoom {}", center, zoom);
    }

    fn place_marker(&mut self, marker: &MarkerSpec) {
        let icon = match &marker.icon {
            MarkerIcon::Numbered { number, role, .. } => format!("#{} ({:?})", number, role),
            MarkerIcon::StartEnd { .. } => "start/end".to_string(),
            MarkerIcon::Chevron { rotation, .. } => format!("chevron {:.0}°", rotation),
        };
        println!(
            "   marker {:<12} at ({:.4}, {:.4}) {}",
            icon,
            marker.position.latitude,
            marker.position.longitude,
            marker.tooltip.as_deref().unwrap_or("")
        );
    }

    fn draw_polyline(&mut self, points: &[Coordinate], style: &PolylineStyle) -> PolylineId {
        let id = PolylineId(self.next_line);
        self.next_line += 1;
        println!(
            "   polyline {:?}: {} points, {} dash={:?}",
            id,
            points.len(),
            style.color,
            style.dash_array
        );
        id
    }

    fn set_dash_offset(&mut self, line: PolylineId, offset: f64) {
        println!("   redraw {:?} dash offset {:.1}", line, offset);
    }
}

fn main() {
    let itinerary = vec![
        ItineraryStep::new("08:00", "Salida desde el muelle de Panajachel"),
        ItineraryStep::new("09:00", "Llegada a San Juan La Laguna, visita a la tostaduría"),
        ItineraryStep::new("11:30", "Almuerzo libre"),
        ItineraryStep::new("12:30", "Lancha a Santiago Atitlán"),
        ItineraryStep::new("16:00", "Regreso a Panajachel"),
    ];

    let planner = TourPlanner::default();
    let plan = planner.plan(&itinerary);

    println!("Lake tour\n");
    println!("1. Route ({} stops, round trip: {}):", plan.route.len(), plan.route.is_loop());
    for stop in &plan.route {
        println!(
            "   step {} -> {}{}",
            stop.step_index,
            stop.name,
            if stop.is_return { " (return)" } else { "" }
        );
    }

    println!(
        "\n2. Water path: {} points, {} direction markers\n",
        plan.water_path.len(),
        plan.direction_markers.len()
    );

    let composer = MapComposer::default();
    let Some(scene) = plan.compose(&composer) else {
        println!("Nothing to draw");
        return;
    };

    println!("3. Drawing:");
    let mut renderer = ConsoleRenderer::default();
    let flow_line = scene.render(&mut renderer);

    println!("\n4. Flow animation (60fps, hidden after 3 frames):");
    let (mut task, handle) = FlowTask::start(
        flow_line,
        &composer.style().flow_line,
        &FlowConfig::default(),
        &renderer,
    );
    for frame in 0..6 {
        if frame == 3 {
            handle.set_visible(false);
            println!("   (map scrolled out of view)");
        }
        let now_ms = frame as f64 * 16.7;
        if task.on_frame(now_ms, &mut renderer) == FrameOutcome::Stopped {
            break;
        }
    }
    handle.stop();
    println!("   view torn down: {:?}", task.on_frame(200.0, &mut renderer));
}
