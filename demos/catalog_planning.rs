//! Plan a whole tour catalog in parallel.
//!
//! Run with: cargo run --example catalog_planning --features parallel

use itinerary_map::{ItineraryStep, Tour, TourPlanner};

fn main() {
    let templates: Vec<Vec<ItineraryStep>> = vec![
        vec![
            ItineraryStep::new("08:00", "Salida desde Panajachel"),
            ItineraryStep::new("10:00", "Llegada a San Juan La Laguna"),
            ItineraryStep::new("14:00", "Regreso a Panajachel"),
        ],
        vec![
            ItineraryStep::new("05:00", "Caminata a la Nariz del Indio"),
            ItineraryStep::new("09:00", "Desayuno en San Juan"),
        ],
        vec![ItineraryStep::new("10:00", "Clase de cocina en San Pedro")],
        vec![
            ItineraryStep::new("07:00", "Lancha desde Panajachel"),
            ItineraryStep::new("08:00", "Santa Cruz La Laguna"),
            ItineraryStep::new("10:00", "Kayak en Tzununá"),
            ItineraryStep::new("13:00", "San Marcos"),
            ItineraryStep::new("17:00", "Regreso al muelle"),
        ],
    ];

    let tours: Vec<Tour> = (0..200)
        .map(|i| Tour {
            id: format!("tour-{:03}", i),
            itinerary: templates[i % templates.len()].clone(),
        })
        .collect();

    let planner = TourPlanner::default();

    let start = std::time::Instant::now();
    let sequential = planner.plan_catalog(&tours);
    let sequential_time = start.elapsed();

    let start = std::time::Instant::now();
    let parallel = planner.plan_catalog_parallel(&tours);
    let parallel_time = start.elapsed();

    assert_eq!(sequential, parallel);

    let drawable = parallel.iter().filter(|p| p.plan.is_drawable()).count();
    let loops = parallel.iter().filter(|p| p.plan.route.is_loop()).count();

    println!("Catalog planning\n");
    println!("  tours:      {}", tours.len());
    println!("  drawable:   {}", drawable);
    println!("  round trips: {}", loops);
    println!("  sequential: {:?}", sequential_time);
    println!("  parallel:   {:?}", parallel_time);
}
