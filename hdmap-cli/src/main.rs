//! HDMap CLI - Command-line interface
//!
//! Loads a Lanelet2 map under a memory budget and runs example spatial
//! queries around a configurable ego position.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::info;

use hdmap::geometry::{BoundingBox, Point2d};
use hdmap::logging::{default_log_dir, default_log_file, init_logging};
use hdmap::map::QueryResult;
use hdmap::store::{MapStore, MemoryBudget};

/// Half-width of the example region query, in meters.
const REGION_HALF_SIZE_M: f64 = 50.0;

#[derive(Debug, Clone, ValueEnum)]
enum BudgetProfile {
    /// Conservative default budget (64 MiB, 10k lanes)
    Default,
    /// Budget sized for the embedded mapping board (128 MiB, 20k lanes)
    EmbeddedBoard,
}

impl BudgetProfile {
    fn to_budget(&self) -> MemoryBudget {
        match self {
            BudgetProfile::Default => MemoryBudget::default(),
            BudgetProfile::EmbeddedBoard => MemoryBudget::embedded_board(),
        }
    }
}

#[derive(Parser)]
#[command(name = "hdmap")]
#[command(version = hdmap::VERSION)]
#[command(about = "Load a Lanelet2 map and run spatial queries", long_about = None)]
struct Args {
    /// Path to the map file (.osm, optionally gzip compressed as .gz)
    map: PathBuf,

    /// Memory budget profile to enforce
    #[arg(long, value_enum, default_value = "default")]
    budget: BudgetProfile,

    /// Ego x position for the example queries, in meters
    #[arg(long, default_value = "50.0")]
    ego_x: f64,

    /// Ego y position for the example queries, in meters
    #[arg(long, default_value = "50.0")]
    ego_y: f64,

    /// Radius for the example radius query, in meters
    #[arg(long, default_value = "50.0")]
    radius: f64,
}

fn main() {
    let args = Args::parse();

    let _logging_guard = match init_logging(default_log_dir(), default_log_file()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {}", e);
            process::exit(1);
        }
    };

    info!("HDMap v{}", hdmap::VERSION);

    let mut store = MapStore::new(args.budget.to_budget());

    println!("Loading map from: {}", args.map.display());
    if let Err(e) = store.load_from_file(&args.map) {
        eprintln!("Error loading map: {}", e);
        process::exit(1);
    }

    println!("Map loaded successfully!");
    println!();
    println!("Map Statistics:");
    println!("  Lanes: {}", store.lane_count());
    println!("  Traffic Lights: {}", store.traffic_light_count());
    println!("  Traffic Signs: {}", store.traffic_sign_count());
    println!(
        "  Memory Usage: {:.2} MB (budget {:.2} MB)",
        store.estimated_memory_usage() as f64 / 1_048_576.0,
        store.budget().max_total_bytes as f64 / 1_048_576.0
    );
    println!();

    let ego = Point2d::new(args.ego_x, args.ego_y);

    println!("=== Example Queries ===");
    println!();

    let region = BoundingBox::new(
        Point2d::new(ego.x - REGION_HALF_SIZE_M, ego.y - REGION_HALF_SIZE_M),
        Point2d::new(ego.x + REGION_HALF_SIZE_M, ego.y + REGION_HALF_SIZE_M),
    );
    println!("1. Querying region {} to {}:", region.min, region.max);
    print_query_result(&store.query_region(&region));

    println!();
    println!("2. Querying {:.1} m radius around {}:", args.radius, ego);
    print_query_result(&store.query_radius(&ego, args.radius));

    println!();
    println!("3. Finding closest lane to {}:", ego);
    match store.closest_lane(&ego) {
        Some(lane) => {
            println!("  Found lane ID: {}", lane.id);
            println!("  Points in centerline: {}", lane.centerline.len());
            println!(
                "  Traffic lights on lane: {}",
                store.traffic_lights_for_lane(lane.id).len()
            );
            println!(
                "  Traffic signs on lane: {}",
                store.traffic_signs_for_lane(lane.id).len()
            );
        }
        None => println!("  No lane found nearby"),
    }
}

fn print_query_result(result: &QueryResult) {
    println!("Query Results:");
    println!("  Lanes: {}", result.lanes.len());
    println!("  Traffic Lights: {}", result.traffic_lights.len());
    println!("  Traffic Signs: {}", result.traffic_signs.len());

    if !result.lanes.is_empty() {
        println!();
        println!("  Lane Details:");
        for lane in &result.lanes {
            println!(
                "    ID: {}, Points: {}, Speed Limit: {:.0} km/h",
                lane.id,
                lane.centerline.len(),
                lane.speed_limit * 3.6
            );
        }
    }
}
