use anyhow::Context;
use stowpath_geometry::{Fixed, Point2D};
use stowpath_navigation::{
    PalletRecord, PathOptions, Planner, PlannerTuning, RackRecord, WarehouseLayout, WarehouseSnapshot,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug shows the search outcome of every leg.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Two racks with an aisle between them and a pallet on the floor.
    let layout = WarehouseLayout {
        id: 1,
        length: Fixed::from_int(12),
        width: Fixed::from_int(8),
        racks: vec![
            RackRecord {
                id: 1,
                position_x: Fixed::from_int(2),
                position_z: Fixed::from_int(2),
                length: Fixed::from_int(6),
                width: Fixed::ONE,
                shelf_ids: vec![11, 12],
                ..Default::default()
            },
            RackRecord {
                id: 2,
                position_x: Fixed::from_int(2),
                position_z: Fixed::from_int(5),
                length: Fixed::from_int(6),
                width: Fixed::ONE,
                shelf_ids: vec![21, 22],
                ..Default::default()
            },
        ],
        pallets: vec![
            PalletRecord {
                id: 1,
                length: Fixed::from_millis(1_200),
                width: Fixed::from_millis(800),
                position_x: Fixed::from_int(4),
                position_z: Fixed::from_millis(5_100),
                shelf_id: Some(21),
                ..Default::default()
            },
            PalletRecord {
                id: 2,
                length: Fixed::from_millis(1_200),
                width: Fixed::from_millis(800),
                position_x: Fixed::from_int(10),
                position_z: Fixed::from_int(6),
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    let snapshot = WarehouseSnapshot::build(&layout).context("building the sample warehouse")?;
    let planner = Planner::new(&snapshot, PlannerTuning::default());
    let options = PathOptions::default();

    let start = Point2D::from_millis(500, 500);
    let goal = Point2D::from_millis(11_000, 7_500);
    println!("Start: {}, Goal: {}", start, goal);

    let grid = planner.render_path_between(start, goal, &options)?;
    println!("\nGrid with path:\n{}", grid);

    let result = planner.path_between(start, goal, &options)?;
    println!("\n{}", result);
    for point in &result.points {
        println!("  {}", point);
    }

    let route = planner.path_to_pallets(&[1, 2], start, &PathOptions::pallet_approach());
    println!("\n{}", route);

    #[cfg(feature = "serde")]
    println!("\n{}", serde_json::to_string_pretty(&route)?);

    Ok(())
}
