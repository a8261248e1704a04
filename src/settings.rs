use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use stowpath_geometry::Point2D;
use stowpath_navigation::{PathOptions, PlannerTuning, WarehouseLayout};
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Runner settings: request defaults, tuning, where the layouts live and
/// what to ask for.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub planner: PathOptions,
    #[serde(default)]
    pub tuning: PlannerTuning,
    pub layout_path: PathBuf,
    #[serde(default)]
    pub queries: Vec<Query>,
}

/// One planning request, as written in the settings file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Query {
    Pallet {
        warehouse_id: i64,
        pallet_id: i64,
        #[serde(default)]
        start: Option<Point2D>,
        #[serde(default)]
        options: Option<PathOptions>,
    },
    Points {
        warehouse_id: i64,
        #[serde(default)]
        start: Option<Point2D>,
        #[serde(default)]
        goal: Option<Point2D>,
        #[serde(default)]
        options: Option<PathOptions>,
    },
    Pallets {
        warehouse_id: i64,
        pallet_ids: Vec<i64>,
        #[serde(default)]
        start: Option<Point2D>,
        #[serde(default)]
        options: Option<PathOptions>,
    },
}

impl Query {
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Pallet { .. } => "pallet",
            Query::Points { .. } => "points",
            Query::Pallets { .. } => "pallets",
        }
    }
}

#[derive(Debug, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    warehouses: Vec<WarehouseLayout>,
}

/// Loads settings from `path`, overridden by `STOWPATH_*` variables
/// (`STOWPATH_PLANNER__CELL_SIZE=0.25`).
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("STOWPATH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!(
                cell_size = %settings.planner.cell_size,
                queries = settings.queries.len(),
                "Successfully loaded configuration"
            );
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Reads every `[[warehouses]]` entry of a layout file.
pub fn load_layouts(path: &Path) -> Result<Vec<WarehouseLayout>, ConfigError> {
    let file: LayoutFile = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .build()?
        .try_deserialize()?;
    info!(
        path = %path.display(),
        warehouses = file.warehouses.len(),
        "Loaded warehouse layouts"
    );
    Ok(file.warehouses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml<T: serde::de::DeserializeOwned>(text: &str) -> T {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = from_toml(r#"layout_path = "config/warehouse.toml""#);
        assert_eq!(settings.planner, PathOptions::default());
        assert_eq!(settings.tuning, PlannerTuning::default());
        assert!(settings.queries.is_empty());
    }

    #[test]
    fn test_tagged_queries() {
        let settings: Settings = from_toml(
            r#"
            layout_path = "layouts.toml"

            [planner]
            cell_size = 0.25
            avoid_zones = true

            [[queries]]
            kind = "pallet"
            warehouse_id = 1
            pallet_id = 7

            [[queries]]
            kind = "points"
            warehouse_id = 1
            start = { x = 0.5, z = 1 }
            goal = { x = "9.75", z = 9 }

            [[queries]]
            kind = "pallets"
            warehouse_id = 1
            pallet_ids = [3, 1, 2]
            options = { allow_diagonals = false }
            "#,
        );

        assert_eq!(settings.planner.cell_size, stowpath_geometry::Fixed::from_millis(250));
        assert!(settings.planner.avoid_zones);
        assert_eq!(settings.planner.max_iterations, PathOptions::default().max_iterations);

        let kinds: Vec<_> = settings.queries.iter().map(Query::kind).collect();
        assert_eq!(kinds, vec!["pallet", "points", "pallets"]);
        assert!(matches!(
            settings.queries[1],
            Query::Points { goal: Some(goal), .. } if goal == Point2D::from_millis(9_750, 9_000)
        ));
        assert!(matches!(
            &settings.queries[2],
            Query::Pallets { pallet_ids, options: Some(options), .. }
                if pallet_ids == &[3, 1, 2] && !options.allow_diagonals
        ));
    }

    #[test]
    fn test_layout_file() {
        let file: LayoutFile = from_toml(
            r#"
            [[warehouses]]
            id = 1
            length = 10
            width = 8.5

            [[warehouses.racks]]
            id = 1
            position_x = 2
            position_z = 2
            length = 4
            width = 1
            shelf_ids = [10, 11]
            "#,
        );
        assert_eq!(file.warehouses.len(), 1);
        assert_eq!(file.warehouses[0].racks[0].shelf_ids, vec![10, 11]);
        assert!(file.warehouses[0].pallets.is_empty());
    }
}
