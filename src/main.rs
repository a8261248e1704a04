mod query;
mod settings;

use std::sync::Arc;

use anyhow::Context;
use stowpath_navigation::{InMemoryGeometryStore, PathfindingService};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

use settings::DEFAULT_CONFIG_PATH;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = settings::load_settings(&config_path)
        .with_context(|| format!("loading settings from {}", config_path))?;
    let layouts = settings::load_layouts(&settings.layout_path)
        .with_context(|| format!("loading layouts from {}", settings.layout_path.display()))?;

    let store: InMemoryGeometryStore = layouts.into_iter().collect();
    info!(
        warehouses = store.len(),
        queries = settings.queries.len(),
        "Stowpath planner started"
    );
    let service = PathfindingService::with_settings(Arc::new(store), settings.planner, settings.tuning);

    let tasks: Vec<_> = settings
        .queries
        .into_iter()
        .map(|request| {
            let service = service.clone();
            let kind = request.kind();
            (kind, tokio::spawn(async move { query::run(&service, request).await }))
        })
        .collect();

    let mut rejected = 0;
    for (index, (kind, task)) in tasks.into_iter().enumerate() {
        let outcome = task
            .await
            .with_context(|| format!("query {} ({}) did not finish", index, kind))?;
        match outcome {
            Ok(outcome) => {
                info!(query = index, kind, success = outcome.success(), "query finished");
                let json = serde_json::to_string_pretty(&outcome).context("serializing result")?;
                println!("{}", json);
            }
            Err(err) => {
                rejected += 1;
                error!(query = index, kind, error = %err, "query rejected");
            }
        }
    }

    if rejected > 0 {
        anyhow::bail!("{} of the configured queries were rejected", rejected);
    }
    Ok(())
}
