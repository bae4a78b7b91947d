//! Parking Search - Axum Server

use std::sync::Arc;

use parking_search::api::{create_router, AppState};
use parking_search::config::AppConfig;
use parking_search::domain::LocationGroups;
use parking_search::{console, loader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("parking_search=info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    console::print_banner();

    // A missing dataset is not fatal; POST /listings/reload can load it later.
    let groups = match loader::load_grouped_listings(&config.listings_path) {
        Ok(groups) => groups,
        Err(e) => {
            warn!(error = %e, "Starting with an empty dataset");
            LocationGroups::new()
        }
    };
    console::print_dataset(groups.len(), groups.listing_count());

    info!(
        prefilter = config.search.prefilter.as_str(),
        node_limit = ?config.search.node_limit,
        time_limit = ?config.search.time_limit,
        "Search configured"
    );

    let state = AppState::new(groups, config.search.clone()).with_listings_path(&config.listings_path);
    let app = create_router(Arc::new(state));

    println!("Server listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
