use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_client::CatalogClient;
use stockpile_common::{Config, MemoryRepository};
use stockpile_inventory::{
    dispatch, CatalogItem, CatalogMirror, EventInbox, GrantPolicy, GrantService, InventoryItem,
};

mod routes;

pub struct AppState {
    pub grants: GrantService,
    pub inbox: EventInbox,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stockpile=info".parse()?))
        .init();

    info!("Stockpile inventory service starting...");

    let config = Config::from_env();
    let grant_policy = GrantPolicy::parse(&config.grant_policy).ok_or_else(|| {
        anyhow::anyhow!(
            "GRANT_POLICY must be 'accumulate' or 'overwrite', got '{}'",
            config.grant_policy
        )
    })?;

    // In-memory stores; a document store slots in behind the same trait.
    let mirror_repo = Arc::new(MemoryRepository::<CatalogItem>::new());
    let inventory_repo = Arc::new(MemoryRepository::<InventoryItem>::new());

    let catalog = CatalogClient::new(&config.catalog_base_url);
    let grants = GrantService::new(
        inventory_repo,
        mirror_repo.clone(),
        catalog,
        grant_policy,
    );

    let mirror = Arc::new(CatalogMirror::new(mirror_repo));
    let (inbox, consumer) = dispatch::consumer(mirror);
    tokio::spawn(consumer);

    let state = Arc::new(AppState { grants, inbox });

    let app = Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/inventory/items", post(routes::grant_items))
        .route("/inventory/items/{user_id}", get(routes::user_items))
        .route("/events/catalog", post(routes::catalog_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(addr = addr.as_str(), "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
