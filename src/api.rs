//! REST API for the parking search.
//!
//! Provides endpoints for:
//! - Liveness (`GET /`), health and info
//! - Searching a vehicle manifest (`POST /`, `POST /search`)
//! - Reloading the listings dataset
//! - Swagger UI at /q/swagger-ui

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::console;
use crate::domain::LocationGroups;
use crate::dto::{
    manifest_to_requirements, ErrorResponse, HealthResponse, InfoResponse, ManifestViolation,
    OkResponse, ReloadResponse, SearchResultDto, VehicleDto,
};
use crate::loader::{load_grouped_listings, LoadError};
use crate::ranker::rank_locations;
use crate::search::SearchConfig;

/// Response header listing locations whose search hit a limit.
pub const INCOMPLETE_HEADER: &str = "x-search-incomplete";

/// Application state shared across handlers.
///
/// Searches take a snapshot of the dataset; a reload swaps it without
/// touching searches already running.
pub struct AppState {
    listings: RwLock<Arc<LocationGroups>>,
    listings_path: Option<PathBuf>,
    search: SearchConfig,
}

impl AppState {
    pub fn new(listings: LocationGroups, search: SearchConfig) -> Self {
        Self {
            listings: RwLock::new(Arc::new(listings)),
            listings_path: None,
            search,
        }
    }

    /// Remembers where the dataset came from so it can be reloaded.
    pub fn with_listings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.listings_path = Some(path.into());
        self
    }

    /// Current dataset.
    pub fn snapshot(&self) -> Arc<LocationGroups> {
        self.listings.read().clone()
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }
}

/// Errors returned by the handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid manifest: {0}")]
    InvalidManifest(ManifestViolation),

    #[error("no listings file configured")]
    NoListingsPath,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidManifest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NoListingsPath => StatusCode::CONFLICT,
            ApiError::Load(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(status = %status, error = %self, "Request failed");
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Creates the API router with CORS and Swagger UI enabled.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & Info
        .route("/", get(root).post(search))
        .route("/health", get(health))
        .route("/info", get(info))
        // Search
        .route("/search", post(search))
        // Dataset
        .route("/listings/reload", post(reload_listings))
        // Swagger UI at /q/swagger-ui (Quarkus-style path)
        .merge(SwaggerUi::new("/q/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Health & Info
// ============================================================================

/// GET / - Liveness check.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is alive", body = OkResponse))
)]
async fn root() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

/// GET /health - Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// GET /info - Application info endpoint.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "Application info", body = InfoResponse))
)]
async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Parking Search",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: "Exhaustive combination search",
        prefilter: state.search.prefilter.as_str(),
    })
}

// ============================================================================
// Search
// ============================================================================

/// POST /search - Rank locations for a vehicle manifest.
///
/// The manifest is sorted longest first before searching. The response lists
/// feasible locations only, cheapest first. Locations whose search hit a
/// limit are named, comma separated, in the `X-Search-Incomplete` header.
#[utoipa::path(
    post,
    path = "/search",
    request_body = Vec<VehicleDto>,
    responses(
        (status = 200, description = "Feasible locations, cheapest first", body = Vec<SearchResultDto>,
            headers(("x-search-incomplete" = String, description = "Locations whose search hit a limit"))),
        (status = 422, description = "Invalid manifest", body = ErrorResponse)
    )
)]
async fn search(
    State(state): State<Arc<AppState>>,
    Json(manifest): Json<Vec<VehicleDto>>,
) -> Result<(HeaderMap, Json<Vec<SearchResultDto>>), ApiError> {
    let requirements = manifest_to_requirements(&manifest).map_err(ApiError::InvalidManifest)?;
    let groups = state.snapshot();
    let config = state.search.clone();
    let search_id = Uuid::new_v4().to_string();
    let vehicles: u64 = requirements.iter().map(|r| r.quantity).sum();

    info!(
        search_id = %search_id,
        vehicles,
        locations = groups.len(),
        "Starting search"
    );

    let ranking =
        tokio::task::spawn_blocking(move || rank_locations(&groups, &requirements, &config)).await?;

    info!(
        search_id = %search_id,
        feasible = ranking.entries.len(),
        aborted = ranking.incomplete.len(),
        nodes = ranking.statistics.nodes_explored,
        duration_ms = ranking.statistics.time_total.as_millis() as u64,
        "Search complete"
    );
    console::print_search_summary(&search_id, vehicles, &ranking);

    let mut headers = HeaderMap::new();
    if !ranking.incomplete.is_empty() {
        let ids = ranking
            .incomplete
            .iter()
            .map(|l| l.location_id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        match HeaderValue::from_str(&ids) {
            Ok(value) => {
                headers.insert(INCOMPLETE_HEADER, value);
            }
            Err(_) => warn!(search_id = %search_id, "Incomplete location ids not header-safe"),
        }
    }

    let results = ranking
        .into_entries()
        .into_iter()
        .map(SearchResultDto::from)
        .collect();
    Ok((headers, Json(results)))
}

// ============================================================================
// Dataset
// ============================================================================

/// POST /listings/reload - Re-read the listings file.
#[utoipa::path(
    post,
    path = "/listings/reload",
    responses(
        (status = 200, description = "Dataset reloaded", body = ReloadResponse),
        (status = 409, description = "No listings file configured", body = ErrorResponse),
        (status = 500, description = "Listings file unreadable", body = ErrorResponse)
    )
)]
async fn reload_listings(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, ApiError> {
    let path = state.listings_path.clone().ok_or(ApiError::NoListingsPath)?;
    let groups = tokio::task::spawn_blocking(move || load_grouped_listings(path)).await??;

    let response = ReloadResponse {
        locations: groups.len(),
        listings: groups.listing_count(),
    };
    *state.listings.write() = Arc::new(groups);

    Ok(Json(response))
}

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(root, health, info, search, reload_listings),
    components(schemas(
        OkResponse,
        HealthResponse,
        InfoResponse,
        VehicleDto,
        SearchResultDto,
        ReloadResponse,
        ErrorResponse,
    ))
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Listing;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use std::io::Write;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let groups = LocationGroups::from_listings(vec![
            Listing::new("big", 30, 30, 400, "locC"),
            Listing::new("s1", 20, 20, 150, "locC"),
            Listing::new("s2", 10, 20, 80, "locC"),
            Listing::new("x1", 20, 20, 100, "locX"),
            Listing::new("n1", 10, 10, 50, "locN"),
        ]);
        Arc::new(AppState::new(groups, SearchConfig::default()))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let (status, _, value) = send_with_headers(app, method, uri, body).await;
        (status, value)
    }

    async fn send_with_headers(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, value)
    }

    #[tokio::test]
    async fn test_root_reports_ok() {
        let app = create_router(test_state());
        let (status, body) = send(app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let app = create_router(test_state());
        let (status, body) = send(app.clone(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");

        let (status, body) = send(app, Method::GET, "/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prefilter"], "head");
    }

    #[tokio::test]
    async fn test_search_ranks_cheapest_first() {
        let app = create_router(test_state());
        // Unsorted on purpose: the handler sorts longest first.
        let manifest = r#"[{"length": 10, "quantity": 1}, {"length": 20, "quantity": 2}]"#;
        let (status, body) = send(app, Method::POST, "/", Some(manifest)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"location_id": "locC", "listing_ids": ["s1", "s2"], "total_price_in_cents": 230}
            ])
        );
    }

    #[tokio::test]
    async fn test_search_results_sorted_by_price() {
        let app = create_router(test_state());
        let manifest = r#"[{"length": 10, "quantity": 1}]"#;
        let (status, body) = send(app, Method::POST, "/search", Some(manifest)).await;

        assert_eq!(status, StatusCode::OK);
        let prices: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["total_price_in_cents"].as_u64().unwrap())
            .collect();
        assert_eq!(prices, vec![50, 80, 100]);
    }

    #[tokio::test]
    async fn test_search_with_no_feasible_location_is_empty() {
        let app = create_router(test_state());
        let manifest = r#"[{"length": 100, "quantity": 1}]"#;
        let (status, body) = send(app, Method::POST, "/", Some(manifest)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_complete_search_has_no_incomplete_header() {
        let app = create_router(test_state());
        let manifest = r#"[{"length": 10, "quantity": 1}]"#;
        let (status, headers, _) = send_with_headers(app, Method::POST, "/", Some(manifest)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(INCOMPLETE_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_aborted_locations_named_in_header() {
        let groups = LocationGroups::from_listings(vec![
            Listing::new("a1", 10, 10, 50, "locA"),
            Listing::new("b1", 10, 10, 60, "locB"),
        ]);
        // Every search stops at its first node.
        let config = SearchConfig::default().with_node_limit(0);
        let app = create_router(Arc::new(AppState::new(groups, config)));

        let manifest = r#"[{"length": 10, "quantity": 1}]"#;
        let (status, headers, body) =
            send_with_headers(app, Method::POST, "/search", Some(manifest)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
        assert_eq!(headers.get(INCOMPLETE_HEADER).unwrap(), "locA,locB");
    }

    #[tokio::test]
    async fn test_zero_quantity_is_unprocessable() {
        let app = create_router(test_state());
        let manifest = r#"[{"length": 10, "quantity": 0}]"#;
        let (status, body) = send(app, Method::POST, "/", Some(manifest)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("quantity"));
    }

    #[tokio::test]
    async fn test_negative_length_is_rejected() {
        let app = create_router(test_state());
        let manifest = r#"[{"length": -10, "quantity": 1}]"#;
        let (status, _) = send(app, Method::POST, "/", Some(manifest)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_reload_without_path_conflicts() {
        let app = create_router(test_state());
        let (status, _) = send(app, Method::POST, "/listings/reload", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reload_swaps_dataset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[{"id": "r1", "length": 50, "width": 10, "location_id": "fresh", "price_in_cents": 10}]"#,
        )
        .unwrap();

        let state = Arc::new(
            AppState::new(LocationGroups::new(), SearchConfig::default())
                .with_listings_path(file.path()),
        );
        let app = create_router(state.clone());

        let (status, body) = send(app.clone(), Method::POST, "/listings/reload", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"locations": 1, "listings": 1}));
        assert_eq!(state.snapshot().len(), 1);

        let manifest = r#"[{"length": 50, "quantity": 1}]"#;
        let (_, body) = send(app, Method::POST, "/", Some(manifest)).await;
        assert_eq!(body[0]["location_id"], "fresh");
    }
}
