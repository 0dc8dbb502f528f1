// Business Center Atlas - Web Server
// Read-only JSON API for the browser dashboard, with Axum

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use business_center_atlas::{
    basic_totals, build_report, export_rows, logging, AnalyticsFilter, AtlasConfig,
    BusinessCenter, ClientCategory, GeoBounds, RecordIndex, Totals,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Shared application state; the dataset never changes after startup
#[derive(Clone)]
struct AppState {
    index: Arc<RecordIndex>,
    top_limit: usize,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct ZoneQuery {
    north: Option<f64>,
    south: Option<f64>,
    east: Option<f64>,
    west: Option<f64>,
}

impl ZoneQuery {
    /// All four edges present and finite
    fn bounds(&self) -> Result<GeoBounds, String> {
        let edge = |name: &str, value: Option<f64>| match value {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(format!("Zone edge {} is not a finite number: {}", name, v)),
            None => Err(format!("Missing zone edge: {}", name)),
        };

        Ok(GeoBounds::new(
            edge("north", self.north)?,
            edge("south", self.south)?,
            edge("east", self.east)?,
            edge("west", self.west)?,
        ))
    }
}

#[derive(Deserialize)]
struct AnalyticsQuery {
    district: Option<String>,
    building_type: Option<String>,
    limit: Option<usize>,
}

/// Zone response: the normalized bounds, the centers inside, and their totals
#[derive(Serialize)]
struct ZoneResponse {
    bounds: GeoBounds,
    totals: Totals,
    kt_share_percent: Option<f64>,
    business_centers: Vec<BusinessCenter>,
}

#[derive(Serialize)]
struct FiltersResponse {
    categories: Vec<&'static str>,
    districts: Vec<String>,
    building_types: Vec<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/business-centers?category=all|kt|non-kt
async fn get_business_centers(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> impl IntoResponse {
    let category = match query.category.as_deref().unwrap_or("all").parse::<ClientCategory>() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<Vec<BusinessCenter>>::err(e.to_string())),
            )
                .into_response()
        }
    };

    let centers: Vec<BusinessCenter> = state
        .index
        .filter_by_client_category(category)
        .into_iter()
        .cloned()
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(centers))).into_response()
}

/// GET /api/business-centers/:key - One center with its companies
async fn get_business_center(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    match state.index.get(&key) {
        Some(bc) => (StatusCode::OK, Json(ApiResponse::ok(bc.clone()))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<BusinessCenter>::err(format!(
                "Business center not found: {}",
                key
            ))),
        )
            .into_response(),
    }
}

/// GET /api/zone?north=&south=&east=&west= - Zone statistics
async fn get_zone(State(state): State<AppState>, Query(query): Query<ZoneQuery>) -> impl IntoResponse {
    let bounds = match query.bounds() {
        Ok(bounds) => bounds,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ZoneResponse>::err(message)),
            )
                .into_response()
        }
    };
    let selected = state.index.filter_by_bounds(&bounds);
    let totals = basic_totals(&selected);

    let response = ZoneResponse {
        bounds,
        kt_share_percent: totals.kt_share_percent(),
        totals,
        business_centers: selected.into_iter().cloned().collect(),
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/analytics?district=&building_type=&limit= - Analytics page data
async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> impl IntoResponse {
    let filter =
        AnalyticsFilter::from_selection(query.district.as_deref(), query.building_type.as_deref());
    let limit = query.limit.unwrap_or(state.top_limit);

    Json(ApiResponse::ok(build_report(state.index.records(), &filter, limit)))
}

/// GET /api/filters - Values for the category, district and building selectors
async fn get_filters(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(FiltersResponse {
        categories: vec![
            ClientCategory::All.as_str(),
            ClientCategory::KtClient.as_str(),
            ClientCategory::NonKtClient.as_str(),
        ],
        districts: state.index.districts(),
        building_types: state.index.building_types(),
    }))
}

/// GET /api/export - One row per business center, unfiltered
async fn get_export(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(export_rows(state.index.records())))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{:?}", e);
        eprintln!("❌ {:?}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AtlasConfig::load(None)?;
    logging::init(&config.log_level);

    info!("🌐 Business Center Atlas v{} - Web Server", business_center_atlas::VERSION);

    let (index, report) = RecordIndex::from_file(&config.dataset_path, config.load_policy)?;
    info!("✓ Dataset loaded from {:?}: {}", config.dataset_path, report.summary());

    let state = AppState {
        index: Arc::new(index),
        top_limit: config.top_limit,
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/business-centers", get(get_business_centers))
        .route("/business-centers/:key", get(get_business_center))
        .route("/zone", get(get_zone))
        .route("/analytics", get(get_analytics))
        .route("/filters", get(get_filters))
        .route("/export", get(get_export))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;

    info!("🚀 Server running on http://{}", config.bind_addr);
    info!("   API: http://{}/api/business-centers", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(north: Option<f64>, south: Option<f64>, east: Option<f64>, west: Option<f64>) -> ZoneQuery {
        ZoneQuery { north, south, east, west }
    }

    #[test]
    fn test_zone_query_normalizes_edges() {
        let bounds = zone(Some(51.1), Some(51.2), Some(71.4), Some(71.5)).bounds().unwrap();

        assert_eq!(bounds.north, 51.2);
        assert_eq!(bounds.south, 51.1);
        assert_eq!(bounds.east, 71.5);
        assert_eq!(bounds.west, 71.4);
    }

    #[test]
    fn test_zone_query_rejects_non_finite_edges() {
        let err = zone(Some(f64::NAN), Some(51.1), Some(71.5), Some(71.4)).bounds().unwrap_err();
        assert!(err.contains("north"));

        let err = zone(Some(51.2), Some(51.1), Some(f64::INFINITY), Some(71.4)).bounds().unwrap_err();
        assert!(err.contains("east"));
    }

    #[test]
    fn test_zone_query_rejects_missing_edge() {
        let err = zone(Some(51.2), Some(51.1), Some(71.5), None).bounds().unwrap_err();
        assert_eq!(err, "Missing zone edge: west");
    }

    #[test]
    fn test_zone_query_tolerates_absent_key_until_validated() {
        let query: ZoneQuery = serde_json::from_str(
            r#"{"north": 51.2, "south": 51.1, "east": 71.5}"#,
        )
        .unwrap();
        assert!(query.bounds().is_err());
    }
}
