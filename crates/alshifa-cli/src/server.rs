//! HTTP boundary for the clinic agents

use std::sync::Arc;

use alshifa_core::Error;
use alshifa_core::agents::ClinicAgents;
use alshifa_core::api::{self, FinanceSummary, HealthReport, InventoryRow};
use alshifa_core::config::ServerConfig;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Header carrying the caller's role for dashboard reads
pub const ROLE_HEADER: &str = "x-clinic-role";

/// Core errors rendered as JSON responses
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::UnknownAgent(_) => StatusCode::NOT_FOUND,
            Error::AccessDenied(_) => StatusCode::FORBIDDEN,
            Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Serialization(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(code = self.0.code(), error = %self.0, "Request failed");
        }
        let body = Json(json!({
            "status": "error",
            "code": self.0.code(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    agents: Arc<ClinicAgents>,
}

impl AppState {
    pub fn new(agents: Arc<ClinicAgents>) -> Self {
        Self { agents }
    }
}

/// Caller role from the role header
///
/// A missing or undecodable header is an empty role, which the gate rejects.
fn role_from(headers: &HeaderMap) -> &str {
    headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

async fn agent_handler(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("agent_request", %request_id, endpoint = %endpoint);
    let response = span.in_scope(|| api::dispatch(&state.agents, &endpoint, body))?;
    Ok(Json(response))
}

async fn inventory_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InventoryRow>>, ApiError> {
    Ok(Json(api::inventory_overview(&state.agents, role_from(&headers))?))
}

async fn finance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FinanceSummary>, ApiError> {
    Ok(Json(api::finance_summary(&state.agents, role_from(&headers))?))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::collect(&state.agents))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static(ROLE_HEADER)]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the router over a set of agents
pub fn router(agents: Arc<ClinicAgents>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/agent/:endpoint", post(agent_handler))
        .route("/doctor/inventory", get(inventory_handler))
        .route("/doctor/finance", get(finance_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(&config.allowed_origins))
        .with_state(AppState::new(agents))
}

/// Serve until Ctrl-C
pub async fn serve(agents: Arc<ClinicAgents>, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = router(agents, config);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, origins = ?config.allowed_origins, "Al-Shifa API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
