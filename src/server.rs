use std::ops::RangeInclusive;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::WikiError;
use crate::wiki::{build_summary, MediaWikiClient, SummaryOptions, WikiSource, YearSummary};

pub const YEAR_RANGE: RangeInclusive<i32> = 1800..=2027;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn WikiSource>,
    pub options: SummaryOptions,
}

impl AppState {
    pub async fn get_year_summary(&self, year: i32) -> Result<YearSummary, WikiError> {
        build_summary(Arc::clone(&self.source), year, self.options).await
    }
}

#[derive(Debug, Serialize)]
pub struct YearResponse {
    pub year: i32,
    pub events_by_month: YearSummary,
}

/// Error body in the `{"detail": ...}` shape the frontend expects.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<WikiError> for ApiError {
    fn from(err: WikiError) -> Self {
        warn!("Year summary failed: {}", err);
        let status = match &err {
            WikiError::RemoteUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WikiError::RemoteRejected { status: 404 } => StatusCode::NOT_FOUND,
            WikiError::RemoteRejected { status: 429 } => StatusCode::TOO_MANY_REQUESTS,
            WikiError::RemoteRejected { .. } | WikiError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            WikiError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

pub fn validate_year(year: i32) -> Result<i32, ApiError> {
    if YEAR_RANGE.contains(&year) {
        Ok(year)
    } else {
        Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!(
                "BAD REQUEST: Year must be between {} and {}",
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            ),
        ))
    }
}

/// GET / - Liveness message
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "WikiCap API is running!" }))
}

/// GET /api/v1/year/:year/wiki - Month-by-month events for one year
async fn year_wiki(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearResponse>, ApiError> {
    let year = validate_year(year)?;
    let events_by_month = state.get_year_summary(year).await?;

    if events_by_month.is_empty() {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("No events found for {}", year),
        ));
    }

    Ok(Json(YearResponse {
        year,
        events_by_month,
    }))
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/year/:year/wiki", get(year_wiki))
        .with_state(state);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", api_routes)
        .layer(CorsLayer::permissive())
}

pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let client = MediaWikiClient::new(settings)?;
    let state = AppState {
        source: Arc::new(client),
        options: settings.summary_options(),
    };

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", settings.bind))?;
    info!("Server running on http://{}", listener.local_addr()?);
    info!("API: http://{}/api/v1/year/1997/wiki", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("Server stopped unexpectedly")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_bounds_inclusive() {
        assert!(validate_year(1800).is_ok());
        assert!(validate_year(2027).is_ok());
        assert_eq!(validate_year(1799).unwrap_err().status, StatusCode::BAD_REQUEST);
        assert_eq!(validate_year(2028).unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn remote_errors_map_to_distinct_statuses() {
        let status = |s| ApiError::from(WikiError::RemoteRejected { status: s }).status;
        assert_eq!(status(404), StatusCode::NOT_FOUND);
        assert_eq!(status(429), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status(500), StatusCode::BAD_GATEWAY);

        let malformed = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(ApiError::from(WikiError::from(malformed)).status, StatusCode::BAD_GATEWAY);
    }
}
