//! Subway API Library
//!
//! This library provides the HTTP API to manage stations, lines and their sections.

mod line;
mod station;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use subway_core::{SectionError, SubwayError, SubwayState};
use tower_http::trace::TraceLayer;

pub use crate::line::{CreateLineRequest, LineResponse, SectionRequest, UpdateLineRequest};
pub use crate::station::CreateStationRequest;

pub(crate) type SharedState = Arc<Mutex<SubwayState>>;

/// Lock the network. A handler that panicked cannot leave a line half
/// modified, so a poisoned lock is still usable.
pub(crate) fn lock(state: &SharedState) -> MutexGuard<'_, SubwayState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn subway_error_to_response(error: SubwayError) -> impl IntoResponse {
    let status = match &error {
        SubwayError::StationNotFound { .. } | SubwayError::LineNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        SubwayError::StationInUse { .. } => StatusCode::CONFLICT,
        SubwayError::UnknownStationName { .. } => StatusCode::BAD_REQUEST,
        SubwayError::Section(section_error) => match section_error {
            SectionError::SameStations { .. } | SectionError::DuplicateEndpoints { .. } => {
                StatusCode::CONFLICT
            }
            SectionError::NonPositiveDistance { .. }
            | SectionError::DisconnectedEndpoints { .. }
            | SectionError::DistanceTooLong { .. }
            | SectionError::InvalidPlacement { .. }
            | SectionError::InvalidTailRemoval { .. }
            | SectionError::SingleSection { .. } => StatusCode::BAD_REQUEST,
            SectionError::IllegalState => StatusCode::INTERNAL_SERVER_ERROR,
        },
    };

    tracing::warn!("Request rejected ({}): {}", status, error);
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(app_state: SubwayState) -> Router {
    let shared_state = Arc::new(Mutex::new(app_state));
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/stations",
            get(station::list_stations).post(station::create_station),
        )
        .route(
            "/stations/{station_id}",
            axum::routing::delete(station::delete_station),
        )
        .route("/lines", get(line::list_lines).post(line::create_line))
        .route(
            "/lines/{line_id}",
            get(line::get_line)
                .put(line::update_line)
                .delete(line::delete_line),
        )
        .route(
            "/lines/{line_id}/sections",
            post(line::add_section).delete(line::remove_section),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use subway_core::StationId;
    use tower::util::ServiceExt;

    pub fn create_test_app() -> Router {
        Router::new().route("/health", get(health_check))
    }

    /// Gangnam, Yangjae, Jeongja and Hapjeong, with line 1 going from
    /// Gangnam to Yangjae over a distance of 100.
    fn test_state() -> SubwayState {
        let mut state = SubwayState::new();
        for name in ["Gangnam", "Yangjae", "Jeongja", "Hapjeong"] {
            state.create_station(name);
        }
        state
            .create_line("Sinbundang", "bg-red-600", 1, 2, 100)
            .unwrap();
        state
    }

    async fn add_section(app: &Router, up: StationId, down: StationId, distance: i64) -> StatusCode {
        let request = SectionRequest {
            up_station_id: up,
            down_station_id: down,
            distance,
        };
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/lines/1/sections")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    async fn line_station_ids(app: &Router) -> Vec<StationId> {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/lines/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let line: LineResponse = serde_json::from_slice(&body).unwrap();
        line.stations.iter().map(|station| station.id).collect()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_last_section() {
        let app = create_app(test_state());

        assert_eq!(add_section(&app, 2, 3, 50).await, StatusCode::OK);
        assert_eq!(line_station_ids(&app).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_add_middle_section() {
        let app = create_app(test_state());

        assert_eq!(add_section(&app, 1, 3, 50).await, StatusCode::OK);
        assert_eq!(line_station_ids(&app).await, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn test_add_first_section() {
        let app = create_app(test_state());

        assert_eq!(add_section(&app, 3, 1, 50).await, StatusCode::OK);
        assert_eq!(line_station_ids(&app).await, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_add_wrong_distance_section() {
        let app = create_app(test_state());

        for distance in [-1, 0, 100, 101] {
            assert_eq!(
                add_section(&app, 1, 3, distance).await,
                StatusCode::BAD_REQUEST
            );
        }
        assert_eq!(line_station_ids(&app).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_add_already_registered_stations() {
        let app = create_app(test_state());

        assert_eq!(add_section(&app, 1, 2, 50).await, StatusCode::CONFLICT);
        assert_eq!(add_section(&app, 2, 1, 50).await, StatusCode::CONFLICT);
        // Same station on both ends
        assert_eq!(add_section(&app, 1, 1, 50).await, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_add_unregistered_stations() {
        let app = create_app(test_state());

        assert_eq!(add_section(&app, 3, 4, 50).await, StatusCode::BAD_REQUEST);
        assert_eq!(line_station_ids(&app).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_integration_add_and_remove_section() {
        let app = create_app(test_state());

        assert_eq!(add_section(&app, 2, 3, 50).await, StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/lines/1/sections?stationId=3")
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(line_station_ids(&app).await, vec![1, 2]);

        // The line is back to a single section
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/lines/1/sections?stationId=2")
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("single section"));
    }
}
