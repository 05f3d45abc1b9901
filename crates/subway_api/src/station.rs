use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use subway_core::{Station, StationId};

use crate::{SharedState, lock, subway_error_to_response};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    pub name: String,
}

/// Register a new station
pub async fn create_station(
    State(app_state): State<SharedState>,
    Json(payload): Json<CreateStationRequest>,
) -> impl IntoResponse {
    let mut state = lock(&app_state);
    let station = state.create_station(payload.name);
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/stations/{}", station.id))],
        Json(station),
    )
}

/// Get every registered station
pub async fn list_stations(State(app_state): State<SharedState>) -> Json<Vec<Station>> {
    tracing::info!("Listing stations");
    let state = lock(&app_state);
    Json(state.stations().cloned().collect())
}

pub async fn delete_station(
    State(app_state): State<SharedState>,
    Path(station_id): Path<StationId>,
) -> impl IntoResponse {
    let mut state = lock(&app_state);
    match state.delete_station(station_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    pub use axum::{Router, routing::delete, routing::get};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::{Arc, Mutex};
    use subway_core::SubwayState;
    use tower::util::ServiceExt;

    use crate::ErrorResponse;

    /// Create the application router with station endpoints
    pub fn create_app(app_state: SubwayState) -> Router {
        let shared_state = Arc::new(Mutex::new(app_state));
        Router::new()
            .route("/stations", get(list_stations).post(create_station))
            .route("/stations/{station_id}", delete(delete_station))
            .with_state(shared_state)
    }

    #[tokio::test]
    async fn test_create_station() {
        let app = create_app(SubwayState::new());

        let create_request = CreateStationRequest {
            name: "Gangnam".to_string(),
        };

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stations")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&create_request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/stations/1");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let station: Station = serde_json::from_slice(&body).unwrap();
        assert_eq!(station.id, 1);
        assert_eq!(station.name, "Gangnam");
    }

    #[tokio::test]
    async fn test_list_stations_empty() {
        let app = create_app(SubwayState::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let stations: Vec<Station> = serde_json::from_slice(&body).unwrap();
        assert!(stations.is_empty());
    }

    #[tokio::test]
    async fn test_delete_station() {
        let mut state = SubwayState::new();
        state.create_station("Gangnam");
        state.create_station("Yangjae");
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/stations/1")
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let stations: Vec<Station> = serde_json::from_slice(&body).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Yangjae");
    }

    #[tokio::test]
    async fn test_delete_station_in_use() {
        let mut state = SubwayState::new();
        state.create_station("Gangnam");
        state.create_station("Yangjae");
        state
            .create_line("Sinbundang", "bg-red-600", 1, 2, 100)
            .unwrap();
        let app = create_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stations/2")
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("is used by line 1"));
    }

    #[tokio::test]
    async fn test_delete_station_not_found() {
        let app = create_app(SubwayState::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stations/7")
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
