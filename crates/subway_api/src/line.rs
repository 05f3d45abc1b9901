use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use subway_core::{Line, LineId, Station, StationId, SubwayError};

use crate::{SharedState, lock, subway_error_to_response};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineRequest {
    pub name: String,
    pub color: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSectionQuery {
    pub station_id: StationId,
}

/// A line with its stations in order, from the up-end to the down-end.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<Station>,
}

impl LineResponse {
    fn of(line: &Line) -> Result<Self, SubwayError> {
        Ok(LineResponse {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            stations: line.stations()?,
        })
    }
}

/// Create a line from its first section
pub async fn create_line(
    State(app_state): State<SharedState>,
    Json(payload): Json<CreateLineRequest>,
) -> impl IntoResponse {
    let mut state = lock(&app_state);
    let created = state
        .create_line(
            payload.name,
            payload.color,
            payload.up_station_id,
            payload.down_station_id,
            payload.distance,
        )
        .and_then(LineResponse::of);
    match created {
        Ok(line) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/lines/{}", line.id))],
            Json(line),
        )
            .into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}

/// List every line with its stations
pub async fn list_lines(State(app_state): State<SharedState>) -> impl IntoResponse {
    tracing::info!("Listing lines");
    let state = lock(&app_state);
    match state
        .lines()
        .map(LineResponse::of)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(lines) => (StatusCode::OK, Json(lines)).into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}

pub async fn get_line(
    State(app_state): State<SharedState>,
    Path(line_id): Path<LineId>,
) -> impl IntoResponse {
    let state = lock(&app_state);
    match state.line(line_id).and_then(LineResponse::of) {
        Ok(line) => (StatusCode::OK, Json(line)).into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}

/// Rename or recolor a line
pub async fn update_line(
    State(app_state): State<SharedState>,
    Path(line_id): Path<LineId>,
    Json(payload): Json<UpdateLineRequest>,
) -> impl IntoResponse {
    let mut state = lock(&app_state);
    match state
        .update_line(line_id, payload.name, payload.color)
        .and_then(LineResponse::of)
    {
        Ok(line) => (StatusCode::OK, Json(line)).into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}

pub async fn delete_line(
    State(app_state): State<SharedState>,
    Path(line_id): Path<LineId>,
) -> impl IntoResponse {
    let mut state = lock(&app_state);
    match state.delete_line(line_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}

/// Add a section to a line, returning the line with its updated stations
pub async fn add_section(
    State(app_state): State<SharedState>,
    Path(line_id): Path<LineId>,
    Json(payload): Json<SectionRequest>,
) -> impl IntoResponse {
    let mut state = lock(&app_state);
    match state
        .add_section(
            line_id,
            payload.up_station_id,
            payload.down_station_id,
            payload.distance,
        )
        .and_then(LineResponse::of)
    {
        Ok(line) => (StatusCode::OK, Json(line)).into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}

/// Remove the last section of a line, which must end at the given station
pub async fn remove_section(
    State(app_state): State<SharedState>,
    Path(line_id): Path<LineId>,
    Query(query): Query<RemoveSectionQuery>,
) -> impl IntoResponse {
    let mut state = lock(&app_state);
    match state.remove_section(line_id, query.station_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => subway_error_to_response(error).into_response(),
    }
}
