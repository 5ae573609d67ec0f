//! Field management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{Field, FieldInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::store::DeletedCounts;
use crate::AppState;

/// List all fields
pub async fn list_fields(State(state): State<AppState>) -> Json<Vec<Field>> {
    Json(state.farm.list_fields().await)
}

/// Get a specific field
pub async fn get_field(
    State(state): State<AppState>,
    Path(field_id): Path<Uuid>,
) -> AppResult<Json<Field>> {
    Ok(Json(state.farm.get_field(field_id).await?))
}

/// Create a field; its schedule is generated in the background
pub async fn create_field(
    State(state): State<AppState>,
    Json(input): Json<FieldInput>,
) -> AppResult<impl IntoResponse> {
    let (field, _schedule) = state.farm.create_field(input).await?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// Update a field
pub async fn update_field(
    State(state): State<AppState>,
    Path(field_id): Path<Uuid>,
    Json(input): Json<FieldInput>,
) -> AppResult<Json<Field>> {
    Ok(Json(state.farm.update_field(field_id, input).await?))
}

#[derive(Debug, Deserialize)]
pub struct DeleteFieldQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Delete a field with its tasks and analyses; requires `?confirm=true`
pub async fn delete_field(
    State(state): State<AppState>,
    Path(field_id): Path<Uuid>,
    Query(query): Query<DeleteFieldQuery>,
) -> AppResult<Json<DeletedCounts>> {
    Ok(Json(state.farm.delete_field(field_id, query.confirm).await?))
}
