//! Calendar task HTTP handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::Task;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::farm::{CalendarEntry, CalendarView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub field_id: Option<Uuid>,
}

/// Calendar tasks, optionally for one field
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Json<CalendarView> {
    let today = Utc::now().date_naive();
    Json(state.farm.calendar(query.field_id, today).await)
}

/// The next few pending tasks
pub async fn list_urgent_tasks(State(state): State<AppState>) -> Json<Vec<CalendarEntry>> {
    let today = Utc::now().date_naive();
    Json(state.farm.urgent_tasks(today).await)
}

/// Flip a task's completed flag
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<Task>> {
    Ok(Json(state.farm.toggle_task(task_id).await?))
}
