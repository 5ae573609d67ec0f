//! HTTP handler for current weather

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::services::weather::WeatherReport;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub location: Option<String>,
}

/// Get current weather; falls back to a synthetic reading
pub async fn get_current_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Json<WeatherReport> {
    Json(state.farm.weather().current(query.location.as_deref()).await)
}
