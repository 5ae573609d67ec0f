//! Route definitions for the Digital Farmer API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/fields", field_routes())
        .nest("/tasks", task_routes())
        .nest("/analyses", analysis_routes())
        .route("/weather", get(handlers::get_current_weather))
}

/// Field management routes
fn field_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_fields).post(handlers::create_field))
        .route(
            "/:field_id",
            get(handlers::get_field)
                .put(handlers::update_field)
                .delete(handlers::delete_field),
        )
        .route("/:field_id/analyses", post(handlers::run_analysis))
}

/// Calendar routes
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tasks))
        .route("/urgent", get(handlers::list_urgent_tasks))
        .route("/:task_id/toggle", post(handlers::toggle_task))
}

/// Soil analysis routes
fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_analyses))
        .route("/:analysis_id/calendar", post(handlers::add_to_calendar))
}
