//! Soil analysis HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::farm::{AnalysisEntry, CalendarUpdate};
use crate::AppState;

/// Soil photo or lab report, base64 encoded (a data URL is accepted)
#[derive(Debug, Deserialize)]
pub struct AnalysisImageInput {
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct AddToCalendarInput {
    #[serde(default)]
    pub replace: bool,
}

/// Decode the uploaded image, stripping a `data:...;base64,` prefix
pub fn decode_image(encoded: &str) -> AppResult<Vec<u8>> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };

    let bytes = BASE64.decode(payload.trim()).map_err(|_| {
        AppError::validation(
            "image",
            "Image must be base64 encoded",
            "Görsel base64 biçiminde olmalıdır.",
        )
    })?;

    if bytes.is_empty() {
        return Err(AppError::validation(
            "image",
            "Image is required",
            "Lütfen bir toprak fotoğrafı yükleyin.",
        ));
    }
    Ok(bytes)
}

/// Analysis history, newest first
pub async fn list_analyses(State(state): State<AppState>) -> Json<Vec<AnalysisEntry>> {
    Json(state.farm.analysis_history().await)
}

/// Analyze a soil image for a field
pub async fn run_analysis(
    State(state): State<AppState>,
    Path(field_id): Path<Uuid>,
    Json(input): Json<AnalysisImageInput>,
) -> AppResult<impl IntoResponse> {
    let image = decode_image(&input.image)?;
    let record = state.farm.run_analysis(field_id, &image).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Generate calendar tasks from an analysis
pub async fn add_to_calendar(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
    Json(input): Json<AddToCalendarInput>,
) -> AppResult<Json<CalendarUpdate>> {
    Ok(Json(
        state
            .farm
            .add_analysis_to_calendar(analysis_id, input.replace)
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_data_url() {
        assert_eq!(decode_image("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(
            decode_image("data:image/jpeg;base64,AQID").unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_decode_rejects_garbage_and_empty() {
        assert!(matches!(
            decode_image("not base64!"),
            Err(AppError::Validation { ref field, .. }) if field == "image"
        ));
        assert!(decode_image("").is_err());
    }
}
