//! Error handling for the Digital Farmer platform
//!
//! Provides consistent error responses in Turkish and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_tr: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Destructive operations the caller has not confirmed
    #[error("Confirmation required: {message}")]
    ConfirmationRequired {
        message: String,
        message_tr: String,
    },

    // External service errors
    #[error("AI provider quota exceeded")]
    ProviderQuotaExceeded,
}

impl AppError {
    pub fn validation(field: &str, message: &str, message_tr: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_tr: message_tr.to_string(),
        }
    }
}

/// Turkish message for a rejected field input attribute
fn field_message_tr(field: &str) -> &'static str {
    match field {
        "size_decares" => "Lütfen geçerli ve pozitif bir tarla büyüklüğü giriniz.",
        "name" => "Tarla adı boş bırakılamaz.",
        "location" => "Konum boş bırakılamaz.",
        _ => "Girilen bilgiler geçersiz.",
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the first offending attribute, in a stable order
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().copied().collect();
        fields.sort_unstable();

        match fields.first().copied() {
            Some(field) => {
                let message = field_errors
                    .get(field)
                    .and_then(|errs| errs.first())
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                AppError::validation(field, &message, field_message_tr(field))
            }
            None => AppError::validation("input", "Invalid input", field_message_tr("input")),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_tr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message, message_tr } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_tr: message_tr.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_tr: format!("{} bulunamadı", resource),
                    field: None,
                },
            ),
            AppError::ConfirmationRequired { message, message_tr } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFIRMATION_REQUIRED".to_string(),
                    message_en: message.clone(),
                    message_tr: message_tr.clone(),
                    field: None,
                },
            ),
            AppError::ProviderQuotaExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorDetail {
                    code: "PROVIDER_QUOTA_EXCEEDED".to_string(),
                    message_en: "The system is busy (quota exceeded). Please try again later."
                        .to_string(),
                    message_tr: "Sistem yoğunluğu (Kota Aşımı). Lütfen daha sonra tekrar deneyiniz."
                        .to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
