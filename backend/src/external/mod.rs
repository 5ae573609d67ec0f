//! External API integrations
//!
//! The generative-AI service sits behind [`AgronomyProvider`]; the rest of the
//! backend only sees typed results and [`ProviderError`].

pub mod gemini;
pub mod prompts;
pub mod schemas;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{CropType, Field, SoilAnalysisResult, TaskDraft, WeatherData};
use thiserror::Error;
use uuid::Uuid;

pub use gemini::GeminiClient;

/// Failure of a single provider call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider quota exceeded")]
    QuotaExceeded,

    #[error("Provider is not configured")]
    NotConfigured,

    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    pub fn is_quota(&self) -> bool {
        matches!(self, ProviderError::QuotaExceeded)
    }
}

/// Context for generating a field's initial schedule
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub field_id: Uuid,
    pub crop_type: CropType,
    pub has_irrigation: bool,
    pub plant_date: NaiveDate,
    pub location: String,
}

impl ScheduleRequest {
    pub fn for_field(field: &Field, plant_date: NaiveDate) -> Self {
        Self {
            field_id: field.id,
            crop_type: field.crop_type,
            has_irrigation: field.has_irrigation,
            plant_date,
            location: field.location.clone(),
        }
    }
}

/// Proposed schedule plus an optional climate suitability warning
#[derive(Debug, Clone, Default)]
pub struct ScheduleProposal {
    pub tasks: Vec<TaskDraft>,
    pub warning: Option<String>,
}

/// The four calls the farm service delegates to a generative model
#[async_trait]
pub trait AgronomyProvider: Send + Sync {
    /// Interpret a soil photo or lab report for the given crop and field size
    async fn analyze_soil(
        &self,
        image: &[u8],
        crop_type: CropType,
        size_decares: Decimal,
    ) -> Result<SoilAnalysisResult, ProviderError>;

    /// Propose a season schedule for a newly created field
    async fn generate_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleProposal, ProviderError>;

    /// Turn a stored soil analysis into calendar tasks for the field
    async fn generate_tasks_from_analysis(
        &self,
        field: &Field,
        analysis: &SoilAnalysisResult,
    ) -> Result<Vec<TaskDraft>, ProviderError>;

    /// Current conditions for a free-text location
    async fn current_weather(&self, location: &str) -> Result<WeatherData, ProviderError>;
}
