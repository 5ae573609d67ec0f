//! Generative model client
//!
//! Talks to a `generateContent` style REST endpoint and implements
//! [`AgronomyProvider`] on top of it.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{CropType, Field, SoilAnalysisResult, TaskDraft, WeatherData};

use super::schemas::{self, RawSchedule, RawSoilAnalysis, RawTaskList, RawWeather};
use super::{prompts, AgronomyProvider, ProviderError, ScheduleProposal, ScheduleRequest};
use crate::config::AiConfig;

/// Client for the hosted generative model
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: EmptyObject,
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

/// Response body of `generateContent`
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Map a failed HTTP exchange to a provider error
pub fn classify_failure(status: StatusCode, body: &str) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        return ProviderError::QuotaExceeded;
    }
    ProviderError::Request(format!("API returned {}: {}", status, body))
}

impl GeminiClient {
    /// Create a new client against the public endpoint
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(
            api_key,
            "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model,
            timeout,
        )
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Build a client from configuration; `None` when no API key is set
    pub fn from_config(config: &AiConfig) -> Option<Result<Self, ProviderError>> {
        let api_key = config.api_key()?;
        Some(Self::with_base_url(
            api_key.to_string(),
            config.base_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one prompt and return the model's text answer
    async fn generate(&self, parts: Vec<Part>, use_search: bool) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
            tools: if use_search {
                vec![Tool {
                    google_search: EmptyObject {},
                }]
            } else {
                Vec::new()
            },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_failure(status, &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse response: {}", e)))?;

        body.text().ok_or(ProviderError::EmptyResponse)
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[async_trait]
impl AgronomyProvider for GeminiClient {
    async fn analyze_soil(
        &self,
        image: &[u8],
        crop_type: CropType,
        size_decares: Decimal,
    ) -> Result<SoilAnalysisResult, ProviderError> {
        let parts = vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: "image/jpeg".to_string(),
                    data: BASE64.encode(image),
                },
            },
            Part::Text {
                text: prompts::soil_analysis(crop_type, size_decares),
            },
        ];
        let text = self.generate(parts, false).await?;
        let raw: RawSoilAnalysis = schemas::decode(&text)?;
        SoilAnalysisResult::try_from(raw)
    }

    async fn generate_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleProposal, ProviderError> {
        let today = Self::today();
        let parts = vec![Part::Text {
            text: prompts::schedule(request, today),
        }];
        let text = self.generate(parts, false).await?;
        let raw: RawSchedule = schemas::decode(&text)?;
        Ok(raw.into_proposal(today))
    }

    async fn generate_tasks_from_analysis(
        &self,
        field: &Field,
        analysis: &SoilAnalysisResult,
    ) -> Result<Vec<TaskDraft>, ProviderError> {
        let today = Self::today();
        let parts = vec![Part::Text {
            text: prompts::tasks_from_analysis(field, analysis, today),
        }];
        let text = self.generate(parts, false).await?;
        let raw: RawTaskList = schemas::decode(&text)?;
        Ok(schemas::coerce_tasks(raw.into_tasks(), today))
    }

    async fn current_weather(&self, location: &str) -> Result<WeatherData, ProviderError> {
        let parts = vec![Part::Text {
            text: prompts::weather(location),
        }];
        let text = self.generate(parts, true).await?;
        let raw: RawWeather = schemas::decode(&text)?;
        WeatherData::try_from(raw)
    }
}
