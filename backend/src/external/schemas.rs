//! Typed response schemas for the generative provider
//!
//! Model output is loosely shaped JSON. Each schema here accepts it leniently
//! and converts it into domain values with explicit coercion rules:
//! - a missing or unparseable start date becomes one week from today
//! - an unparseable end date, or one before the start, is dropped
//! - a task with an unknown type or blank title is skipped

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use shared::{
    validate_organic_matter, validate_ph, NutrientLevel, SoilAnalysisResult, TaskDraft, TaskType,
    WeatherData,
};

use super::{ProviderError, ScheduleProposal};

/// Days ahead used for a task whose start date could not be read
pub const DEFAULT_TASK_OFFSET_DAYS: i64 = 7;

/// Accept strings and numbers, treat anything else as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Soil analysis as returned by the model
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSoilAnalysis {
    pub ph: f64,
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub organic_matter: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub calculated_fertilizer_amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ideal_planting_time: Option<String>,
}

/// A task entry as returned by the model
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub task_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// Schedule envelope: `{ "tasks": [...], "warning": "..." | null }`
#[derive(Debug, Default, Deserialize)]
pub struct RawSchedule {
    #[serde(default)]
    pub tasks: Vec<RawTask>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub warning: Option<String>,
}

/// Analysis task list: a bare array, or the schedule envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawTaskList {
    List(Vec<RawTask>),
    Wrapped { tasks: Vec<RawTask> },
}

impl RawTaskList {
    pub fn into_tasks(self) -> Vec<RawTask> {
        match self {
            RawTaskList::List(tasks) => tasks,
            RawTaskList::Wrapped { tasks } => tasks,
        }
    }
}

/// Weather reading as returned by the model
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeather {
    pub temp: f64,
    pub condition: String,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub rain_chance: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub radar_image_url: Option<String>,
}

/// Strip a Markdown code fence the model sometimes wraps JSON in
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Decode model output text into one of the raw schemas
pub fn decode<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, ProviderError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))
}

fn decimal(value: f64, attribute: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| ProviderError::Parse(format!("{} is not a finite number", attribute)))
}

fn nutrient(value: &str, attribute: &str) -> Result<NutrientLevel, ProviderError> {
    value
        .parse()
        .map_err(|e| ProviderError::Parse(format!("{}: {}", attribute, e)))
}

impl TryFrom<RawSoilAnalysis> for SoilAnalysisResult {
    type Error = ProviderError;

    fn try_from(raw: RawSoilAnalysis) -> Result<Self, Self::Error> {
        let ph = decimal(raw.ph, "ph")?;
        validate_ph(ph).map_err(|e| ProviderError::Parse(e.to_string()))?;
        let organic_matter = decimal(raw.organic_matter, "organicMatter")?;
        validate_organic_matter(organic_matter).map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(SoilAnalysisResult {
            ph,
            nitrogen: nutrient(&raw.nitrogen, "nitrogen")?,
            phosphorus: nutrient(&raw.phosphorus, "phosphorus")?,
            potassium: nutrient(&raw.potassium, "potassium")?,
            organic_matter,
            recommendations: raw.recommendations,
            calculated_fertilizer_amount: raw.calculated_fertilizer_amount,
            ideal_planting_time: raw
                .ideal_planting_time
                .filter(|t| !t.trim().is_empty()),
        })
    }
}

impl TryFrom<RawWeather> for WeatherData {
    type Error = ProviderError;

    fn try_from(raw: RawWeather) -> Result<Self, Self::Error> {
        Ok(WeatherData {
            temp: decimal(raw.temp, "temp")?,
            condition: raw.condition,
            humidity: raw.humidity.round().clamp(0.0, 100.0) as i32,
            wind_speed: decimal(raw.wind_speed, "windSpeed")?,
            rain_chance: raw.rain_chance.round().clamp(0.0, 100.0) as i32,
            radar_image_url: raw.radar_image_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive ISO timestamp
pub fn parse_provider_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Coerce one raw task; `None` when the entry cannot become a task at all
pub fn coerce_task(raw: RawTask, today: NaiveDate) -> Option<TaskDraft> {
    let title = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    let Some(title) = title else {
        tracing::warn!("Skipping provider task without a title");
        return None;
    };

    let task_type = match raw.task_type.as_deref().map(str::parse::<TaskType>) {
        Some(Ok(task_type)) => task_type,
        _ => {
            tracing::warn!(title = %title, task_type = ?raw.task_type, "Skipping provider task with unknown type");
            return None;
        }
    };

    let date = match raw.date.as_deref().and_then(parse_provider_date) {
        Some(date) => date,
        None => {
            tracing::warn!(title = %title, date = ?raw.date, "Invalid task date, defaulting to one week ahead");
            today + Duration::days(DEFAULT_TASK_OFFSET_DAYS)
        }
    };

    let end_date = match raw.end_date.as_deref() {
        None => None,
        Some(value) => {
            let parsed = parse_provider_date(value);
            if parsed.is_none() {
                tracing::warn!(title = %title, end_date = %value, "Dropping unparseable task end date");
            }
            parsed
        }
    };

    let description = raw.description.filter(|d| !d.trim().is_empty());
    Some(TaskDraft::new(title, task_type, date, end_date, description))
}

pub fn coerce_tasks(raw: Vec<RawTask>, today: NaiveDate) -> Vec<TaskDraft> {
    raw.into_iter().filter_map(|task| coerce_task(task, today)).collect()
}

impl RawSchedule {
    pub fn into_proposal(self, today: NaiveDate) -> ScheduleProposal {
        ScheduleProposal {
            tasks: coerce_tasks(self.tasks, today),
            warning: self.warning.filter(|w| !w.trim().is_empty()),
        }
    }
}
