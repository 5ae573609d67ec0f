//! WebAssembly module for Digital Farmer
//!
//! Provides client-side rendering helpers so the browser shows the same
//! derived views as the server:
//! - Task date ranges in Turkish
//! - "Analiz N" labels
//! - Nutrient chart scores and urgent task lists
//! - Synthetic weather and field size validation for offline use

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use shared::{
    analysis_display_label, format_date_range, nutrient_score_from_str, urgent_tasks,
    validate_field_size, AnalysisRecord, CropType, Task, WeatherData,
};
use wasm_bindgen::prelude::*;

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("Invalid date {}: {}", value, e))
}

fn to_js(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn label_for(record_json: &str, records_json: &str) -> Result<String, String> {
    let record: AnalysisRecord = parse_json(record_json, "analysis record")?;
    let records: Vec<AnalysisRecord> = parse_json(records_json, "analysis records")?;
    Ok(analysis_display_label(&record, &records))
}

fn urgent_json(tasks_json: &str) -> Result<String, String> {
    let tasks: Vec<Task> = parse_json(tasks_json, "tasks")?;
    serde_json::to_string(&urgent_tasks(&tasks)).map_err(|e| e.to_string())
}

fn size_error(size_decares: f64) -> Option<&'static str> {
    let size = Decimal::try_from(size_decares).unwrap_or(Decimal::ZERO);
    validate_field_size(size).err()
}

/// Today in the browser's local time zone
fn browser_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("digital-farmer-wasm loaded"));
}

/// "15 Ekim", "15 - 20 Ekim" or "25 Ekim - 5 Kasım" for a task
#[wasm_bindgen]
pub fn format_task_date(task_json: &str) -> Result<String, JsValue> {
    let task: Task = parse_json(task_json, "task").map_err(to_js)?;
    Ok(shared::format_task_date_range(&task))
}

/// Same as [`format_task_date`] for bare `YYYY-MM-DD` dates
#[wasm_bindgen]
pub fn format_dates(start: &str, end: Option<String>) -> Result<String, JsValue> {
    let start = parse_date(start).map_err(to_js)?;
    let end = end.as_deref().and_then(|e| parse_date(e).ok());
    Ok(format_date_range(start, end))
}

/// Chart value for a nutrient level; unknown levels are an error
#[wasm_bindgen]
pub fn nutrient_score(level: &str) -> Result<u32, JsValue> {
    nutrient_score_from_str(level).map_err(|e| to_js(e.to_string()))
}

/// "Analiz N" for a record among all stored records
#[wasm_bindgen]
pub fn analysis_label(record_json: &str, records_json: &str) -> Result<String, JsValue> {
    label_for(record_json, records_json).map_err(to_js)
}

/// JSON array of the next pending tasks
#[wasm_bindgen]
pub fn urgent_task_list(tasks_json: &str) -> Result<String, JsValue> {
    urgent_json(tasks_json).map_err(to_js)
}

/// Whether a task's start date is before today in the browser
#[wasm_bindgen]
pub fn task_is_past(task_json: &str) -> Result<bool, JsValue> {
    let task: Task = parse_json(task_json, "task").map_err(to_js)?;
    let today = browser_today().ok_or_else(|| to_js("Invalid browser date".to_string()))?;
    Ok(task.is_past(today))
}

/// Offline weather reading for a location, as JSON
#[wasm_bindgen]
pub fn synthetic_weather(location: &str) -> Result<String, JsValue> {
    serde_json::to_string(&WeatherData::synthetic(location)).map_err(|e| to_js(e.to_string()))
}

/// Turkish display name of a crop code
#[wasm_bindgen]
pub fn crop_label(code: &str) -> Result<String, JsValue> {
    code.parse::<CropType>()
        .map(|crop| crop.label().to_string())
        .map_err(|e| to_js(e.to_string()))
}

/// Validate field size before submitting the form
#[wasm_bindgen]
pub fn is_valid_field_size(size_decares: f64) -> bool {
    size_error(size_decares).is_none()
}
