//! Derived views over the field, task and analysis collections
//!
//! Every function here is a pure projection recomputed on each call; nothing
//! is cached on the records themselves.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ModelError;
use crate::models::{AnalysisRecord, Field, NutrientLevel, SoilAnalysisResult, Task};

/// Turkish month names, January first
pub const TURKISH_MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// How many pending tasks the dashboard surfaces
pub const URGENT_TASK_LIMIT: usize = 3;

/// Display name for a task whose field no longer resolves
pub const UNKNOWN_FIELD_NAME: &str = "Bilinmeyen Tarla";

pub fn month_name(date: NaiveDate) -> &'static str {
    TURKISH_MONTHS[date.month0() as usize]
}

/// "15 Ekim"
pub fn format_day_month(date: NaiveDate) -> String {
    format!("{} {}", date.day(), month_name(date))
}

/// Render a start date and optional end date:
/// - no end, or end equal to start: "15 Ekim"
/// - same calendar month: "15 - 20 Ekim"
/// - otherwise: "25 Ekim - 5 Kasım"
pub fn format_date_range(start: NaiveDate, end: Option<NaiveDate>) -> String {
    match end {
        None => format_day_month(start),
        Some(end) if end <= start => format_day_month(start),
        Some(end) if end.year() == start.year() && end.month() == start.month() => {
            format!("{} - {} {}", start.day(), end.day(), month_name(start))
        }
        Some(end) => format!("{} - {}", format_day_month(start), format_day_month(end)),
    }
}

pub fn format_task_date_range(task: &Task) -> String {
    format_date_range(task.date, task.range_end())
}

/// 1-based position of `record` among its field's analyses ordered by
/// creation time, rendered as "Analiz N". Ties on creation time fall back to
/// the record id so the label does not depend on slice order.
pub fn analysis_display_index(record: &AnalysisRecord, all_records: &[AnalysisRecord]) -> usize {
    let key = (record.created_at, record.id);
    all_records
        .iter()
        .filter(|r| r.field_id == record.field_id && r.id != record.id)
        .filter(|r| (r.created_at, r.id) < key)
        .count()
        + 1
}

pub fn analysis_display_label(record: &AnalysisRecord, all_records: &[AnalysisRecord]) -> String {
    format!("Analiz {}", analysis_display_index(record, all_records))
}

pub fn nutrient_level_to_score(level: NutrientLevel) -> u32 {
    level.score()
}

/// Score for a raw level string. Anything outside Low/Optimal/High is an
/// error, never a default.
pub fn nutrient_score_from_str(level: &str) -> Result<u32, ModelError> {
    level.parse::<NutrientLevel>().map(nutrient_level_to_score)
}

/// One bar of the nutrient chart
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NutrientBar {
    pub name: &'static str,
    pub level: NutrientLevel,
    pub score: u32,
}

/// Nitrogen, phosphorus and potassium bars in display order
pub fn nutrient_chart(result: &SoilAnalysisResult) -> Vec<NutrientBar> {
    [
        ("Azot", result.nitrogen),
        ("Fosfor", result.phosphorus),
        ("Potasyum", result.potassium),
    ]
    .into_iter()
    .map(|(name, level)| NutrientBar {
        name,
        level,
        score: nutrient_level_to_score(level),
    })
    .collect()
}

/// First [`URGENT_TASK_LIMIT`] incomplete tasks by start date
pub fn urgent_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    pending.sort_by_key(|t| t.date);
    pending.truncate(URGENT_TASK_LIMIT);
    pending
}

pub fn pending_task_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.completed).count()
}

/// Calendar listing: optionally one field's tasks, ascending by start date
pub fn calendar_tasks(tasks: &[Task], field_id: Option<Uuid>) -> Vec<&Task> {
    let mut listed: Vec<&Task> = tasks
        .iter()
        .filter(|t| field_id.map_or(true, |id| t.field_id == id))
        .collect();
    listed.sort_by_key(|t| t.date);
    listed
}

/// Analysis history, newest first regardless of insertion order
pub fn analysis_history(records: &[AnalysisRecord]) -> Vec<&AnalysisRecord> {
    let mut history: Vec<&AnalysisRecord> = records.iter().collect();
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    history
}

pub fn field_name(fields: &[Field], field_id: Uuid) -> &str {
    fields
        .iter()
        .find(|f| f.id == field_id)
        .map(|f| f.name.as_str())
        .unwrap_or(UNKNOWN_FIELD_NAME)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::models::{CropType, TaskDraft, TaskType};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    proptest! {
        /// Urgent tasks are at most three, all pending, ascending by date
        #[test]
        fn test_urgent_tasks_projection(
            specs in prop::collection::vec((0i64..365, any::<bool>()), 0..12)
        ) {
            let tasks: Vec<Task> = specs
                .iter()
                .map(|(offset, completed)| {
                    let mut task = Task::from_draft(
                        TaskDraft::new("Görev", TaskType::Irrigation, base_day() + Duration::days(*offset), None, None),
                        Uuid::new_v4(),
                    );
                    task.completed = *completed;
                    task
                })
                .collect();

            let urgent = urgent_tasks(&tasks);
            let pending = pending_task_count(&tasks);
            prop_assert_eq!(urgent.len(), pending.min(URGENT_TASK_LIMIT));
            prop_assert!(urgent.iter().all(|t| !t.completed));
            prop_assert!(urgent.windows(2).all(|w| w[0].date <= w[1].date));
        }

        /// Labels do not depend on the order records are passed in
        #[test]
        fn test_labels_stable_under_reordering(
            minutes in prop::collection::hash_set(0i64..10_000, 1..8),
            rotate in 0usize..8
        ) {
            let field_id = Uuid::new_v4();
            let start = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
            let mut records: Vec<AnalysisRecord> = minutes
                .iter()
                .map(|m| AnalysisRecord {
                    id: Uuid::new_v4(),
                    created_at: start + Duration::minutes(*m),
                    field_id,
                    field_name: "Tarla".to_string(),
                    crop_type: CropType::Wheat,
                    result: SoilAnalysisResult::fallback(),
                })
                .collect();

            let labels: Vec<String> = records.iter().map(|r| analysis_display_label(r, &records)).collect();
            let len = records.len();
            let mut rotated = records.clone();
            rotated.rotate_left(rotate % len);
            for (record, label) in records.iter().zip(&labels) {
                prop_assert_eq!(&analysis_display_label(record, &rotated), label);
            }

            records.sort_by_key(|r| r.created_at);
            for (i, record) in records.iter().enumerate() {
                prop_assert_eq!(analysis_display_label(record, &rotated), format!("Analiz {}", i + 1));
            }
        }

        /// A range label always names both days
        #[test]
        fn test_range_label_mentions_both_days(start in 0i64..700, length in 1i64..60) {
            let from = base_day() + Duration::days(start);
            let to = from + Duration::days(length);
            let label = format_date_range(from, Some(to));
            prop_assert!(label.starts_with(&from.day().to_string()));
            prop_assert!(label.contains(" - "));
            prop_assert!(label.ends_with(month_name(to)));
        }
    }
}
