//! Calendar task models

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

/// A scheduled agricultural action on a field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "TaskRecord")]
pub struct Task {
    pub id: Uuid,
    pub field_id: Uuid,
    /// Soil analysis this task was generated from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<Uuid>,
    pub title: String,
    /// Start date
    pub date: NaiveDate,
    /// End date for range tasks such as planting or harvest windows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Task {
    /// Materialize a provider draft as a pending task on `field_id`
    pub fn from_draft(draft: TaskDraft, field_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            field_id,
            analysis_id: None,
            title: draft.title,
            date: draft.date,
            end_date: draft.end_date,
            task_type: draft.task_type,
            completed: false,
            description: draft.description,
        }
    }

    /// Link the task to the soil analysis it was generated from
    pub fn linked_to(mut self, analysis_id: Uuid) -> Self {
        self.analysis_id = Some(analysis_id);
        self
    }

    /// End date, if it forms a range with the start date
    pub fn range_end(&self) -> Option<NaiveDate> {
        self.end_date.filter(|end| *end > self.date)
    }

    pub fn is_range(&self) -> bool {
        self.range_end().is_some()
    }

    /// Whether the task starts before `today`
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
    }
}

/// Closed set of task kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Fertilizer,
    Irrigation,
    Pesticide,
    Planting,
    Harvest,
}

impl TaskType {
    pub fn code(&self) -> &'static str {
        match self {
            TaskType::Fertilizer => "FERTILIZER",
            TaskType::Irrigation => "IRRIGATION",
            TaskType::Pesticide => "PESTICIDE",
            TaskType::Planting => "PLANTING",
            TaskType::Harvest => "HARVEST",
        }
    }

    /// Turkish display name
    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Fertilizer => "Gübreleme",
            TaskType::Irrigation => "Sulama",
            TaskType::Pesticide => "İlaçlama",
            TaskType::Planting => "Ekim",
            TaskType::Harvest => "Hasat",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for TaskType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FERTILIZER" => Ok(TaskType::Fertilizer),
            "IRRIGATION" => Ok(TaskType::Irrigation),
            "PESTICIDE" => Ok(TaskType::Pesticide),
            "PLANTING" => Ok(TaskType::Planting),
            "HARVEST" => Ok(TaskType::Harvest),
            _ => Err(ModelError::UnknownTaskType(s.to_string())),
        }
    }
}

/// Wire form of [`Task`]; an end date before the start is dropped on the way in
#[derive(Deserialize)]
struct TaskRecord {
    id: Uuid,
    field_id: Uuid,
    #[serde(default)]
    analysis_id: Option<Uuid>,
    title: String,
    date: NaiveDate,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    task_type: TaskType,
    completed: bool,
    #[serde(default)]
    description: Option<String>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            field_id: record.field_id,
            analysis_id: record.analysis_id,
            title: record.title,
            date: record.date,
            end_date: record.end_date.filter(|end| *end >= record.date),
            task_type: record.task_type,
            completed: record.completed,
            description: record.description,
        }
    }
}

/// A task proposed by a schedule provider, not yet bound to a field.
/// Only built through [`TaskDraft::new`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskDraft {
    title: String,
    task_type: TaskType,
    date: NaiveDate,
    end_date: Option<NaiveDate>,
    description: Option<String>,
}

impl TaskDraft {
    /// Build a draft; an end date before the start date is dropped
    pub fn new(
        title: impl Into<String>,
        task_type: TaskType,
        date: NaiveDate,
        end_date: Option<NaiveDate>,
        description: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            task_type,
            date,
            end_date: end_date.filter(|end| *end >= date),
            description,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
