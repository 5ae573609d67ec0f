//! In-memory state store
//!
//! Holds the three collections (fields, tasks, analysis records) and applies
//! every mutation as one synchronous step. Callers wrap the store in a lock
//! and never hold it across a provider call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{AnalysisRecord, Field, FieldInput, Task};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Rows removed alongside a deleted field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletedCounts {
    pub tasks: usize,
    pub analyses: usize,
}

/// Fields, tasks and soil analysis history for one running process
#[derive(Debug, Clone, Default)]
pub struct FarmStore {
    fields: Vec<Field>,
    tasks: Vec<Task>,
    analyses: Vec<AnalysisRecord>,
}

impl FarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Analysis records in insertion order (most recent first)
    pub fn analyses(&self) -> &[AnalysisRecord] {
        &self.analyses
    }

    pub fn field(&self, id: Uuid) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn analysis(&self, id: Uuid) -> Option<&AnalysisRecord> {
        self.analyses.iter().find(|a| a.id == id)
    }

    /// Validate the input and append a new field with a fresh identifier
    pub fn create_field(&mut self, input: FieldInput, created_at: DateTime<Utc>) -> AppResult<Field> {
        input.validate()?;

        let mut field = Field::new(input, created_at);
        while self.field(field.id).is_some() {
            field.id = Uuid::new_v4();
        }

        self.fields.push(field.clone());
        Ok(field)
    }

    /// Replace a field's attributes, keeping id, creation time and warning
    pub fn update_field(&mut self, id: Uuid, input: FieldInput) -> AppResult<Field> {
        input.validate()?;

        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound("Field".to_string()))?;
        field.apply(input);
        Ok(field.clone())
    }

    /// Remove a field and every task and analysis record that references it
    pub fn delete_field(&mut self, id: Uuid) -> AppResult<DeletedCounts> {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        if self.fields.len() == before {
            return Err(AppError::NotFound("Field".to_string()));
        }

        let tasks_before = self.tasks.len();
        self.tasks.retain(|t| t.field_id != id);
        let analyses_before = self.analyses.len();
        self.analyses.retain(|a| a.field_id != id);

        Ok(DeletedCounts {
            tasks: tasks_before - self.tasks.len(),
            analyses: analyses_before - self.analyses.len(),
        })
    }

    /// Prepend an analysis record; its field must exist
    pub fn record_analysis(&mut self, record: AnalysisRecord) -> AppResult<()> {
        if self.field(record.field_id).is_none() {
            return Err(AppError::NotFound("Field".to_string()));
        }
        self.analyses.insert(0, record);
        Ok(())
    }

    /// Add generated tasks to a field.
    ///
    /// With `replace` every existing task of the field is removed first,
    /// completed or not. Without it the tasks are appended as-is, duplicates
    /// included. Returns the number of tasks added.
    pub fn apply_generated_tasks(
        &mut self,
        field_id: Uuid,
        new_tasks: Vec<Task>,
        replace: bool,
    ) -> AppResult<usize> {
        if self.field(field_id).is_none() {
            return Err(AppError::NotFound("Field".to_string()));
        }
        if new_tasks.iter().any(|t| t.field_id != field_id) {
            return Err(AppError::validation(
                "field_id",
                "Generated tasks must belong to the target field",
                "Oluşturulan görevler hedef tarlaya ait olmalıdır.",
            ));
        }

        if replace {
            self.tasks.retain(|t| t.field_id != field_id);
        }
        let added = new_tasks.len();
        self.tasks.extend(new_tasks);
        Ok(added)
    }

    /// Overwrite the field's seasonal warning; false when the field is gone
    pub fn attach_seasonal_warning(&mut self, field_id: Uuid, warning: String) -> bool {
        match self.fields.iter_mut().find(|f| f.id == field_id) {
            Some(field) => {
                field.seasonal_warning = Some(warning);
                true
            }
            None => false,
        }
    }

    /// Flip a task's completed flag; no-op when the task does not exist
    pub fn toggle_task_completion(&mut self, id: Uuid) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task)
    }

    pub fn has_pending_tasks(&self, field_id: Uuid) -> bool {
        self.tasks
            .iter()
            .any(|t| t.field_id == field_id && !t.completed)
    }
}
