//! Farm service
//!
//! Wraps the [`FarmStore`] with the provider calls and their fallbacks.
//! The lock is only taken around synchronous store operations; provider
//! calls run without it.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    analysis_display_label, analysis_history, calendar_tasks, field_name, format_task_date_range,
    nutrient_chart, pending_task_count, urgent_tasks, AnalysisRecord, CropType, Field, FieldInput,
    NutrientBar, SoilAnalysisResult, Task, TaskDraft, TaskType,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::store::{DeletedCounts, FarmStore};
use super::weather::WeatherService;
use crate::error::{AppError, AppResult};
use crate::external::{AgronomyProvider, ProviderError, ScheduleProposal, ScheduleRequest};

/// Warning attached to a field when the schedule provider is over quota
pub const SCHEDULE_QUOTA_WARNING: &str =
    "Sistem yoğunluğu nedeniyle takvim şu an oluşturulamadı. Lütfen daha sonra tekrar deneyin.";

/// Result of the background schedule generation for a new field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Applied { tasks: usize, warning: Option<String> },
    /// The field was deleted before the schedule arrived
    Discarded,
}

/// A task as the calendar renders it
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEntry {
    #[serde(flatten)]
    pub task: Task,
    pub field_name: String,
    pub date_label: String,
    pub is_past: bool,
    pub is_range: bool,
}

impl CalendarEntry {
    fn new(task: &Task, fields: &[Field], today: NaiveDate) -> Self {
        Self {
            task: task.clone(),
            field_name: field_name(fields, task.field_id).to_string(),
            date_label: format_task_date_range(task),
            is_past: task.is_past(today),
            is_range: task.is_range(),
        }
    }
}

/// Calendar listing plus the pending counter shown next to it
#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub tasks: Vec<CalendarEntry>,
    pub pending_count: usize,
}

/// One row of the analysis history
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisEntry {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub label: String,
    pub crop_label: &'static str,
    pub nutrients: Vec<NutrientBar>,
}

/// Tasks written to the calendar from one analysis
#[derive(Debug, Clone, Serialize)]
pub struct CalendarUpdate {
    pub analysis_id: Uuid,
    pub field_id: Uuid,
    pub replaced: bool,
    pub tasks: Vec<Task>,
}

#[derive(Clone)]
pub struct FarmService {
    store: Arc<RwLock<FarmStore>>,
    provider: Option<Arc<dyn AgronomyProvider>>,
    weather: WeatherService,
}

impl FarmService {
    /// Create a service over an empty store; `None` means every provider
    /// call takes its fallback
    pub fn new(provider: Option<Arc<dyn AgronomyProvider>>, default_location: String) -> Self {
        Self {
            store: Arc::new(RwLock::new(FarmStore::new())),
            weather: WeatherService::new(provider.clone(), default_location),
            provider,
        }
    }

    pub fn weather(&self) -> &WeatherService {
        &self.weather
    }

    fn provider(&self) -> Result<&dyn AgronomyProvider, ProviderError> {
        self.provider.as_deref().ok_or(ProviderError::NotConfigured)
    }

    // ------------------------------------------------------------------
    // Fields
    // ------------------------------------------------------------------

    /// Create a field and start generating its schedule in the background.
    ///
    /// The field is stored before the provider is called. The returned handle
    /// resolves once the schedule has been applied or discarded.
    pub async fn create_field(
        &self,
        input: FieldInput,
    ) -> AppResult<(Field, JoinHandle<ScheduleOutcome>)> {
        let field = self.store.write().await.create_field(input, Utc::now())?;
        tracing::info!("Created field {} ({})", field.name, field.id);

        let request = ScheduleRequest::for_field(&field, Utc::now().date_naive());
        let service = self.clone();
        let handle = tokio::spawn(async move { service.generate_initial_schedule(request).await });

        Ok((field, handle))
    }

    /// Ask the provider for a season schedule and apply it to the field
    pub async fn generate_initial_schedule(&self, request: ScheduleRequest) -> ScheduleOutcome {
        let result = match self.provider() {
            Ok(provider) => provider.generate_schedule(&request).await,
            Err(e) => Err(e),
        };

        let proposal = match result {
            Ok(proposal) => proposal,
            Err(e) if e.is_quota() => {
                tracing::warn!("Schedule generation for field {} hit the quota", request.field_id);
                ScheduleProposal {
                    tasks: Vec::new(),
                    warning: Some(SCHEDULE_QUOTA_WARNING.to_string()),
                }
            }
            Err(e) => {
                tracing::warn!("Schedule generation for field {} failed: {}", request.field_id, e);
                ScheduleProposal::default()
            }
        };

        let tasks: Vec<Task> = proposal
            .tasks
            .into_iter()
            .map(|draft| Task::from_draft(draft, request.field_id))
            .collect();

        let mut store = self.store.write().await;
        if store.field(request.field_id).is_none() {
            tracing::info!("Field {} deleted before its schedule arrived", request.field_id);
            return ScheduleOutcome::Discarded;
        }

        let added = match store.apply_generated_tasks(request.field_id, tasks, false) {
            Ok(added) => added,
            Err(e) => {
                tracing::error!("Failed to apply schedule for field {}: {}", request.field_id, e);
                return ScheduleOutcome::Discarded;
            }
        };
        if let Some(warning) = &proposal.warning {
            store.attach_seasonal_warning(request.field_id, warning.clone());
        }

        tracing::debug!("Applied {} scheduled tasks to field {}", added, request.field_id);
        ScheduleOutcome::Applied {
            tasks: added,
            warning: proposal.warning,
        }
    }

    pub async fn list_fields(&self) -> Vec<Field> {
        self.store.read().await.fields().to_vec()
    }

    pub async fn get_field(&self, id: Uuid) -> AppResult<Field> {
        self.store
            .read()
            .await
            .field(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Field".to_string()))
    }

    /// Edit a field; the schedule and seasonal warning are left as they are
    pub async fn update_field(&self, id: Uuid, input: FieldInput) -> AppResult<Field> {
        let field = self.store.write().await.update_field(id, input)?;
        tracing::info!("Updated field {}", id);
        Ok(field)
    }

    /// Delete a field with its tasks and analyses; `confirmed` must be set
    pub async fn delete_field(&self, id: Uuid, confirmed: bool) -> AppResult<DeletedCounts> {
        let mut store = self.store.write().await;
        let name = store
            .field(id)
            .map(|f| f.name.clone())
            .ok_or_else(|| AppError::NotFound("Field".to_string()))?;

        if !confirmed {
            return Err(AppError::ConfirmationRequired {
                message: format!(
                    "Deleting \"{}\" also removes all of its calendar tasks and analyses",
                    name
                ),
                message_tr: "Bu tarlayı ve ilişkili tüm takvim/analiz verilerini silmek istediğinize emin misiniz?"
                    .to_string(),
            });
        }

        let counts = store.delete_field(id)?;
        tracing::info!(
            "Deleted field {} with {} tasks and {} analyses",
            id,
            counts.tasks,
            counts.analyses
        );
        Ok(counts)
    }

    // ------------------------------------------------------------------
    // Soil analysis
    // ------------------------------------------------------------------

    /// Analyze a soil image for a field and record the result.
    ///
    /// Any provider failure, quota included, records the canned result.
    pub async fn run_analysis(&self, field_id: Uuid, image: &[u8]) -> AppResult<AnalysisRecord> {
        let field = self.get_field(field_id).await?;

        let result = match self.provider() {
            Ok(provider) => {
                provider
                    .analyze_soil(image, field.crop_type, field.size_decares)
                    .await
            }
            Err(e) => Err(e),
        };
        let result = result.unwrap_or_else(|e| {
            tracing::warn!("Soil analysis for field {} failed, using canned result: {}", field_id, e);
            SoilAnalysisResult::fallback()
        });

        let record = AnalysisRecord::new(&field, result, Utc::now());
        self.store.write().await.record_analysis(record.clone())?;
        tracing::info!("Recorded analysis {} for field {}", record.id, field_id);
        Ok(record)
    }

    /// Generate tasks from a stored analysis and write them to the calendar.
    ///
    /// If the field still has pending tasks the caller must confirm
    /// `replace`; otherwise nothing is changed. Quota exhaustion is reported
    /// as an error, other provider failures add no tasks.
    pub async fn add_analysis_to_calendar(
        &self,
        analysis_id: Uuid,
        replace: bool,
    ) -> AppResult<CalendarUpdate> {
        let (record, field, has_pending) = {
            let store = self.store.read().await;
            let record = store
                .analysis(analysis_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound("Analysis".to_string()))?;
            let field = store
                .field(record.field_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound("Field".to_string()))?;
            let has_pending = store.has_pending_tasks(field.id);
            (record, field, has_pending)
        };

        if has_pending && !replace {
            return Err(AppError::ConfirmationRequired {
                message: format!(
                    "\"{}\" already has an active schedule; confirm to replace it",
                    field.name
                ),
                message_tr: format!(
                    "UYARI: \"{}\" için zaten aktif bir zirai takvim bulunuyor. Mevcut takvimi silip yenisini oluşturmak istiyor musunuz?",
                    field.name
                ),
            });
        }
        let replace = replace && has_pending;

        let result = match self.provider() {
            Ok(provider) => provider.generate_tasks_from_analysis(&field, &record.result).await,
            Err(e) => Err(e),
        };
        let drafts = match result {
            Ok(drafts) => drafts,
            Err(e) if e.is_quota() => return Err(AppError::ProviderQuotaExceeded),
            Err(e) => {
                tracing::warn!("Task generation for analysis {} failed: {}", analysis_id, e);
                Vec::new()
            }
        };

        let tasks: Vec<Task> = drafts
            .into_iter()
            .map(|draft| Task::from_draft(draft, field.id).linked_to(record.id))
            .collect();

        self.store
            .write()
            .await
            .apply_generated_tasks(field.id, tasks.clone(), replace)?;
        tracing::info!(
            "Added {} tasks from analysis {} to field {} (replace: {})",
            tasks.len(),
            analysis_id,
            field.id,
            replace
        );

        Ok(CalendarUpdate {
            analysis_id: record.id,
            field_id: field.id,
            replaced: replace,
            tasks,
        })
    }

    // ------------------------------------------------------------------
    // Tasks and read views
    // ------------------------------------------------------------------

    /// Flip a task's completed flag.
    ///
    /// An unknown id is reported as `NotFound` (404 over HTTP) so the caller
    /// learns its view is stale; the store itself treats it as a no-op and
    /// nothing is changed.
    pub async fn toggle_task(&self, id: Uuid) -> AppResult<Task> {
        self.store
            .write()
            .await
            .toggle_task_completion(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Task".to_string()))
    }

    pub async fn list_tasks(&self) -> Vec<Task> {
        self.store.read().await.tasks().to_vec()
    }

    /// Tasks of one field, or all fields, ascending by start date
    pub async fn calendar(&self, field_id: Option<Uuid>, today: NaiveDate) -> CalendarView {
        let store = self.store.read().await;
        let tasks = calendar_tasks(store.tasks(), field_id)
            .into_iter()
            .map(|t| CalendarEntry::new(t, store.fields(), today))
            .collect();
        CalendarView {
            tasks,
            pending_count: pending_task_count(store.tasks()),
        }
    }

    pub async fn urgent_tasks(&self, today: NaiveDate) -> Vec<CalendarEntry> {
        let store = self.store.read().await;
        urgent_tasks(store.tasks())
            .into_iter()
            .map(|t| CalendarEntry::new(t, store.fields(), today))
            .collect()
    }

    /// Analysis history, newest first, with per-field display labels
    pub async fn analysis_history(&self) -> Vec<AnalysisEntry> {
        let store = self.store.read().await;
        analysis_history(store.analyses())
            .into_iter()
            .map(|record| AnalysisEntry {
                record: record.clone(),
                label: analysis_display_label(record, store.analyses()),
                crop_label: record.crop_type.label(),
                nutrients: nutrient_chart(&record.result),
            })
            .collect()
    }

    /// Store the demo field with an irrigation check today and spraying in
    /// two days. No schedule is generated for it.
    pub async fn seed_demo(&self, today: NaiveDate) -> AppResult<Field> {
        let mut store = self.store.write().await;
        let field = store.create_field(
            FieldInput {
                name: "Kuzey Bahçesi".to_string(),
                location: "Tekirdağ, Hayrabolu".to_string(),
                size_decares: Decimal::from(25),
                crop_type: CropType::Sunflower,
                has_irrigation: true,
            },
            Utc::now(),
        )?;

        let drafts = [
            TaskDraft::new(
                "Sulama Kontrolü",
                TaskType::Irrigation,
                today,
                None,
                Some("Damla sulama hatlarını kontrol et.".to_string()),
            ),
            TaskDraft::new(
                "İlaçlama",
                TaskType::Pesticide,
                today + Duration::days(2),
                None,
                Some("Yabancı ot mücadelesi için ilaçlama yap.".to_string()),
            ),
        ];
        let tasks = drafts
            .into_iter()
            .map(|draft| Task::from_draft(draft, field.id))
            .collect();
        store.apply_generated_tasks(field.id, tasks, false)?;

        tracing::info!("Seeded demo field {}", field.id);
        Ok(field)
    }
}
