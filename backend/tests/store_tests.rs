//! State store property-based and unit tests
//!
//! Comprehensive tests for:
//! - Cascade delete leaves no orphaned tasks or analyses
//! - Replace leaves exactly the new tasks for the field
//! - Append grows the collection by the number of new tasks
//! - Field size must be strictly positive
//! - Analysis labels shift after deletion

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use digital_farmer::services::store::FarmStore;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    analysis_display_label, AnalysisRecord, CropType, FieldInput, SoilAnalysisResult, Task,
    TaskDraft, TaskType,
};
use std::collections::HashSet;
use uuid::Uuid;

fn field_input(name: &str, size: Decimal) -> FieldInput {
    FieldInput {
        name: name.to_string(),
        location: "Konya, Çumra".to_string(),
        size_decares: size,
        crop_type: CropType::Barley,
        has_irrigation: false,
    }
}

fn make_task(field_id: Uuid, offset_days: i64) -> Task {
    let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap() + Duration::days(offset_days);
    Task::from_draft(
        TaskDraft::new("Sulama", TaskType::Irrigation, date, None, None),
        field_id,
    )
}

/// Store with `field_count` fields and the given task counts per field
fn populated_store(task_counts: &[usize]) -> (FarmStore, Vec<Uuid>) {
    let mut store = FarmStore::new();
    let mut ids = Vec::new();
    for (i, count) in task_counts.iter().enumerate() {
        let field = store
            .create_field(field_input(&format!("Tarla {}", i), Decimal::from(10)), Utc::now())
            .unwrap();
        let tasks = (0..*count).map(|d| make_task(field.id, d as i64)).collect();
        store.apply_generated_tasks(field.id, tasks, false).unwrap();
        store
            .record_analysis(AnalysisRecord::new(&field, SoilAnalysisResult::fallback(), Utc::now()))
            .unwrap();
        ids.push(field.id);
    }
    (store, ids)
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Task counts for 1..5 fields
fn task_counts_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..8, 1..5)
}

/// Strictly positive sizes with one decimal place
fn positive_size_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|v| Decimal::new(v, 1))
}

/// Zero or negative sizes
fn non_positive_size_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000i64..=0).prop_map(|v| Decimal::new(v, 1))
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Deleting a field removes it with every task and analysis that references it
    #[test]
    fn test_delete_field_leaves_no_orphans(
        counts in task_counts_strategy(),
        pick in any::<prop::sample::Index>()
    ) {
        let (mut store, ids) = populated_store(&counts);
        let victim = ids[pick.index(ids.len())];
        let others_before: usize = store.tasks().iter().filter(|t| t.field_id != victim).count();

        store.delete_field(victim).unwrap();

        prop_assert!(store.field(victim).is_none());
        prop_assert!(store.tasks().iter().all(|t| t.field_id != victim));
        prop_assert!(store.analyses().iter().all(|a| a.field_id != victim));
        prop_assert_eq!(store.tasks().len(), others_before);
    }

    /// After a replace the field holds exactly the new tasks; other fields are untouched
    #[test]
    fn test_replace_is_exact(
        counts in task_counts_strategy(),
        pick in any::<prop::sample::Index>(),
        new_count in 0usize..6,
        complete_some in any::<bool>()
    ) {
        let (mut store, ids) = populated_store(&counts);
        let target = ids[pick.index(ids.len())];

        if complete_some {
            let first = store.tasks().iter().find(|t| t.field_id == target).map(|t| t.id);
            if let Some(id) = first {
                store.toggle_task_completion(id);
            }
        }

        let others: Vec<Task> = store
            .tasks()
            .iter()
            .filter(|t| t.field_id != target)
            .cloned()
            .collect();
        let new_tasks: Vec<Task> = (0..new_count).map(|d| make_task(target, 30 + d as i64)).collect();
        let new_ids: HashSet<Uuid> = new_tasks.iter().map(|t| t.id).collect();

        store.apply_generated_tasks(target, new_tasks, true).unwrap();

        let target_ids: HashSet<Uuid> = store
            .tasks()
            .iter()
            .filter(|t| t.field_id == target)
            .map(|t| t.id)
            .collect();
        prop_assert_eq!(target_ids, new_ids);

        let others_after: Vec<Task> = store
            .tasks()
            .iter()
            .filter(|t| t.field_id != target)
            .cloned()
            .collect();
        prop_assert_eq!(others_after, others);
    }

    /// Append is a pure append, duplicates included
    #[test]
    fn test_append_adds_length(
        counts in task_counts_strategy(),
        pick in any::<prop::sample::Index>(),
        new_count in 0usize..6
    ) {
        let (mut store, ids) = populated_store(&counts);
        let target = ids[pick.index(ids.len())];
        let before = store.tasks().len();

        let new_tasks: Vec<Task> = (0..new_count).map(|d| make_task(target, d as i64)).collect();
        let added = store.apply_generated_tasks(target, new_tasks, false).unwrap();

        prop_assert_eq!(added, new_count);
        prop_assert_eq!(store.tasks().len(), before + new_count);
    }

    /// Positive sizes are accepted with distinct identifiers
    #[test]
    fn test_positive_size_accepted(sizes in prop::collection::vec(positive_size_strategy(), 1..10)) {
        let mut store = FarmStore::new();
        let mut seen = HashSet::new();
        for size in sizes {
            let field = store.create_field(field_input("Tarla", size), Utc::now()).unwrap();
            prop_assert!(seen.insert(field.id));
            prop_assert!(store.field(field.id).is_some());
        }
    }

    /// Zero and negative sizes never reach the store
    #[test]
    fn test_non_positive_size_rejected(size in non_positive_size_strategy()) {
        let mut store = FarmStore::new();
        prop_assert!(store.create_field(field_input("Tarla", size), Utc::now()).is_err());
        prop_assert!(store.fields().is_empty());
    }
}

// ============================================================================
// Unit Tests: Field Creation
// ============================================================================

#[cfg(test)]
mod field_tests {
    use super::*;

    #[test]
    fn test_size_zero_rejected_and_ten_accepted() {
        let mut store = FarmStore::new();
        assert!(store.create_field(field_input("Tarla", Decimal::ZERO), Utc::now()).is_err());

        let field = store
            .create_field(field_input("Tarla", Decimal::from(10)), Utc::now())
            .unwrap();
        assert_eq!(store.fields().len(), 1);
        assert_eq!(store.fields()[0].id, field.id);
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut store = FarmStore::new();
        let field = store
            .create_field(field_input("  Güney Tarlası ", Decimal::from(5)), Utc::now())
            .unwrap();
        assert_eq!(field.name, "Güney Tarlası");
    }
}

// ============================================================================
// Unit Tests: Analysis Labels
// ============================================================================

#[cfg(test)]
mod label_tests {
    use super::*;

    #[test]
    fn test_labels_shift_after_cascade() {
        let mut store = FarmStore::new();
        let field = store
            .create_field(field_input("Tarla", Decimal::from(10)), Utc::now())
            .unwrap();
        let other = store
            .create_field(field_input("Diğer", Decimal::from(10)), Utc::now())
            .unwrap();

        let base = Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap();
        for hour in 0..3 {
            store
                .record_analysis(AnalysisRecord::new(
                    &field,
                    SoilAnalysisResult::fallback(),
                    base + Duration::hours(hour),
                ))
                .unwrap();
        }
        let foreign =
            AnalysisRecord::new(&other, SoilAnalysisResult::fallback(), base - Duration::hours(1));
        store.record_analysis(foreign.clone()).unwrap();

        let labels: Vec<String> = store
            .analyses()
            .iter()
            .filter(|r| r.field_id == field.id)
            .map(|r| analysis_display_label(r, store.analyses()))
            .collect();
        // Insertion order is newest first
        assert_eq!(labels, vec!["Analiz 3", "Analiz 2", "Analiz 1"]);
        assert_eq!(analysis_display_label(&foreign, store.analyses()), "Analiz 1");

        store.delete_field(other.id).unwrap();
        let labels: Vec<String> = store
            .analyses()
            .iter()
            .map(|r| analysis_display_label(r, store.analyses()))
            .collect();
        assert_eq!(labels, vec!["Analiz 3", "Analiz 2", "Analiz 1"]);
    }
}
