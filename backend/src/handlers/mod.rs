//! HTTP handlers for the Digital Farmer API

pub mod analyses;
pub mod fields;
pub mod health;
pub mod tasks;
pub mod weather;

pub use analyses::{add_to_calendar, list_analyses, run_analysis};
pub use fields::{create_field, delete_field, get_field, list_fields, update_field};
pub use health::health_check;
pub use tasks::{list_tasks, list_urgent_tasks, toggle_task};
pub use weather::get_current_weather;
