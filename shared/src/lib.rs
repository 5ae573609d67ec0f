//! Shared types and models for the Digital Farmer platform
//!
//! This crate contains the field, task, soil-analysis and weather models
//! shared between the backend, the browser front end (via WASM), and the
//! derived-view rules both of them render with.

pub mod error;
pub mod models;
pub mod validation;
pub mod views;

pub use error::*;
pub use models::*;
pub use validation::*;
pub use views::*;
