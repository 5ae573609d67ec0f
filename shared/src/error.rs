//! Errors raised while interpreting values of the closed domain enumerations

use thiserror::Error;

/// A value outside one of the closed enumerations of the data model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown crop type: {0}")]
    UnknownCropType(String),

    #[error("Unknown task type: {0}")]
    UnknownTaskType(String),

    #[error("Unknown nutrient level: {0}")]
    UnknownNutrientLevel(String),
}
