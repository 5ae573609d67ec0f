//! Field (tarla) models

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::ModelError;
use crate::validation::{validate_not_blank, validate_positive_size};

/// A parcel of land under cultivation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub id: Uuid,
    pub name: String,
    /// Free-text region descriptor, usually "İl, İlçe"
    pub location: String,
    /// Area in decares (dekar: 1,000 m²)
    pub size_decares: Decimal,
    pub crop_type: CropType,
    pub has_irrigation: bool,
    pub created_at: DateTime<Utc>,
    /// Climate suitability warning returned by the schedule generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_warning: Option<String>,
}

impl Field {
    /// Build a new field from validated input
    pub fn new(input: FieldInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            location: input.location.trim().to_string(),
            size_decares: input.size_decares,
            crop_type: input.crop_type,
            has_irrigation: input.has_irrigation,
            created_at,
            seasonal_warning: None,
        }
    }

    /// Replace every user-editable attribute, keeping identity and creation time.
    /// The seasonal warning is left untouched; edits never regenerate it.
    pub fn apply(&mut self, input: FieldInput) {
        self.name = input.name.trim().to_string();
        self.location = input.location.trim().to_string();
        self.size_decares = input.size_decares;
        self.crop_type = input.crop_type;
        self.has_irrigation = input.has_irrigation;
    }
}

/// User input for creating or editing a field
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FieldInput {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    #[validate(custom = "validate_not_blank")]
    pub location: String,
    #[validate(custom = "validate_positive_size")]
    pub size_decares: Decimal,
    #[serde(default)]
    pub crop_type: CropType,
    #[serde(default)]
    pub has_irrigation: bool,
}

/// Crops supported by the planner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    #[default]
    Wheat,
    Corn,
    Cotton,
    Tomato,
    Sunflower,
    Barley,
}

impl CropType {
    pub const ALL: [CropType; 6] = [
        CropType::Wheat,
        CropType::Corn,
        CropType::Cotton,
        CropType::Tomato,
        CropType::Sunflower,
        CropType::Barley,
    ];

    /// Turkish display name, also used when assembling provider prompts
    pub fn label(&self) -> &'static str {
        match self {
            CropType::Wheat => "Buğday",
            CropType::Corn => "Mısır",
            CropType::Cotton => "Pamuk",
            CropType::Tomato => "Domates",
            CropType::Sunflower => "Ayçiçeği",
            CropType::Barley => "Arpa",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            CropType::Wheat => "wheat",
            CropType::Corn => "corn",
            CropType::Cotton => "cotton",
            CropType::Tomato => "tomato",
            CropType::Sunflower => "sunflower",
            CropType::Barley => "barley",
        }
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CropType {
    type Err = ModelError;

    /// Accepts either the snake_case code or the Turkish label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        CropType::ALL
            .into_iter()
            .find(|crop| crop.code().eq_ignore_ascii_case(value) || crop.label() == value)
            .ok_or_else(|| ModelError::UnknownCropType(value.to_string()))
    }
}
