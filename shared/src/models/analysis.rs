//! Soil analysis models

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;
use crate::models::{CropType, Field};

/// Three-level rating of a soil nutrient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NutrientLevel {
    Low,
    Optimal,
    High,
}

impl NutrientLevel {
    /// Plotting value for nutrient charts
    pub fn score(&self) -> u32 {
        match self {
            NutrientLevel::Low => 30,
            NutrientLevel::Optimal => 70,
            NutrientLevel::High => 100,
        }
    }
}

impl FromStr for NutrientLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(NutrientLevel::Low),
            "Optimal" => Ok(NutrientLevel::Optimal),
            "High" => Ok(NutrientLevel::High),
            other => Err(ModelError::UnknownNutrientLevel(other.to_string())),
        }
    }
}

/// Structured interpretation of a soil image or lab report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilAnalysisResult {
    pub ph: Decimal,
    pub nitrogen: NutrientLevel,
    pub phosphorus: NutrientLevel,
    pub potassium: NutrientLevel,
    /// Organic matter percentage
    pub organic_matter: Decimal,
    pub recommendations: Vec<String>,
    /// Fertilizer type and amount, e.g. "15 kg/dekar DAP"
    pub calculated_fertilizer_amount: String,
    /// e.g. "Kasım başı"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_planting_time: Option<String>,
}

impl SoilAnalysisResult {
    /// Fixed result substituted when the analysis provider fails
    pub fn fallback() -> Self {
        Self {
            ph: Decimal::new(68, 1),
            nitrogen: NutrientLevel::Low,
            phosphorus: NutrientLevel::Optimal,
            potassium: NutrientLevel::High,
            organic_matter: Decimal::new(25, 1),
            recommendations: vec![
                "Toprak pH seviyesi ideal aralıkta.".to_string(),
                "Azot seviyesi düşük, ekim öncesi Üre gübresi tavsiye edilir.".to_string(),
                "Potasyum seviyesi yüksek, ek potasyum takviyesine gerek yok.".to_string(),
            ],
            calculated_fertilizer_amount: "20 kg/dekar Üre".to_string(),
            ideal_planting_time: Some("Ekim sonu".to_string()),
        }
    }
}

/// Immutable snapshot of one soil analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub field_id: Uuid,
    /// Captured at creation; not re-synced when the field is edited
    pub field_name: String,
    pub crop_type: CropType,
    pub result: SoilAnalysisResult,
}

impl AnalysisRecord {
    pub fn new(field: &Field, result: SoilAnalysisResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            field_id: field.id,
            field_name: field.name.clone(),
            crop_type: field.crop_type,
            result,
        }
    }
}
