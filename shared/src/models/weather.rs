//! Weather data models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::is_warm_region;

/// Current conditions for a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherData {
    /// Degrees Celsius
    pub temp: Decimal,
    /// Short Turkish description, e.g. "Parçalı Bulutlu"
    pub condition: String,
    pub humidity: i32,
    /// km/h
    pub wind_speed: Decimal,
    pub rain_chance: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar_image_url: Option<String>,
}

/// Conditions the synthetic reading picks from
pub const SYNTHETIC_CONDITIONS: [&str; 4] = ["Güneşli", "Parçalı Bulutlu", "Bulutlu", "Hafif Yağmurlu"];

impl WeatherData {
    /// Deterministic reading derived from the location string, used when no
    /// provider reading is available. Same location, same numbers.
    pub fn synthetic(location: &str) -> Self {
        let h = location_hash(location).unsigned_abs();
        let base_temp = if is_warm_region(location) { 22 } else { 15 };

        let condition = SYNTHETIC_CONDITIONS[(h % SYNTHETIC_CONDITIONS.len() as u64) as usize];
        let rain_chance = if condition.contains("Yağmur") { 80 } else { (h % 20) as i32 };

        Self {
            temp: Decimal::from(base_temp + (h % 10) as i32),
            condition: condition.to_string(),
            humidity: 30 + (h % 50) as i32,
            wind_speed: Decimal::from(5 + (h % 25) as i32),
            rain_chance,
            radar_image_url: None,
        }
    }
}

/// Rolling string hash `h = c + ((h << 5) - h)` over UTF-16 code units.
///
/// Only the shifted term is truncated to 32 bits; the accumulator itself is
/// not, so it can leave the `i32` range for longer strings.
pub fn location_hash(location: &str) -> i64 {
    location.encode_utf16().fold(0i64, |h, c| {
        let shifted = i64::from((h as i32).wrapping_shl(5));
        i64::from(c) + (shifted - h)
    })
}
