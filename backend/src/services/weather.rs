//! Weather lookups with a deterministic offline fallback

use std::sync::Arc;

use serde::Serialize;
use shared::WeatherData;

use crate::external::{AgronomyProvider, ProviderError};

/// Where a weather reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    Provider,
    Synthetic,
}

/// Weather reading for one location
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub source: WeatherSource,
    #[serde(flatten)]
    pub data: WeatherData,
}

/// Weather service; never fails, substitutes a synthetic reading instead
#[derive(Clone)]
pub struct WeatherService {
    provider: Option<Arc<dyn AgronomyProvider>>,
    default_location: String,
}

impl WeatherService {
    pub fn new(provider: Option<Arc<dyn AgronomyProvider>>, default_location: String) -> Self {
        Self {
            provider,
            default_location,
        }
    }

    pub fn default_location(&self) -> &str {
        &self.default_location
    }

    /// Current conditions for `location`, or the configured default location
    pub async fn current(&self, location: Option<&str>) -> WeatherReport {
        let location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_location)
            .to_string();

        let result = match self.provider.as_deref() {
            Some(provider) => provider.current_weather(&location).await,
            None => Err(ProviderError::NotConfigured),
        };

        match result {
            Ok(data) => WeatherReport {
                location,
                source: WeatherSource::Provider,
                data,
            },
            Err(e) => {
                tracing::warn!("Weather lookup for {} failed, using synthetic reading: {}", location, e);
                let data = WeatherData::synthetic(&location);
                WeatherReport {
                    location,
                    source: WeatherSource::Synthetic,
                    data,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_uses_synthetic() {
        let service = WeatherService::new(None, "Tekirdağ, Hayrabolu".to_string());

        let first = service.current(Some("Konya")).await;
        let second = service.current(Some("Konya")).await;
        assert_eq!(first.source, WeatherSource::Synthetic);
        assert_eq!(first.data, second.data);
        assert_eq!(first.data, WeatherData::synthetic("Konya"));
    }

    #[tokio::test]
    async fn test_blank_location_uses_default() {
        let service = WeatherService::new(None, "Tekirdağ, Hayrabolu".to_string());
        let report = service.current(Some("  ")).await;
        assert_eq!(report.location, "Tekirdağ, Hayrabolu");
        assert_eq!(report.data, WeatherData::synthetic("Tekirdağ, Hayrabolu"));
    }
}
