//! Current weather for a city via the OpenWeather API.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::util::capitalize;

/// Weather for one city, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub city: String,
    pub temp: f64,
    pub feels_like: f64,
    pub description: String,
}

/// Outcome of a lookup. Failures carry a user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherReport {
    Found(Weather),
    Failed { error: String },
}

#[derive(Debug, thiserror::Error)]
enum WeatherError {
    #[error("weather API key is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("weather service answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("weather payload has no conditions")]
    MissingConditions,
}

impl From<reqwest::Error> for WeatherError {
    /// The request URL carries the API key in its query string.
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Request(e.without_url())
    }
}

impl WeatherError {
    fn user_message(&self) -> String {
        match self {
            WeatherError::NotConfigured => "Weather lookup is not configured.".to_string(),
            WeatherError::Status(_) => "The weather service rejected the request.".to_string(),
            WeatherError::Request(e) if e.is_decode() => {
                "The weather service sent an unexpected response.".to_string()
            }
            WeatherError::MissingConditions => {
                "The weather service sent an unexpected response.".to_string()
            }
            WeatherError::Request(_) => "Could not reach the weather service.".to_string(),
        }
    }
}

/// OpenWeather response (only the fields we display).
#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    name: String,
    main: OpenWeatherMain,
    #[serde(default)]
    weather: Vec<OpenWeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCondition {
    description: String,
}

#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            http: super::http_client(timeout)?,
            config,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Look up `city`. Never fails; errors become [`WeatherReport::Failed`].
    pub async fn lookup(&self, city: &str) -> WeatherReport {
        match self.fetch(city).await {
            Ok(weather) => WeatherReport::Found(weather),
            Err(e) => {
                tracing::warn!("Weather lookup for '{}' failed: {}", city, e);
                WeatherReport::Failed {
                    error: e.user_message(),
                }
            }
        }
    }

    async fn fetch(&self, city: &str) -> Result<Weather, WeatherError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(WeatherError::NotConfigured)?;

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("q", city),
                ("appid", api_key),
                ("units", self.config.units.as_str()),
                ("lang", self.config.lang.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Weather service answered {} for '{}'", status, city);
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body: OpenWeatherResponse = response.json().await?;
        let condition = body
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::MissingConditions)?;

        Ok(Weather {
            city: body.name,
            temp: body.main.temp,
            feels_like: body.main.feels_like,
            description: capitalize(&condition.description),
        })
    }
}
