use crate::error::{Result, WeatherError};
use crate::WeatherSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use stormwatch_common::types::WeatherObservation;

/// Weather provider client for the OpenWeatherMap current-conditions API.
///
/// Units are fixed to metric so `main.temp` is always Celsius.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct WeatherPayload {
    main: MainSection,
    #[serde(default)]
    wind: Option<WindSection>,
    #[serde(default)]
    weather: Vec<ConditionSection>,
}

#[derive(Deserialize)]
struct MainSection {
    temp: f64,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Deserialize)]
struct WindSection {
    speed: f64,
}

#[derive(Deserialize)]
struct ConditionSection {
    description: String,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, location: &str) -> Result<WeatherObservation> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Lookup {
                location: location.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: WeatherPayload = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("invalid observation for '{location}': {e}")))?;

        tracing::debug!(
            location,
            temp = payload.main.temp,
            "Weather observation fetched"
        );

        Ok(WeatherObservation {
            temperature_c: payload.main.temp,
            humidity: payload.main.humidity,
            wind_speed: payload.wind.map(|w| w.speed),
            description: payload.weather.into_iter().next().map(|c| c.description),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_with_temperature_parses() {
        let body = r#"{
            "main": {"temp": 21.4, "humidity": 60},
            "wind": {"speed": 3.2},
            "weather": [{"description": "scattered clouds"}]
        }"#;
        let payload: WeatherPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.main.temp, 21.4);
        assert_eq!(payload.main.humidity, Some(60.0));
        assert_eq!(payload.weather[0].description, "scattered clouds");
    }

    #[test]
    fn payload_without_temperature_is_rejected() {
        let body = r#"{"main": {"humidity": 60}}"#;
        assert!(serde_json::from_str::<WeatherPayload>(body).is_err());
    }

    #[test]
    fn optional_sections_may_be_absent() {
        let body = r#"{"main": {"temp": -2.0}}"#;
        let payload: WeatherPayload = serde_json::from_str(body).unwrap();
        assert!(payload.wind.is_none());
        assert!(payload.weather.is_empty());
    }
}
