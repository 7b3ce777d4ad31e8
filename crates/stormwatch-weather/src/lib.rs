//! Adapter over the external weather provider.
//!
//! The batch runner only depends on the [`WeatherSource`] trait; the
//! [`openweather::OpenWeatherClient`] is the production implementation over
//! the OpenWeatherMap current-conditions API. The adapter performs no
//! retries — a failed lookup is recorded against the rule and retried
//! naturally on the next scheduled run.

pub mod error;
pub mod openweather;

use async_trait::async_trait;
use stormwatch_common::types::WeatherObservation;

/// A source of current weather conditions, queried by location string.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetches current conditions for the given location.
    ///
    /// # Errors
    ///
    /// Returns [`error::WeatherError::Lookup`] on a non-success provider
    /// response and [`error::WeatherError::Parse`] when the payload carries
    /// no usable temperature.
    async fn current(&self, location: &str) -> error::Result<WeatherObservation>;
}
