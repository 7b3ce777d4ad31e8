/// Errors from the weather provider adapter.
///
/// # Examples
///
/// ```rust
/// use stormwatch_weather::error::WeatherError;
///
/// let err = WeatherError::Lookup {
///     location: "Paris".to_string(),
///     status: 404,
///     body: "city not found".to_string(),
/// };
/// assert!(err.to_string().contains("Paris"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// Non-2xx response from the weather provider for a location lookup.
    #[error("weather lookup for '{location}' failed: status={status}, body={body}")]
    Lookup {
        location: String,
        status: u16,
        body: String,
    },

    /// Response body could not be read as a valid observation
    /// (e.g. missing temperature field).
    #[error("weather response could not be parsed: {0}")]
    Parse(String),

    /// Underlying HTTP transport error from `reqwest`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Convenience `Result` alias for weather lookups.
pub type Result<T> = std::result::Result<T, WeatherError>;
