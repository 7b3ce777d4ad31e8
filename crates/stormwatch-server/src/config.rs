use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Upper bound on rules evaluated concurrently within one batch.
    #[serde(default = "default_max_concurrent_rules")]
    pub max_concurrent_rules: usize,

    /// Per-call timeout for weather, store and SMS gateway requests.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    pub store: StoreConfig,
    pub weather: WeatherConfig,
    pub email: EmailConfig,
    pub sms: SmsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    #[serde(default)]
    pub service_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub gateway_url: String,
    #[serde(default)]
    pub api_key: String,
    pub from_number: String,
}

fn default_http_port() -> u16 {
    8080
}

fn default_max_concurrent_rules() -> usize {
    8
}

fn default_provider_timeout_secs() -> u64 {
    10
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Environment variables override file-configured credentials so
    /// secrets can stay out of the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("STORMWATCH_STORE_KEY") {
            self.store.service_key = v;
        }
        if let Ok(v) = std::env::var("STORMWATCH_WEATHER_KEY") {
            self.weather.api_key = v;
        }
        if let Ok(v) = std::env::var("STORMWATCH_SMTP_PASSWORD") {
            self.email.password = Some(v);
        }
        if let Ok(v) = std::env::var("STORMWATCH_SMS_KEY") {
            self.sms.api_key = v;
        }
    }

    /// Missing provider credentials are a startup-time fatal condition,
    /// never a per-rule error.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.store.base_url.is_empty() {
            anyhow::bail!("store.base_url is required");
        }
        if self.store.service_key.is_empty() {
            anyhow::bail!("store.service_key is required (or set STORMWATCH_STORE_KEY)");
        }
        if self.weather.api_key.is_empty() {
            anyhow::bail!("weather.api_key is required (or set STORMWATCH_WEATHER_KEY)");
        }
        if self.sms.api_key.is_empty() {
            anyhow::bail!("sms.api_key is required (or set STORMWATCH_SMS_KEY)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let raw = r#"
            [store]
            base_url = "https://store.example.com"
            service_key = "key"

            [weather]
            api_key = "owm-key"

            [email]
            smtp_host = "smtp.example.com"
            from = "alerts@example.com"

            [sms]
            gateway_url = "https://sms.example.com/send"
            api_key = "sms-key"
            from_number = "+15005550006"
        "#;
        let config: ServerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.max_concurrent_rules, 8);
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_weather_key_fails_validation() {
        let raw = r#"
            [store]
            base_url = "https://store.example.com"
            service_key = "key"

            [weather]

            [email]
            smtp_host = "smtp.example.com"
            from = "alerts@example.com"

            [sms]
            gateway_url = "https://sms.example.com/send"
            api_key = "sms-key"
            from_number = "+15005550006"
        "#;
        let config: ServerConfig = toml::from_str(raw).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weather.api_key"));
    }
}
