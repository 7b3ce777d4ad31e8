use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use stormwatch_notify::channels::email::EmailChannel;
use stormwatch_notify::channels::sms::SmsChannel;
use stormwatch_notify::Dispatcher;
use stormwatch_store::RestRuleStore;
use stormwatch_weather::openweather::OpenWeatherClient;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use stormwatch_server::app;
use stormwatch_server::config::ServerConfig;
use stormwatch_server::runner::BatchRunner;
use stormwatch_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stormwatch=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/server.toml".to_string());
    let mut config = ServerConfig::load(&config_path)?;
    config.apply_env_overrides();
    config.validate()?;

    tracing::info!(
        http_port = config.http_port,
        store = %config.store.base_url,
        weather = %config.weather.base_url,
        max_concurrent = config.max_concurrent_rules,
        "stormwatch-server starting"
    );

    let timeout = Duration::from_secs(config.provider_timeout_secs);

    let store = Arc::new(RestRuleStore::new(
        &config.store.base_url,
        &config.store.service_key,
        timeout,
    )?);
    let weather = Arc::new(OpenWeatherClient::new(
        &config.weather.base_url,
        &config.weather.api_key,
        timeout,
    )?);
    let email = Arc::new(EmailChannel::new(
        &config.email.smtp_host,
        config.email.smtp_port,
        config.email.username.as_deref(),
        config.email.password.as_deref(),
        &config.email.from,
    )?);
    let sms = Arc::new(SmsChannel::new(
        &config.sms.gateway_url,
        &config.sms.api_key,
        &config.sms.from_number,
        timeout,
    )?);
    let dispatcher = Arc::new(Dispatcher::new(email, sms));

    let runner = Arc::new(BatchRunner::new(
        store,
        weather,
        dispatcher,
        config.max_concurrent_rules,
    ));

    let state = AppState {
        runner,
        start_time: Utc::now(),
    };

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = app::build_http_app(state);

    tracing::info!(http = %addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
