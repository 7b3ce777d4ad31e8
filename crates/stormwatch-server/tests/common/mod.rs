#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stormwatch_common::types::{AlertRule, ContactInfo, DeliveryMethod, LoadedAlert};
use stormwatch_notify::error::Result as NotifyResult;
use stormwatch_notify::{AlertMessage, DeliveryReceipt, Dispatcher, NotificationChannel};
use stormwatch_server::app;
use stormwatch_server::runner::BatchRunner;
use stormwatch_server::state::AppState;
use stormwatch_store::error::{Result as StoreResult, StoreError};
use stormwatch_store::RuleStore;
use stormwatch_weather::error::{Result as WeatherResult, WeatherError};
use stormwatch_weather::WeatherSource;
use tower::util::ServiceExt;

pub struct FakeStore {
    pub alerts: Vec<LoadedAlert>,
    pub unreachable: bool,
}

#[async_trait]
impl RuleStore for FakeStore {
    async fn load_alerts(&self) -> StoreResult<Vec<LoadedAlert>> {
        if self.unreachable {
            return Err(StoreError::Http {
                status: 503,
                body: "connection refused".to_string(),
            });
        }
        Ok(self.alerts.clone())
    }
}

/// Serves canned temperatures per location; unknown locations fail the
/// lookup the way the real provider does.
pub struct FakeWeather {
    pub temps: HashMap<String, f64>,
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn current(
        &self,
        location: &str,
    ) -> WeatherResult<stormwatch_common::types::WeatherObservation> {
        match self.temps.get(location) {
            Some(&temp) => Ok(stormwatch_common::types::WeatherObservation {
                temperature_c: temp,
                humidity: None,
                wind_speed: None,
                description: None,
            }),
            None => Err(WeatherError::Lookup {
                location: location.to_string(),
                status: 404,
                body: "city not found".to_string(),
            }),
        }
    }
}

/// Records (recipient, subject) pairs instead of delivering.
pub struct RecordingChannel {
    name: &'static str,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str) -> (Arc<Self>, Arc<Mutex<Vec<(String, String)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let channel = Arc::new(Self {
            name,
            calls: calls.clone(),
        });
        (channel, calls)
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send(&self, recipient: &str, message: &AlertMessage) -> NotifyResult<DeliveryReceipt> {
        self.calls
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.subject.clone()));
        Ok(DeliveryReceipt {
            channel: self.name.to_string(),
            recipient: recipient.to_string(),
        })
    }

    fn channel_name(&self) -> &str {
        self.name
    }
}

pub struct TestContext {
    pub app: axum::Router,
    pub email_calls: Arc<Mutex<Vec<(String, String)>>>,
    pub sms_calls: Arc<Mutex<Vec<(String, String)>>>,
}

pub fn build_test_context(
    alerts: Vec<LoadedAlert>,
    temps: HashMap<String, f64>,
    store_unreachable: bool,
) -> TestContext {
    let store = Arc::new(FakeStore {
        alerts,
        unreachable: store_unreachable,
    });
    let weather = Arc::new(FakeWeather { temps });
    let (email, email_calls) = RecordingChannel::new("email");
    let (sms, sms_calls) = RecordingChannel::new("sms");
    let dispatcher = Arc::new(Dispatcher::new(email, sms));
    let runner = Arc::new(BatchRunner::new(store, weather, dispatcher, 4));

    let state = AppState {
        runner,
        start_time: Utc::now(),
    };

    TestContext {
        app: app::build_http_app(state),
        email_calls,
        sms_calls,
    }
}

pub fn email_alert(id: &str, location: &str, condition: &str, email: &str) -> LoadedAlert {
    LoadedAlert {
        rule: AlertRule {
            id: id.to_string(),
            user_id: format!("user-{id}"),
            location: location.to_string(),
            condition: condition.to_string(),
            method: DeliveryMethod::Email,
        },
        contact: ContactInfo {
            email: email.to_string(),
            phone_number: None,
        },
    }
}

pub fn sms_alert(id: &str, location: &str, condition: &str, phone: Option<&str>) -> LoadedAlert {
    LoadedAlert {
        rule: AlertRule {
            id: id.to_string(),
            user_id: format!("user-{id}"),
            location: location.to_string(),
            condition: condition.to_string(),
            method: DeliveryMethod::Sms,
        },
        contact: ContactInfo {
            email: String::new(),
            phone_number: phone.map(str::to_string),
        },
    }
}

pub async fn post_check(app: &axum::Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/alerts/check")
        .body(Body::empty())
        .expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("handler should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json: Value = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, json)
}
