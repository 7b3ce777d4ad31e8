//! Read-only adapter over the external alert-rule store.
//!
//! The store owns rule lifecycle (users create and delete rules upstream);
//! the engine only lists them, joined with each owner's contact info. A
//! store failure is the single fatal condition of a batch run.

pub mod error;

use async_trait::async_trait;
use error::{Result, StoreError};
use serde::Deserialize;
use std::time::Duration;
use stormwatch_common::types::{AlertRule, ContactInfo, DeliveryMethod, LoadedAlert};

/// Source of the full alert-rule set. No filtering: every rule is
/// evaluated on every run.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Loads all alert rules joined with their owners' contact info.
    async fn load_alerts(&self) -> Result<Vec<LoadedAlert>>;
}

/// Rule store client over a PostgREST-style endpoint.
///
/// One GET returns every alert row with the owning user's contact columns
/// embedded, mirroring the upstream store's foreign-key join.
pub struct RestRuleStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl RestRuleStore {
    pub fn new(base_url: &str, service_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct AlertRow {
    id: String,
    user_id: String,
    location: String,
    condition: String,
    method: DeliveryMethod,
    #[serde(default)]
    users: Option<ContactRow>,
}

#[derive(Deserialize)]
struct ContactRow {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
}

impl From<AlertRow> for LoadedAlert {
    fn from(row: AlertRow) -> Self {
        // A missing join row surfaces later as MissingContact on dispatch,
        // which is per-rule and non-fatal.
        let contact = match row.users {
            Some(user) => ContactInfo {
                email: user.email.unwrap_or_default(),
                phone_number: user.phone_number,
            },
            None => ContactInfo {
                email: String::new(),
                phone_number: None,
            },
        };
        LoadedAlert {
            rule: AlertRule {
                id: row.id,
                user_id: row.user_id,
                location: row.location,
                condition: row.condition,
                method: row.method,
            },
            contact,
        }
    }
}

#[async_trait]
impl RuleStore for RestRuleStore {
    async fn load_alerts(&self) -> Result<Vec<LoadedAlert>> {
        let url = format!("{}/rest/v1/alerts", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[(
                "select",
                "id,user_id,location,condition,method,users(email,phone_number)",
            )])
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<AlertRow> = serde_json::from_str(&body)?;
        tracing::debug!(count = rows.len(), "Alert rules loaded");
        Ok(rows.into_iter().map(LoadedAlert::from).collect())
    }
}
