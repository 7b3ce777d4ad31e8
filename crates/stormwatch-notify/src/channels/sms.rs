use crate::error::{NotifyError, Result};
use crate::{AlertMessage, DeliveryReceipt, NotificationChannel};
use async_trait::async_trait;
use std::time::Duration;

/// SMS channel over an HTTP gateway with bearer-token auth.
///
/// The gateway accepts `{to, from, message}` as JSON; the subject line is
/// dropped since SMS carries body text only.
pub struct SmsChannel {
    client: reqwest::Client,
    gateway_url: String,
    api_key: String,
    from_number: String,
}

impl SmsChannel {
    pub fn new(
        gateway_url: &str,
        api_key: &str,
        from_number: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            gateway_url: gateway_url.to_string(),
            api_key: api_key.to_string(),
            from_number: from_number.to_string(),
        })
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    async fn send(&self, recipient: &str, message: &AlertMessage) -> Result<DeliveryReceipt> {
        let payload = serde_json::json!({
            "to": recipient,
            "from": self.from_number,
            "message": message.body,
        });

        let response = self
            .client
            .post(&self.gateway_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::SmsDelivery {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(recipient, "SMS sent");
        Ok(DeliveryReceipt {
            channel: "sms".to_string(),
            recipient: recipient.to_string(),
        })
    }

    fn channel_name(&self) -> &str {
        "sms"
    }
}
