//! Notification delivery for triggered weather alerts.
//!
//! A [`Dispatcher`] routes a composed [`AlertMessage`] to the owner's
//! configured channel (email or SMS) and validates contact info before any
//! provider call. Channels implement [`NotificationChannel`] and make
//! exactly one delivery attempt per call — the next scheduled batch run is
//! the retry.

pub mod channels;
pub mod error;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use error::{NotifyError, Result};
use std::sync::Arc;
use stormwatch_common::types::{ContactInfo, DeliveryMethod};

/// Rendered notification content, composed by the batch runner.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

/// Acknowledgement of one successful delivery.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub channel: String,
    pub recipient: String,
}

/// A delivery channel that hands a message to an external provider
/// (SMTP relay, SMS gateway).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers the message to one recipient. One attempt, no queueing.
    async fn send(&self, recipient: &str, message: &AlertMessage) -> Result<DeliveryReceipt>;

    /// Returns the channel type name (e.g. `"email"`, `"sms"`).
    fn channel_name(&self) -> &str;
}

/// Routes messages to the channel matching a rule's delivery method.
///
/// Contact validation happens here, before the provider is touched: an
/// empty email or phone number is rejected with
/// [`NotifyError::MissingContact`], and a phone number that is not
/// E.164-shaped with [`NotifyError::InvalidRecipient`].
pub struct Dispatcher {
    email: Arc<dyn NotificationChannel>,
    sms: Arc<dyn NotificationChannel>,
}

impl Dispatcher {
    pub fn new(email: Arc<dyn NotificationChannel>, sms: Arc<dyn NotificationChannel>) -> Self {
        Self { email, sms }
    }

    pub async fn send(
        &self,
        method: DeliveryMethod,
        contact: &ContactInfo,
        message: &AlertMessage,
    ) -> Result<DeliveryReceipt> {
        match method {
            DeliveryMethod::Email => {
                let address = contact.email.trim();
                if address.is_empty() {
                    return Err(NotifyError::MissingContact(method));
                }
                self.email.send(address, message).await
            }
            DeliveryMethod::Sms => {
                let number = contact.phone_number.as_deref().unwrap_or("").trim();
                if number.is_empty() {
                    return Err(NotifyError::MissingContact(method));
                }
                if !is_e164(number) {
                    return Err(NotifyError::InvalidRecipient(number.to_string()));
                }
                self.sms.send(number, message).await
            }
        }
    }
}

/// Checks the E.164 shape `+` then a 1-9 digit then 1..=14 more digits.
pub fn is_e164(number: &str) -> bool {
    let Some(digits) = number.strip_prefix('+') else {
        return false;
    };
    if digits.len() < 2 || digits.len() > 15 {
        return false;
    }
    let mut chars = digits.chars();
    matches!(chars.next(), Some('1'..='9')) && chars.all(|c| c.is_ascii_digit())
}
