use crate::error::NotifyError;
use crate::{is_e164, AlertMessage, DeliveryReceipt, Dispatcher, NotificationChannel};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stormwatch_common::types::{ContactInfo, DeliveryMethod};

/// Counts delivery attempts so tests can assert the provider was never hit.
struct CountingChannel {
    name: &'static str,
    calls: AtomicUsize,
}

impl CountingChannel {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl NotificationChannel for CountingChannel {
    async fn send(
        &self,
        recipient: &str,
        _message: &AlertMessage,
    ) -> crate::error::Result<DeliveryReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DeliveryReceipt {
            channel: self.name.to_string(),
            recipient: recipient.to_string(),
        })
    }

    fn channel_name(&self) -> &str {
        self.name
    }
}

fn message() -> AlertMessage {
    AlertMessage {
        subject: "Weather Alert for Paris".into(),
        body: "Weather Alert: Current temperature in Paris is 32°C".into(),
    }
}

#[test]
fn e164_accepts_valid_numbers() {
    assert!(is_e164("+14155552671"));
    assert!(is_e164("+4915112345678"));
    assert!(is_e164("+86138001380000"));
    assert!(is_e164("+12")); // minimal two-digit form
}

#[test]
fn e164_rejects_malformed_numbers() {
    assert!(!is_e164(""));
    assert!(!is_e164("+"));
    assert!(!is_e164("+1")); // needs at least one digit after the country digit
    assert!(!is_e164("14155552671")); // missing plus
    assert!(!is_e164("+01234567")); // leading zero
    assert!(!is_e164("+1415555BAD"));
    assert!(!is_e164("+1234567890123456")); // 16 digits
}

#[tokio::test]
async fn email_dispatch_routes_to_email_channel() {
    let email = CountingChannel::new("email");
    let sms = CountingChannel::new("sms");
    let dispatcher = Dispatcher::new(email.clone(), sms.clone());

    let contact = ContactInfo {
        email: "user@example.com".into(),
        phone_number: None,
    };
    let receipt = dispatcher
        .send(DeliveryMethod::Email, &contact, &message())
        .await
        .unwrap();

    assert_eq!(receipt.channel, "email");
    assert_eq!(receipt.recipient, "user@example.com");
    assert_eq!(email.calls.load(Ordering::SeqCst), 1);
    assert_eq!(sms.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_email_rejected_without_provider_call() {
    let email = CountingChannel::new("email");
    let sms = CountingChannel::new("sms");
    let dispatcher = Dispatcher::new(email.clone(), sms.clone());

    let contact = ContactInfo {
        email: "  ".into(),
        phone_number: None,
    };
    let err = dispatcher
        .send(DeliveryMethod::Email, &contact, &message())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::MissingContact(DeliveryMethod::Email)));
    assert_eq!(email.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_phone_rejected_without_provider_call() {
    let email = CountingChannel::new("email");
    let sms = CountingChannel::new("sms");
    let dispatcher = Dispatcher::new(email.clone(), sms.clone());

    let contact = ContactInfo {
        email: "user@example.com".into(),
        phone_number: None,
    };
    let err = dispatcher
        .send(DeliveryMethod::Sms, &contact, &message())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::MissingContact(DeliveryMethod::Sms)));
    assert_eq!(sms.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_phone_rejected_without_provider_call() {
    let email = CountingChannel::new("email");
    let sms = CountingChannel::new("sms");
    let dispatcher = Dispatcher::new(email, sms.clone());

    let contact = ContactInfo {
        email: String::new(),
        phone_number: Some("0047123456".into()),
    };
    let err = dispatcher
        .send(DeliveryMethod::Sms, &contact, &message())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::InvalidRecipient(_)));
    assert_eq!(sms.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_phone_reaches_sms_channel() {
    let email = CountingChannel::new("email");
    let sms = CountingChannel::new("sms");
    let dispatcher = Dispatcher::new(email, sms.clone());

    let contact = ContactInfo {
        email: String::new(),
        phone_number: Some("+4791234567".into()),
    };
    let receipt = dispatcher
        .send(DeliveryMethod::Sms, &contact, &message())
        .await
        .unwrap();

    assert_eq!(receipt.channel, "sms");
    assert_eq!(sms.calls.load(Ordering::SeqCst), 1);
}
