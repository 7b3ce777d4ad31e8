use stormwatch_common::types::DeliveryMethod;

/// Errors from the notification dispatch subsystem.
///
/// # Examples
///
/// ```rust
/// use stormwatch_common::types::DeliveryMethod;
/// use stormwatch_notify::error::NotifyError;
///
/// let err = NotifyError::MissingContact(DeliveryMethod::Sms);
/// assert!(err.to_string().contains("sms"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The contact field required by the delivery method is empty or absent.
    #[error("no {0} contact on record for this rule's owner")]
    MissingContact(DeliveryMethod),

    /// The recipient value is present but not deliverable
    /// (e.g. a phone number that is not E.164-shaped).
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// SMTP transport failure while handing the message to the email provider.
    #[error("email delivery failed: {0}")]
    EmailDelivery(String),

    /// The SMS gateway returned a non-success response.
    #[error("sms delivery failed: status={status}, body={body}")]
    SmsDelivery { status: u16, body: String },

    /// Underlying HTTP transport error from `reqwest`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Convenience `Result` alias for dispatch operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
