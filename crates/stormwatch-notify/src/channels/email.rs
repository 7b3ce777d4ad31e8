use crate::error::{NotifyError, Result};
use crate::{AlertMessage, DeliveryReceipt, NotificationChannel};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Email channel over an SMTP relay.
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl EmailChannel {
    pub fn new(
        smtp_host: &str,
        smtp_port: u16,
        username: Option<&str>,
        password: Option<&str>,
        from: &str,
    ) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
            .map_err(|e| NotifyError::EmailDelivery(e.to_string()))?
            .port(smtp_port);

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.to_string(),
        })
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    async fn send(&self, recipient: &str, message: &AlertMessage) -> Result<DeliveryReceipt> {
        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| NotifyError::InvalidRecipient(self.from.clone()))?,
            )
            .to(recipient
                .parse()
                .map_err(|_| NotifyError::InvalidRecipient(recipient.to_string()))?)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| NotifyError::EmailDelivery(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::EmailDelivery(e.to_string()))?;

        tracing::info!(recipient, "Email sent");
        Ok(DeliveryReceipt {
            channel: "email".to_string(),
            recipient: recipient.to_string(),
        })
    }

    fn channel_name(&self) -> &str {
        "email"
    }
}
