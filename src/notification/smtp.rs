//! SMTP notifier.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;
use crate::contact::ContactRecord;
use crate::notification::{render_body, NotificationError, Notifier};

const SUBJECT: &str = "New Contact Form Submission";

/// Sends one plain-text email per contact to the configured operator.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Build the transport. No connection is made until the first send.
    pub fn new(config: &MailConfig) -> Result<Self, NotificationError> {
        let builder = if config.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let mut builder = builder.port(config.port);
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from_address: Address = config
            .from_address()
            .ok_or_else(|| NotificationError::Rejected("no sender address configured".into()))?
            .parse()?;
        let to_address: Address = config.recipient.parse()?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            implicit_tls = config.implicit_tls(),
            recipient = %config.recipient,
            "SMTP notifier configured"
        );

        Ok(Self {
            transport: builder.build(),
            from: Mailbox::new(Some(config.sender_name.clone()), from_address),
            to: Mailbox::new(None, to_address),
        })
    }

    fn build_message(&self, record: &ContactRecord) -> Result<Message, NotificationError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(render_body(record))?)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, record: &ContactRecord) -> Result<(), NotificationError> {
        let message = self.build_message(record)?;
        let response = self.transport.send(message).await?;

        if !response.is_positive() {
            return Err(NotificationError::Rejected(format!("{:?}", response.code())));
        }
        Ok(())
    }
}
