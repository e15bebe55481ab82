use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::{Header, HeaderName, HeaderValue};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use newsletter_logging::pipeline_warn;
use thiserror::Error;

use crate::config::{ConfigError, MailConfig, SmtpSettings};

/// Port that expects TLS from the first byte; every other port upgrades with STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// One personalized message ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: String,
    pub unsubscribe_url: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid address {address:?}: {message}")]
    Address { address: String, message: String },
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("smtp error: {0}")]
    Smtp(String),
}

/// Sends one message and returns the server's receipt.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, TransportError>;
}

/// SMTP transport over lettre's tokio executor.
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self, ConfigError> {
        let from = settings
            .from
            .parse::<Mailbox>()
            .map_err(|_| ConfigError::Invalid {
                key: "SMTP_FROM",
                value: settings.from.clone(),
            })?;

        let relay = if settings.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        };
        let builder = relay.map_err(|err| ConfigError::Transport(err.to_string()))?;

        let inner = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ))
            .timeout(Some(settings.timeout))
            .build();

        Ok(Self { inner, from })
    }

    pub(crate) fn build_message(&self, email: &OutgoingEmail) -> Result<Message, TransportError> {
        let to = Mailbox::new(email.to_name.clone(), parse_address(&email.to)?);
        let reply_to = Mailbox::new(None, parse_address(&email.reply_to)?);

        Message::builder()
            .from(self.from.clone())
            .reply_to(reply_to)
            .to(to)
            .subject(email.subject.clone())
            .header(ListUnsubscribe(email.unsubscribe_url.clone()))
            .header(ListUnsubscribePost)
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|err| TransportError::Message(err.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, TransportError> {
        let message = self.build_message(email)?;
        let response = self
            .inner
            .send(message)
            .await
            .map_err(|err| TransportError::Smtp(err.to_string()))?;
        let detail = response.message().next().unwrap_or_default();
        Ok(format!("{} {detail}", response.code()).trim_end().to_string())
    }
}

/// Builds the configured transport.
///
/// Returns `Ok(None)` in development when credentials are absent; delivery is
/// then simulated.
pub fn create_transport(config: &MailConfig) -> Result<Option<Arc<dyn MailTransport>>, ConfigError> {
    match &config.smtp {
        Some(settings) => {
            let transport = SmtpTransport::from_settings(settings)?;
            Ok(Some(Arc::new(transport)))
        }
        None if config.environment.is_development() => {
            pipeline_warn!("SMTP is not configured; newsletter delivery will be simulated");
            Ok(None)
        }
        None => Err(ConfigError::MissingSmtpCredentials),
    }
}

fn parse_address(address: &str) -> Result<Address, TransportError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|err| TransportError::Address {
            address: address.to_string(),
            message: err.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListUnsubscribe(String);

impl Header for ListUnsubscribe {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("List-Unsubscribe")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(
            s.trim().trim_start_matches('<').trim_end_matches('>').to_string(),
        ))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), format!("<{}>", self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListUnsubscribePost;

impl Header for ListUnsubscribePost {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("List-Unsubscribe-Post")
    }

    fn parse(_: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self)
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), "List-Unsubscribe=One-Click".to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{create_transport, OutgoingEmail, SmtpTransport, TransportError};
    use crate::config::{AppEnvironment, ConfigError, MailConfig, SmtpSettings};

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".into(),
            port: 587,
            user: "mailer@example.com".into(),
            pass: "secret".into(),
            from: "Ada Author <mailer@example.com>".into(),
            timeout: Duration::from_secs(30),
        }
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "reader@example.com".into(),
            to_name: Some("Reader".into()),
            subject: "October Dispatch".into(),
            html: "<p>hi</p>".into(),
            text: "hi".into(),
            reply_to: "ada@example.com".into(),
            unsubscribe_url: "https://ada.example/u?e=1".into(),
        }
    }

    #[test]
    fn message_carries_reply_to_and_unsubscribe_headers() {
        let transport = SmtpTransport::from_settings(&settings()).unwrap();
        let message = transport.build_message(&email()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Reply-To: ada@example.com"));
        assert!(raw.contains("List-Unsubscribe: <https://ada.example/u?e=1>"));
        assert!(raw.contains("List-Unsubscribe-Post: List-Unsubscribe=One-Click"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn bad_recipient_address_is_a_transport_error() {
        let transport = SmtpTransport::from_settings(&settings()).unwrap();
        let mut email = email();
        email.to = "not an address".into();
        assert!(matches!(
            transport.build_message(&email),
            Err(TransportError::Address { .. })
        ));
    }

    #[test]
    fn missing_credentials_depend_on_environment() {
        let dev = MailConfig {
            environment: AppEnvironment::Development,
            smtp: None,
        };
        assert!(create_transport(&dev).unwrap().is_none());

        let prod = MailConfig {
            environment: AppEnvironment::Production,
            smtp: None,
        };
        assert_eq!(
            create_transport(&prod).err(),
            Some(ConfigError::MissingSmtpCredentials)
        );
    }
}
