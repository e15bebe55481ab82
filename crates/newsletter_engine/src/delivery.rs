use std::sync::Arc;
use std::time::Duration;

use newsletter_core::{
    normalize, redact_address, Book, DeliveryResult, ExtractedContent, NormalizeOptions,
    Recipient, SubscriberRef,
};
use newsletter_logging::{pipeline_debug, pipeline_info, pipeline_warn};
use thiserror::Error;

use crate::assemble::TemplateDataAssembler;
use crate::catalog::Catalog;
use crate::component::RenderError;
use crate::config::{ConfigError, NewsletterConfig};
use crate::render::DualFormatRenderer;
use crate::transport::{create_transport, MailTransport, OutgoingEmail, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySettings {
    /// Pause before each recipient after the first.
    pub delay: Duration,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(100),
        }
    }
}

/// The issue handed to the delivery engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterIssue {
    pub content: ExtractedContent,
}

impl NewsletterIssue {
    pub fn new(content: ExtractedContent) -> Self {
        Self { content }
    }

    pub fn from_raw(html: &str, options: &NormalizeOptions) -> Self {
        Self::new(normalize(html, options))
    }

    pub fn subject(&self) -> &str {
        &self.content.subject
    }
}

#[derive(Debug, Error)]
enum SendError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Sends one issue to a list of recipients, one at a time.
pub struct DeliveryEngine {
    assembler: TemplateDataAssembler,
    renderer: DualFormatRenderer,
    transport: Option<Arc<dyn MailTransport>>,
    reply_to: String,
    settings: DeliverySettings,
}

impl DeliveryEngine {
    /// `transport = None` simulates delivery without touching the network.
    pub fn new(
        assembler: TemplateDataAssembler,
        renderer: DualFormatRenderer,
        transport: Option<Arc<dyn MailTransport>>,
        reply_to: impl Into<String>,
        settings: DeliverySettings,
    ) -> Self {
        Self {
            assembler,
            renderer,
            transport,
            reply_to: reply_to.into(),
            settings,
        }
    }

    pub fn from_config(
        config: &NewsletterConfig,
        catalog: Arc<dyn Catalog>,
    ) -> Result<Self, ConfigError> {
        let transport = create_transport(&config.mail)?;
        let renderer = DualFormatRenderer::with_handlebars()
            .map_err(|err| ConfigError::Renderer(err.to_string()))?;
        Ok(Self::new(
            TemplateDataAssembler::new(catalog, config.site.profile()),
            renderer,
            transport,
            config.site.author_email.clone(),
            config.delivery.clone(),
        ))
    }

    pub fn is_simulated(&self) -> bool {
        self.transport.is_none()
    }

    /// Delivers `issue` to every recipient in order and tallies the outcome.
    ///
    /// Per-recipient failures are recorded and never stop the run.
    pub async fn deliver(&self, issue: &NewsletterIssue, recipients: &[Recipient]) -> DeliveryResult {
        let mut result = DeliveryResult::new();
        if recipients.is_empty() {
            pipeline_info!("No recipients for '{}', nothing to send", issue.subject());
            return result;
        }

        let Some(transport) = self.transport.as_deref() else {
            for recipient in recipients {
                pipeline_info!(
                    "Simulated delivery of '{}' to {}",
                    issue.subject(),
                    redact_address(&recipient.email)
                );
                result.record_sent();
            }
            return result;
        };

        pipeline_info!(
            "Delivering '{}' to {} recipient(s)",
            issue.subject(),
            recipients.len()
        );
        let books = self.assembler.featured_books().await;

        for (idx, recipient) in recipients.iter().enumerate() {
            if idx > 0 && !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }
            match self.send_one(transport, issue, recipient, &books).await {
                Ok(receipt) => {
                    pipeline_debug!(
                        "Sent to {} ({receipt})",
                        redact_address(&recipient.email)
                    );
                    result.record_sent();
                }
                Err(err) => {
                    pipeline_warn!(
                        "Failed to send to {}: {err}",
                        redact_address(&recipient.email)
                    );
                    result.record_failure(&recipient.email, err);
                }
            }
        }

        pipeline_info!(
            "Delivery of '{}' finished: {} sent, {} failed",
            issue.subject(),
            result.sent,
            result.failed
        );
        result
    }

    async fn send_one(
        &self,
        transport: &dyn MailTransport,
        issue: &NewsletterIssue,
        recipient: &Recipient,
        books: &[Book],
    ) -> Result<String, SendError> {
        let subscriber = SubscriberRef::from(recipient);
        let data = self.assembler.assemble_with_books(
            issue.content.clone(),
            Some(&subscriber),
            books.to_vec(),
        );
        let message = self.renderer.render(&data)?;

        let email = OutgoingEmail {
            to: recipient.email.clone(),
            to_name: recipient.name.clone(),
            subject: data.content.subject.clone(),
            html: message.html,
            text: message.text,
            reply_to: self.reply_to.clone(),
            unsubscribe_url: data.unsubscribe_url,
        };
        Ok(transport.send(&email).await?)
    }
}
