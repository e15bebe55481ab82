use std::time::Duration;

use newsletter_core::{AuthorInfo, SiteProfile};
use thiserror::Error;

use crate::delivery::DeliverySettings;

pub const DEFAULT_SITE_URL: &str = "https://www.example-author.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DELAY_MS: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("SMTP credentials are not configured (SMTP_HOST, SMTP_USER, SMTP_PASS)")]
    MissingSmtpCredentials,
    #[error("failed to set up mail transport: {0}")]
    Transport(String),
    #[error("failed to set up renderer: {0}")]
    Renderer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "development" || v == "dev" => AppEnvironment::Development,
            _ => AppEnvironment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == AppEnvironment::Development
    }
}

/// Site-wide values: where the site lives and who writes the newsletter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub site_url: String,
    pub author_name: String,
    pub author_email: String,
    pub author_bio: String,
    pub author_address: String,
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let site_url = optional(&lookup, "SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.into());
        if url::Url::parse(&site_url).is_err() {
            return Err(ConfigError::Invalid {
                key: "SITE_URL",
                value: site_url,
            });
        }
        Ok(Self {
            site_url,
            author_name: required(&lookup, "AUTHOR_NAME")?,
            author_email: required(&lookup, "AUTHOR_EMAIL")?,
            author_bio: optional(&lookup, "AUTHOR_BIO").unwrap_or_default(),
            author_address: optional(&lookup, "AUTHOR_ADDRESS").unwrap_or_default(),
        })
    }

    pub fn profile(&self) -> SiteProfile {
        SiteProfile {
            website_url: self.site_url.clone(),
            author: AuthorInfo {
                name: self.author_name.clone(),
                bio: self.author_bio.clone(),
                website: self.site_url.clone(),
                address: self.author_address.clone(),
            },
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// Full `Name <address>` mailbox.
    pub from: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("from", &self.from)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Transport settings. `smtp` is `None` when any credential is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub environment: AppEnvironment,
    pub smtp: Option<SmtpSettings>,
}

impl MailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = AppEnvironment::parse(optional(&lookup, "APP_ENV").as_deref());
        let port = parsed(&lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?;
        let timeout = Duration::from_secs(parsed(
            &lookup,
            "SMTP_TIMEOUT_SECS",
            DEFAULT_SMTP_TIMEOUT_SECS,
        )?);

        let host = optional(&lookup, "SMTP_HOST");
        let user = optional(&lookup, "SMTP_USER");
        let pass = optional(&lookup, "SMTP_PASS");
        let smtp = match (host, user, pass) {
            (Some(host), Some(user), Some(pass)) => {
                let from = optional(&lookup, "SMTP_FROM").unwrap_or_else(|| {
                    match optional(&lookup, "AUTHOR_NAME") {
                        Some(name) => format!("{name} <{user}>"),
                        None => user.clone(),
                    }
                });
                Some(SmtpSettings {
                    host,
                    port,
                    user,
                    pass,
                    from,
                    timeout,
                })
            }
            _ => None,
        };

        Ok(Self { environment, smtp })
    }
}

/// Everything the CLI needs to run the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterConfig {
    pub site: SiteConfig,
    pub mail: MailConfig,
    pub delivery: DeliverySettings,
}

impl NewsletterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let delay_ms = parsed(&lookup, "NEWSLETTER_DELAY_MS", DEFAULT_DELAY_MS)?;
        Ok(Self {
            site: SiteConfig::from_lookup(&lookup)?,
            mail: MailConfig::from_lookup(&lookup)?,
            delivery: DeliverySettings {
                delay: Duration::from_millis(delay_ms),
            },
        })
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match optional(lookup, key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
