use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use newsletter_engine::{
    AppEnvironment, Catalog, CatalogError, ConfigError, DeliveryEngine, EmptyCatalog,
    JsonCatalog, MailConfig, NewsletterConfig, SiteConfig, DEFAULT_SITE_URL,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn site_config_requires_author_identity() {
    let err = SiteConfig::from_lookup(lookup(&[("AUTHOR_EMAIL", "ada@example.com")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("AUTHOR_NAME"));

    let err = SiteConfig::from_lookup(lookup(&[("AUTHOR_NAME", "Ada")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("AUTHOR_EMAIL"));
}

#[test]
fn site_config_defaults_and_profile() {
    let site = SiteConfig::from_lookup(lookup(&[
        ("AUTHOR_NAME", "Ada Author"),
        ("AUTHOR_EMAIL", "ada@example.com"),
        ("AUTHOR_ADDRESS", "1 Quay Street"),
    ]))
    .unwrap();

    assert_eq!(site.site_url, DEFAULT_SITE_URL);
    let profile = site.profile();
    assert_eq!(profile.website_url, DEFAULT_SITE_URL);
    assert_eq!(profile.author.name, "Ada Author");
    assert_eq!(profile.author.address, "1 Quay Street");
    assert_eq!(profile.author.bio, "");
}

#[test]
fn invalid_site_url_is_rejected() {
    let err = SiteConfig::from_lookup(lookup(&[
        ("SITE_URL", "not a url"),
        ("AUTHOR_NAME", "Ada"),
        ("AUTHOR_EMAIL", "ada@example.com"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "SITE_URL", .. }));
}

#[test]
fn mail_config_without_credentials_has_no_smtp() {
    let mail = MailConfig::from_lookup(lookup(&[("APP_ENV", "Development"), ("SMTP_HOST", "smtp.example.com")]))
        .unwrap();
    assert_eq!(mail.environment, AppEnvironment::Development);
    assert!(mail.smtp.is_none());

    let mail = MailConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(mail.environment, AppEnvironment::Production);
}

#[test]
fn mail_config_builds_from_address_and_defaults() {
    let mail = MailConfig::from_lookup(lookup(&[
        ("AUTHOR_NAME", "Ada Author"),
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_USER", "mailer@example.com"),
        ("SMTP_PASS", "secret"),
    ]))
    .unwrap();

    let smtp = mail.smtp.expect("smtp configured");
    assert_eq!(smtp.port, 587);
    assert_eq!(smtp.from, "Ada Author <mailer@example.com>");
    assert_eq!(smtp.timeout, Duration::from_secs(30));
    assert!(!format!("{smtp:?}").contains("secret"));
}

#[test]
fn malformed_numbers_are_invalid() {
    let err = MailConfig::from_lookup(lookup(&[("SMTP_PORT", "smtp")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Invalid {
            key: "SMTP_PORT",
            value: "smtp".into()
        }
    );
}

#[test]
fn delivery_delay_is_configurable() {
    let config = NewsletterConfig::from_lookup(lookup(&[
        ("AUTHOR_NAME", "Ada"),
        ("AUTHOR_EMAIL", "ada@example.com"),
        ("NEWSLETTER_DELAY_MS", "250"),
    ]))
    .unwrap();
    assert_eq!(config.delivery.delay, Duration::from_millis(250));
}

#[tokio::test]
async fn json_catalog_keeps_featured_published_books_in_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.json");
    fs::write(
        &path,
        r#"[
            {"title": "Draft", "featured": true, "published": false},
            {"title": "Harbour", "coverImage": "https://cdn.example/h.jpg", "description": "Sea.", "featured": true, "published": true},
            {"title": "Backlist", "featured": false, "published": true},
            {"title": "Lighthouse", "coverUrl": "https://cdn.example/l.jpg", "amazonUrl": "https://shop.example/l", "featured": true, "published": true},
            {"title": "Third", "featured": true, "published": true}
        ]"#,
    )
    .unwrap();

    let books = JsonCatalog::new(&path).featured_books(2).await.unwrap();

    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Harbour", "Lighthouse"]);
    assert_eq!(books[0].cover_url, "https://cdn.example/h.jpg");
    assert_eq!(books[1].amazon_url.as_deref(), Some("https://shop.example/l"));
}

#[tokio::test]
async fn missing_catalog_file_is_a_read_error() {
    let temp = TempDir::new().unwrap();
    let err = JsonCatalog::new(temp.path().join("absent.json"))
        .featured_books(2)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Read { .. }));
}

#[tokio::test]
async fn malformed_catalog_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.json");
    fs::write(&path, r#"{"title": "not an array"}"#).unwrap();

    let err = JsonCatalog::new(&path).featured_books(2).await.unwrap_err();

    assert!(matches!(err, CatalogError::Parse { path: p, .. } if p == path));
}

#[tokio::test]
async fn development_config_builds_a_simulated_engine() {
    let config = NewsletterConfig::from_lookup(lookup(&[
        ("AUTHOR_NAME", "Ada"),
        ("AUTHOR_EMAIL", "ada@example.com"),
        ("APP_ENV", "development"),
    ]))
    .unwrap();

    let engine = DeliveryEngine::from_config(&config, Arc::new(EmptyCatalog)).unwrap();

    assert!(engine.is_simulated());
}
