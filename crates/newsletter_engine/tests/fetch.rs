use std::time::Duration;

use newsletter_engine::{ContentFetcher, FetchError, FetchSettings, ReqwestFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new(FetchSettings::default()).unwrap()
}

#[tokio::test]
async fn exported_document_is_returned_as_html() {
    let server = serve(
        "/export",
        ResponseTemplate::new(200)
            .set_body_raw("<h1>October Dispatch</h1>", "text/html; charset=utf-8"),
    )
    .await;

    let content = fetcher()
        .fetch(&format!("{}/export", server.uri()))
        .await
        .unwrap();

    assert_eq!(content.html, "<h1>October Dispatch</h1>");
    assert_eq!(content.encoding_label, "UTF-8");
}

#[tokio::test]
async fn export_is_decoded_from_declared_charset() {
    // "Café" in windows-1252.
    let server = serve(
        "/latin",
        ResponseTemplate::new(200)
            .set_body_raw(b"<h1>Caf\xe9</h1>".to_vec(), "text/html; charset=windows-1252"),
    )
    .await;

    let content = fetcher()
        .fetch(&format!("{}/latin", server.uri()))
        .await
        .unwrap();

    assert_eq!(content.html, "<h1>Café</h1>");
    assert_eq!(content.encoding_label, "windows-1252");
}

#[tokio::test]
async fn unshared_document_reports_http_status() {
    let server = serve("/private", ResponseTemplate::new(404)).await;

    let err = fetcher()
        .fetch(&format!("{}/private", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::HttpStatus { status: 404 });
}

#[tokio::test]
async fn pdf_export_is_not_html() {
    let server = serve(
        "/pdf",
        ResponseTemplate::new(200).set_body_raw("%PDF-1.7", "application/pdf"),
    )
    .await;

    let err = fetcher()
        .fetch(&format!("{}/pdf", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::NotHtml("application/pdf".into()));
}

#[tokio::test]
async fn blank_export_is_an_empty_document() {
    let server = serve(
        "/blank",
        ResponseTemplate::new(200).set_body_raw(" \n\t ", "text/html; charset=utf-8"),
    )
    .await;

    let err = fetcher()
        .fetch(&format!("{}/blank", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::EmptyDocument);
}

#[tokio::test]
async fn oversized_export_is_rejected() {
    let server = serve(
        "/large",
        ResponseTemplate::new(200)
            .insert_header("Content-Type", "text/html")
            .set_body_string("01234567890"),
    )
    .await;
    let fetcher = ReqwestFetcher::new(FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    })
    .unwrap();

    let err = fetcher
        .fetch(&format!("{}/large", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::TooLarge { max_bytes: 10 });
}

#[tokio::test]
async fn slow_export_times_out() {
    let server = serve(
        "/slow",
        ResponseTemplate::new(200)
            .set_delay(Duration::from_millis(250))
            .set_body_raw("<p>late</p>", "text/html"),
    )
    .await;
    let fetcher = ReqwestFetcher::new(FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    })
    .unwrap();

    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Timeout);
}

#[tokio::test]
async fn invalid_url_is_reported() {
    let err = fetcher().fetch("not a url").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}
