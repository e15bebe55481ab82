/// Document HTML as handed over by the content source, already UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub html: String,
    pub encoding_label: String,
}

/// Why an exported document could not be turned into [`RawContent`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid document url: {0}")]
    InvalidUrl(String),
    #[error("document export answered with http status {status}")]
    HttpStatus { status: u16 },
    #[error("document export timed out")]
    Timeout,
    #[error("document export redirected more than {limit} times")]
    TooManyRedirects { limit: usize },
    #[error("document export exceeds {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error("document export is not html (content type {0})")]
    NotHtml(String),
    #[error("document export is empty")]
    EmptyDocument,
    #[error("document export could not be decoded: {0}")]
    Decode(String),
    #[error("network error: {0}")]
    Network(String),
}
