//! Newsletter core: pure content pipeline stages and data model.
mod assemble;
mod clean;
mod classify;
mod fallback;
mod links;
mod normalize;
mod result;
mod segment;
mod shell;
mod text;
mod types;

pub use assemble::{merge, SiteProfile};
pub use clean::{escape_html, plain_text, truncate_chars};
pub use classify::{classify, parse_byline, Byline, Classified};
pub use fallback::{apply_fallbacks, WELCOME_FALLBACK};
pub use links::{unsubscribe_url, webview_url};
pub use normalize::{
    extract_preheader, extract_subject, normalize, sanitize, NormalizeOptions, DEFAULT_SUBJECT,
};
pub use result::{redact_address, DeliveryResult};
pub use segment::{segment, Section};
pub use shell::wrap_html;
pub use text::render_text;
pub use types::{
    AuthorInfo, Book, ExtractedContent, FeaturedStory, Recipient, RenderedMessage, SubscriberRef,
    TemplateData, TopStory,
};
