use crate::links::{unsubscribe_url, webview_url};
use crate::types::{AuthorInfo, Book, ExtractedContent, SubscriberRef, TemplateData};

/// Site-wide values merged into every copy of an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub website_url: String,
    pub author: AuthorInfo,
}

/// Merges extracted content with computed links, author metadata and books.
///
/// The extracted fields are carried over untouched.
pub fn merge(
    extracted: ExtractedContent,
    subscriber: Option<&SubscriberRef>,
    books: Vec<Book>,
    site: &SiteProfile,
) -> TemplateData {
    TemplateData {
        content: extracted,
        unsubscribe_url: unsubscribe_url(&site.website_url, subscriber),
        webview_url: webview_url(&site.website_url, subscriber),
        website_url: site.website_url.clone(),
        books,
        author: site.author.clone(),
        recipient_email: subscriber.map(|s| s.email.clone()),
    }
}
