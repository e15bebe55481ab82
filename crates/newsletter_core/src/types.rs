use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeaturedStory {
    pub headline: String,
    /// Paragraph-wrapped HTML; never empty after normalization.
    pub content: String,
    pub author: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopStory {
    pub headline: String,
    pub excerpt: String,
    pub author: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub subject: String,
    pub preheader: String,
    pub featured_story: FeaturedStory,
    pub top_stories: Vec<TopStory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub cover_url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub bio: String,
    pub website: String,
    pub address: String,
}

/// Everything the renderers need for one copy of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateData {
    #[serde(flatten)]
    pub content: ExtractedContent,
    pub unsubscribe_url: String,
    pub webview_url: String,
    pub website_url: String,
    pub books: Vec<Book>,
    pub author: AuthorInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

/// The subscriber a copy is personalized for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberRef {
    pub email: String,
    pub id: Option<String>,
}

impl From<&Recipient> for SubscriberRef {
    fn from(recipient: &Recipient) -> Self {
        Self {
            email: recipient.email.clone(),
            id: None,
        }
    }
}
