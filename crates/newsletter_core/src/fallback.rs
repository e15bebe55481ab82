use scraper::{Html, Selector};

use crate::classify::Classified;
use crate::clean::{escape_html, plain_text, truncate_chars};
use crate::normalize::NormalizeOptions;
use crate::types::{ExtractedContent, FeaturedStory, TopStory};

pub const WELCOME_FALLBACK: &str =
    "Welcome to this edition of the newsletter! Here is what has been happening lately.";
const SYNTHESIZED_STORIES: usize = 3;
const SYNTHESIZED_EXCERPT_CHARS: usize = 100;

/// Fills the featured slot and the top-story list when classification left
/// them empty. Subject and preheader are left for the caller to set.
pub fn apply_fallbacks(
    classified: Classified,
    body_html: &str,
    subject: &str,
    options: &NormalizeOptions,
) -> ExtractedContent {
    let paragraphs = paragraphs(body_html);

    let mut featured = classified.featured.unwrap_or_else(|| {
        let text = paragraphs
            .iter()
            .find(|p| !p.text.is_empty())
            .map(|p| p.text.as_str())
            .unwrap_or(WELCOME_FALLBACK);
        FeaturedStory {
            headline: subject.to_string(),
            content: format!("<p>{}</p>", escape_html(text)),
            author: options.default_author.clone(),
            date: options.today.clone(),
            image: None,
        }
    });
    if featured.headline.is_empty() {
        featured.headline = subject.to_string();
    }

    let mut top_stories = classified.top_stories;
    if top_stories.is_empty() {
        top_stories = paragraphs
            .iter()
            .filter(|p| p.plain && !p.text.is_empty())
            .take(SYNTHESIZED_STORIES)
            .enumerate()
            .map(|(idx, p)| TopStory {
                headline: format!("Update {}", idx + 1),
                excerpt: format!("{}...", truncate_chars(&p.text, SYNTHESIZED_EXCERPT_CHARS)),
                author: options.default_author.clone(),
                date: options.today.clone(),
                url: None,
            })
            .collect();
    }

    ExtractedContent {
        subject: String::new(),
        preheader: String::new(),
        featured_story: featured,
        top_stories,
    }
}

struct Paragraph {
    text: String,
    /// No attributes left after sanitizing.
    plain: bool,
}

fn paragraphs(html: &str) -> Vec<Paragraph> {
    let Ok(selector) = Selector::parse("p") else {
        return Vec::new();
    };
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&selector)
        .map(|p| Paragraph {
            text: plain_text(&p.inner_html()),
            plain: p.value().attrs().next().is_none(),
        })
        .collect()
}
