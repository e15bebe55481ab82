use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::clean::{escape_html, section_text, truncate_chars};
use crate::normalize::NormalizeOptions;
use crate::segment::Section;
use crate::types::{FeaturedStory, TopStory};

const TOP_STORIES_MARKER: &str = "top stories";
const MIN_SECTION_CHARS: usize = 20;
const EXCERPT_CHARS: usize = 150;

// Recognised date shapes come first; anything else is accepted only when an
// explicit separator (`:` or a spaced dash) ends it.
static BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    const WEEKDAY: &str = r"(?:mon|tues|wednes|thurs|fri|satur|sun)day";
    const MONTH: &str = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sept?|oct|nov|dec)[a-z]*\.?";
    const DAY: &str = r"\d{1,2}(?:st|nd|rd|th)?";
    let known_date = [
        format!(r"(?:{WEEKDAY},?\s+)?{MONTH}\s+{DAY}(?:,?\s+\d{{4}})?"),
        format!(r"(?:{WEEKDAY},?\s+)?{DAY}\s+{MONTH}(?:,?\s+\d{{4}})?"),
        r"\d{4}-\d{2}-\d{2}".to_string(),
        r"\d{1,2}/\d{1,2}/\d{2,4}".to_string(),
        WEEKDAY.to_string(),
    ]
    .join("|");
    Regex::new(&format!(
        r"(?i)\bby\s+(?P<author>[^:\n]{{1,60}}?)\s+on\s+(?:(?P<date>{known_date})\b|(?P<loose>[^:\n]{{1,40}}?)\s*(?::|\s[-–—|]\s))"
    ))
    .expect("valid regex")
});

/// Sections sorted into the featured slot and the top-story list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classified {
    pub featured: Option<FeaturedStory>,
    pub top_stories: Vec<TopStory>,
}

/// A `by <author> on <date>` credit and the text left once it is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Byline {
    pub author: String,
    pub date: String,
    pub remainder: String,
}

/// Assigns sections to the featured story or the top stories.
///
/// Sections before the first heading mentioning "top stories" compete for the
/// featured slot (first qualifying one wins); that section and every later one
/// become top stories. Sections under 20 characters of text are ignored.
pub fn classify(sections: &[Section], options: &NormalizeOptions) -> Classified {
    let mut classified = Classified::default();
    let mut in_top_stories = false;

    for section in sections {
        if !in_top_stories && section.heading.to_lowercase().contains(TOP_STORIES_MARKER) {
            in_top_stories = true;
        }

        let text = section_text(&section.body_html);
        if text.chars().count() < MIN_SECTION_CHARS {
            continue;
        }
        let byline = parse_byline(&text, options);

        if in_top_stories {
            classified.top_stories.push(TopStory {
                headline: section.heading.clone(),
                excerpt: format!("{}...", truncate_chars(&byline.remainder, EXCERPT_CHARS)),
                author: byline.author,
                date: byline.date,
                url: first_attr(&section.body_html, "a[href]", "href"),
            });
        } else if classified.featured.is_none() {
            classified.featured = Some(FeaturedStory {
                headline: section.heading.clone(),
                content: format!("<p>{}</p>", escape_html(&byline.remainder)),
                author: byline.author,
                date: byline.date,
                image: first_attr(&section.body_html, "img[src]", "src"),
            });
        }
    }
    classified
}

/// Extracts the byline, defaulting to the configured author and today's date.
pub fn parse_byline(text: &str, options: &NormalizeOptions) -> Byline {
    let Some(caps) = BYLINE.captures(text) else {
        return Byline {
            author: options.default_author.clone(),
            date: options.today.clone(),
            remainder: text.to_string(),
        };
    };
    let (Some(whole), Some(author), Some(date)) =
        (caps.get(0), caps.name("author"), caps.name("date").or(caps.name("loose")))
    else {
        return Byline {
            author: options.default_author.clone(),
            date: options.today.clone(),
            remainder: text.to_string(),
        };
    };

    let before = text[..whole.start()].trim_end();
    let after = text[whole.end()..].trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, ':' | '-' | '–' | '—' | '|' | ',')
    });
    let remainder = match (before.is_empty(), after.is_empty()) {
        (true, _) => after.to_string(),
        (false, true) => before.to_string(),
        (false, false) => format!("{before} {after}"),
    };

    Byline {
        author: author.as_str().trim().to_string(),
        date: date.as_str().trim().to_string(),
        remainder,
    }
}

fn first_attr(html: &str, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let fragment = Html::parse_fragment(html);
    let value = fragment
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())?;
    Some(value.to_string())
}
