//! Entry point of the content normalizer.
//!
//! The pipeline is split into stages that can be tested on their own:
//! [`sanitize`] -> [`extract_subject`] / [`extract_preheader`] ->
//! [`segment`](crate::segment) -> [`classify`](crate::classify) ->
//! [`apply_fallbacks`](crate::apply_fallbacks).

use std::sync::LazyLock;

use regex::Regex;

use crate::clean::plain_text;
use crate::classify::classify;
use crate::fallback::apply_fallbacks;
use crate::segment::segment;
use crate::types::ExtractedContent;

pub const DEFAULT_SUBJECT: &str = "Weekly Digest";
const PREHEADER_MARKER: &str = "we have a surprise";

static STYLE_CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+(?:style|class)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});
static SPAN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?span\b[^>]*>").expect("valid regex"));
static FIRST_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").expect("valid regex"));
static H2_AT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*<h2\b[^>]*>(.*?)</h2\s*>").expect("valid regex"));

/// Inputs the normalizer cannot derive from the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Byline author used when a section carries none.
    pub default_author: String,
    /// Byline date used when a section carries none, already formatted.
    pub today: String,
}

impl NormalizeOptions {
    pub fn new(default_author: impl Into<String>, today: impl Into<String>) -> Self {
        Self {
            default_author: default_author.into(),
            today: today.into(),
        }
    }
}

/// Turns externally authored HTML into structured newsletter content.
///
/// Never fails: anything the heuristics cannot find is replaced by defaults.
pub fn normalize(raw_html: &str, options: &NormalizeOptions) -> ExtractedContent {
    let html = sanitize(raw_html);
    let subject = extract_subject(&html);
    let (preheader, body) = extract_preheader(&html);

    let sections = segment(&body);
    let classified = classify(&sections, options);
    let mut content = apply_fallbacks(classified, &body, &subject, options);

    content.subject = subject;
    content.preheader = preheader;
    content
}

/// Removes inline `style`/`class` attributes and `<span>` wrappers.
pub fn sanitize(html: &str) -> String {
    let without_attrs = STYLE_CLASS_ATTR.replace_all(html, "");
    SPAN_TAG.replace_all(&without_attrs, "").into_owned()
}

/// Text of the first `<h1>` without markdown bold markers.
pub fn extract_subject(html: &str) -> String {
    let subject = FIRST_H1
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|inner| strip_bold_markers(&plain_text(inner.as_str())))
        .unwrap_or_default();
    if subject.is_empty() {
        DEFAULT_SUBJECT.to_string()
    } else {
        subject
    }
}

/// Finds the `<h2>` that directly follows the marker `<h1>`.
///
/// Returns the preheader text and the body with that heading pair removed.
/// Without a marker the preheader is empty and the body is unchanged.
pub fn extract_preheader(html: &str) -> (String, String) {
    for caps in FIRST_H1.captures_iter(html) {
        let (Some(h1), Some(h1_text)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !plain_text(h1_text.as_str())
            .to_lowercase()
            .contains(PREHEADER_MARKER)
        {
            continue;
        }
        // Only an h2 with nothing but whitespace between it and the marker counts.
        let Some(h2) = H2_AT_START.captures(&html[h1.end()..]) else {
            continue;
        };
        let (Some(h2_whole), Some(h2_text)) = (h2.get(0), h2.get(1)) else {
            continue;
        };
        let preheader = strip_bold_markers(&plain_text(h2_text.as_str()));
        let mut body = String::with_capacity(html.len());
        body.push_str(&html[..h1.start()]);
        body.push_str(&html[h1.end() + h2_whole.end()..]);
        return (preheader, body);
    }
    (String::new(), html.to_string())
}

fn strip_bold_markers(text: &str) -> String {
    text.replace("**", "").replace("__", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{extract_preheader, extract_subject, sanitize, DEFAULT_SUBJECT};

    #[test]
    fn sanitize_drops_styling_noise() {
        let html = r#"<p class="c1" style="margin:0"><span style="font-weight:700">Bold</span> text</p>"#;
        assert_eq!(sanitize(html), "<p>Bold text</p>");
    }

    #[test]
    fn subject_strips_bold_markers() {
        assert_eq!(extract_subject("<h1>**Spring** News</h1>"), "Spring News");
    }

    #[test]
    fn subject_defaults_when_missing_or_blank() {
        assert_eq!(extract_subject("<p>no heading</p>"), DEFAULT_SUBJECT);
        assert_eq!(extract_subject("<h1>  </h1>"), DEFAULT_SUBJECT);
    }

    #[test]
    fn preheader_requires_marker_heading() {
        let (preheader, body) = extract_preheader("<h1>Hello</h1><h2>Sub</h2>");
        assert_eq!(preheader, "");
        assert_eq!(body, "<h1>Hello</h1><h2>Sub</h2>");
    }

    #[test]
    fn preheader_pair_is_removed_from_body() {
        let html = "<h1>We have a SURPRISE for you</h1>\n<h2>Cover reveal</h2><p>rest</p>";
        let (preheader, body) = extract_preheader(html);
        assert_eq!(preheader, "Cover reveal");
        assert_eq!(body, "<p>rest</p>");
    }

    #[test]
    fn preheader_h2_must_directly_follow_marker() {
        let html = "<h1>We have a surprise</h1><p>Intro paragraph here.</p><h1>Main</h1><h2>Sub</h2>";
        let (preheader, body) = extract_preheader(html);
        assert_eq!(preheader, "");
        assert_eq!(body, html);
    }

    #[test]
    fn earlier_sections_survive_preheader_removal() {
        let html = "<h1>Issue 5</h1><p>Intro text.</p><h1>We have a surprise!</h1><h2>Big News</h2><h1>Main</h1><p>Body.</p>";
        let (preheader, body) = extract_preheader(html);
        assert_eq!(preheader, "Big News");
        assert_eq!(body, "<h1>Issue 5</h1><p>Intro text.</p><h1>Main</h1><p>Body.</p>");
    }
}
