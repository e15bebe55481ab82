use std::sync::LazyLock;

use regex::Regex;

use crate::clean::plain_text;

static SECTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-3])\b[^>]*>(.*?)</h[1-3]\s*>").expect("valid regex"));

/// A run of body HTML introduced by an `<h1>`..`<h3>` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Cleaned heading text; empty for content preceding the first heading.
    pub heading: String,
    pub body_html: String,
}

/// Splits the body on heading boundaries, preserving document order.
pub fn segment(html: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut pending: Option<String> = None;
    let mut cursor = 0;

    for caps in SECTION_HEADING.captures_iter(html) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let body = &html[cursor..whole.start()];
        match pending.take() {
            Some(heading) => sections.push(Section {
                heading,
                body_html: body.to_string(),
            }),
            None if !body.trim().is_empty() => sections.push(Section {
                heading: String::new(),
                body_html: body.to_string(),
            }),
            None => {}
        }
        pending = Some(plain_text(inner.as_str()));
        cursor = whole.end();
    }

    let tail = &html[cursor..];
    match pending {
        Some(heading) => sections.push(Section {
            heading,
            body_html: tail.to_string(),
        }),
        None if !tail.trim().is_empty() => sections.push(Section {
            heading: String::new(),
            body_html: tail.to_string(),
        }),
        None => {}
    }
    sections
}
