use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Flattens an HTML fragment to a single line of text.
///
/// Entities are decoded, `script`/`style` are dropped and whitespace is
/// collapsed. Block-level boundaries become a single space.
pub fn plain_text(html: &str) -> String {
    flatten(html, false)
}

/// Like [`plain_text`] but also drops `<h4>`..`<h6>` together with their text.
pub(crate) fn section_text(html: &str) -> String {
    flatten(html, true)
}

fn flatten(html: &str, strip_nested_headings: bool) -> String {
    let fragment = Html::parse_fragment(html);
    let mut ctx = TextContext::new(strip_nested_headings);
    for child in fragment.root_element().children() {
        ctx.visit_node(child);
    }
    ctx.into_text()
}

struct TextContext {
    builder: String,
    last_char: Option<char>,
    strip_nested_headings: bool,
}

impl TextContext {
    fn new(strip_nested_headings: bool) -> Self {
        Self {
            builder: String::new(),
            last_char: None,
            strip_nested_headings,
        }
    }

    fn into_text(self) -> String {
        self.builder.trim().to_string()
    }

    fn visit_node(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => self.append_text(text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit_node(child);
                }
            }
        }
    }

    fn visit_element(&mut self, element: ElementRef<'_>) {
        let tag = element.value().name().to_ascii_lowercase();
        match tag.as_str() {
            "script" | "style" | "noscript" | "template" => {}
            "h4" | "h5" | "h6" if self.strip_nested_headings => self.separate(),
            "br" | "hr" => self.separate(),
            "p" | "div" | "li" | "ul" | "ol" | "table" | "tr" | "td" | "th" | "blockquote"
            | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.separate();
                self.visit_children(element);
                self.separate();
            }
            _ => self.visit_children(element),
        }
    }

    fn visit_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            self.visit_node(child);
        }
    }

    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.separate();
            } else {
                self.builder.push(ch);
                self.last_char = Some(ch);
            }
        }
    }

    fn separate(&mut self) {
        if self.builder.is_empty() || self.last_char == Some(' ') {
            return;
        }
        self.builder.push(' ');
        self.last_char = Some(' ');
    }
}

/// Minimal HTML text escaping for values placed inside markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_html, plain_text, section_text, truncate_chars};

    #[test]
    fn collapses_whitespace_and_decodes_entities() {
        let html = "<p>Fish   &amp;\n chips</p><p>for  two</p>";
        assert_eq!(plain_text(html), "Fish & chips for two");
    }

    #[test]
    fn nested_headings_are_dropped_from_sections() {
        let html = "<h4>Aside</h4><p>Body text</p>";
        assert_eq!(section_text(html), "Body text");
        assert_eq!(plain_text(html), "Aside Body text");
    }

    #[test]
    fn script_and_style_never_leak() {
        let html = "<style>p{color:red}</style><p>Visible</p><script>alert(1)</script>";
        assert_eq!(plain_text(html), "Visible");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn escaping_covers_markup_characters() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
