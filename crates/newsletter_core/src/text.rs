use std::fmt::Write;

use crate::clean::plain_text;
use crate::types::TemplateData;

/// Builds the plain-text alternative straight from the template data.
///
/// This is maintained separately from the HTML component template: featured
/// books only appear in the HTML version.
pub fn render_text(data: &TemplateData) -> String {
    let content = &data.content;
    let featured = &content.featured_story;
    let mut out = String::new();

    let _ = writeln!(out, "{}", content.subject);
    let _ = writeln!(out, "{}", "=".repeat(content.subject.chars().count()));
    let _ = writeln!(out, "{}", content.preheader);
    out.push('\n');

    out.push_str("FEATURED STORY\n--------------\n");
    let _ = writeln!(out, "{}", featured.headline);
    let _ = writeln!(out, "By {} on {}", featured.author, featured.date);
    out.push('\n');
    let _ = writeln!(out, "{}", plain_text(&featured.content));
    if let Some(image) = &featured.image {
        let _ = writeln!(out, "[Image: {image}]");
    }
    out.push('\n');

    if !content.top_stories.is_empty() {
        out.push_str("TOP STORIES\n-----------\n");
        for (idx, story) in content.top_stories.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", idx + 1, story.headline);
            let _ = writeln!(out, "   By {} on {}", story.author, story.date);
            let _ = writeln!(out, "   {}", story.excerpt);
            if let Some(url) = &story.url {
                let _ = writeln!(out, "   Read more: {url}");
            }
            out.push('\n');
        }
    }

    out.push_str("---\n");
    let _ = writeln!(out, "{}", data.author.name);
    let _ = writeln!(out, "{}", data.author.address);
    let _ = writeln!(out, "{}", data.website_url);
    out.push('\n');
    if let Some(email) = &data.recipient_email {
        let _ = writeln!(
            out,
            "This email was sent to {email} because you subscribed to updates from {}.",
            data.author.name
        );
    }
    let _ = writeln!(out, "Unsubscribe: {}", data.unsubscribe_url);
    let _ = writeln!(out, "View in your browser: {}", data.webview_url);
    out
}
