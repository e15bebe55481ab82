use sha2::{Digest, Sha256};

const MAX_SLUG_CHARS: usize = 60;

/// Deterministic file stem for a preview: `{subject-slug}--{short_hash(body)}`.
///
/// The hash keeps two previews of the same subject with different bodies apart.
pub fn preview_stem(subject: &str, body: &str) -> String {
    format!("{}--{}", slugify(subject), short_hash(body))
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if slug.len() >= MAX_SLUG_CHARS {
            break;
        }
    }
    if slug.is_empty() {
        slug.push_str("newsletter");
    }
    slug
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
