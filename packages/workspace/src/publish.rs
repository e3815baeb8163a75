//! Public slugs.
//!
//! A published document is reachable at `/p/<slug>`, where the slug is the
//! slugified name followed by the document seed (crc32 of the id). The slug
//! is assigned once; later publishes reuse the stored URL even if the name
//! changed.

use funnel_model::{document_seed, FunnelRecord};

pub const PUBLIC_PREFIX: &str = "/p/";

/// Lowercase ASCII alphanumerics separated by single dashes
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "page".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn public_slug(record: &FunnelRecord) -> String {
    format!("{}-{}", slugify(&record.name), document_seed(&record.id))
}

/// URL the record is (or will be) published at
pub fn published_url(record: &FunnelRecord) -> String {
    record
        .published_url
        .clone()
        .unwrap_or_else(|| format!("{}{}", PUBLIC_PREFIX, public_slug(record)))
}

/// Mark the record published. Returns `false` if it already was.
pub fn mark_published(record: &mut FunnelRecord) -> bool {
    let url = published_url(record);
    let was_published = record.is_published;
    record.published_url = Some(url);
    record.is_published = true;
    !was_published
}
