//! Slug generation for article titles

use rand::{thread_rng, Rng};

/// Length of the random suffix appended to every slug
pub const SUFFIX_LEN: usize = 6;

/// Longest base kept before the suffix; base, hyphen and suffix fit in `VARCHAR(255)`
pub const MAX_BASE_LEN: usize = 200;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Lowercase the title and collapse every run of non `[a-z0-9]` into one hyphen,
/// trimming hyphens from both ends.
///
/// Bases longer than [`MAX_BASE_LEN`] are cut at the last hyphen before the limit
/// (or hard at the limit when the first word is already too long).
pub fn base_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    truncate_base(slug)
}

fn truncate_base(mut slug: String) -> String {
    if slug.len() <= MAX_BASE_LEN {
        return slug;
    }

    // 只含 ASCII，按字节截断安全
    let mid_word = slug.as_bytes()[MAX_BASE_LEN] != b'-';
    slug.truncate(MAX_BASE_LEN);

    if mid_word {
        if let Some(pos) = slug.rfind('-') {
            slug.truncate(pos);
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// `base-xxxxxx`, or just the suffix when the title has no usable characters
pub fn generate(title: &str) -> String {
    generate_with_rng(title, &mut thread_rng())
}

pub fn generate_with_rng<R: Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    let suffix = random_suffix(rng);
    let base = base_slug(title);

    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
