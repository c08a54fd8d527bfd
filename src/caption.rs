//! Caption assembly under the platform character budget.
//!
//! A caption is a fixed header (sequence number + photographer credit),
//! the photo link when it fits, and up to three randomly chosen
//! hashtags. Tag selection is randomized across runs, but the length
//! bound holds unconditionally: whatever the pool or link, the result
//! never exceeds the budget.
//!
//! Lengths are counted in characters, not bytes — the camera emoji in
//! the header is one character to the platform.

use rand::Rng;

/// Hard character budget for a post's text.
pub const CAPTION_BUDGET: usize = 260;

/// Maximum number of hashtags appended to one caption.
pub const MAX_TAGS: usize = 3;

/// Build a caption for post number `sequence`.
///
/// Each selected tag is appended as `"#tag "` and only when its full
/// rendered length fits the remaining budget, so the invariant
/// `chars(caption) <= max_len` holds for any pool and any link.
pub fn build_caption(
    sequence: u64,
    photographer: &str,
    link: &str,
    pool: &[String],
    max_len: usize,
) -> String {
    let mut caption = format!("Quote Of The Day #{sequence}\n\n\u{1F4F7}: {photographer}\n");

    if char_len(&caption) + char_len(link) < max_len {
        caption.push_str(link);
        caption.push_str("\n\n");
    }

    let mut rng = rand::thread_rng();
    let mut selected: Vec<&String> = Vec::new();
    while selected.len() < MAX_TAGS {
        let remaining = max_len.saturating_sub(char_len(&caption));
        let candidates: Vec<&String> = pool
            .iter()
            .filter(|tag| !selected.contains(tag) && char_len(tag) + 2 <= remaining)
            .collect();
        if candidates.is_empty() {
            break;
        }
        let tag = candidates[rng.gen_range(0..candidates.len())];
        caption.push('#');
        caption.push_str(tag);
        caption.push(' ');
        selected.push(tag);
    }

    // An oversized photographer name can blow the header past the budget
    // before any guarded append runs; clamp rather than overshoot.
    if char_len(&caption) > max_len {
        caption = caption.chars().take(max_len).collect();
    }
    caption
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
