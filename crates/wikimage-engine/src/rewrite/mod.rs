//! Conversion of wiki-style image embeds to plain markdown images.
//!
//! `![[folder/pic.png|150]]` becomes `![](./folder/pic.png)`. Embeds that do
//! not point at an image (note transclusions such as `![[My Note]]`) are left
//! exactly as written.

use crate::models::{LinkMatch, ParsedLink, RewriteOptions, RewriteResult};
use regex::Regex;
use std::sync::OnceLock;

fn embed_regex() -> &'static Regex {
    // Lazy inner match so each embed stops at the first `]]`
    static EMBED_REGEX: OnceLock<Regex> = OnceLock::new();
    EMBED_REGEX.get_or_init(|| Regex::new(r"!\[\[(.*?)\]\]").expect("Invalid embed regex"))
}

/// Find every `![[...]]` embed in `text`, in order of appearance
pub fn find_links(text: &str) -> impl Iterator<Item = LinkMatch<'_>> {
    embed_regex().captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let inner = caps.get(1)?;
        Some(LinkMatch::new(whole.range(), inner.as_str()))
    })
}

/// Render a parsed embed as a markdown image.
///
/// Returns `None` when the embed is not an image and must stay untouched.
pub fn rewrite_link(link: &ParsedLink, options: &RewriteOptions) -> Option<String> {
    if !link.has_image_extension {
        return None;
    }

    let path = &link.path_part;
    if options.add_dot_slash_prefix && needs_dot_slash(path) {
        Some(format!("![](./{path})"))
    } else {
        Some(format!("![]({path})"))
    }
}

/// Relative paths get `./`; anything already anchored or a URL is left alone
fn needs_dot_slash(path: &str) -> bool {
    !(path.starts_with("./")
        || path.starts_with("../")
        || path.starts_with('/')
        || path.contains("://"))
}

/// Rewrite all image embeds in a whole file's text.
///
/// `replacement_count` counts every image embed converted. The output form
/// `![](...)` can never equal the `![[...]]` it replaces, so each counted
/// embed is also a textual change.
pub fn rewrite_text(text: &str, options: &RewriteOptions) -> RewriteResult {
    let mut new_text = String::with_capacity(text.len());
    let mut replacement_count = 0;
    let mut current_pos = 0;

    for link in find_links(text) {
        let Some(replacement) = rewrite_link(&link.parse(), options) else {
            continue;
        };

        new_text.push_str(&text[current_pos..link.span.start]);
        new_text.push_str(&replacement);
        current_pos = link.span.end;
        replacement_count += 1;
    }
    new_text.push_str(&text[current_pos..]);

    RewriteResult {
        original_text: text.to_string(),
        new_text,
        replacement_count,
    }
}
