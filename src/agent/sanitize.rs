//! Reply post-processing.
//!
//! The model is told not to emit links, but search-backed models still leak
//! them. Filters run on the single-call reply only; streamed text is relayed
//! untouched.

use regex::Regex;
use std::sync::LazyLock;

/// Pluggable text transform applied to single-call replies.
pub trait ReplyFilter: Send + Sync {
    fn apply(&self, text: &str) -> String;
}

/// `[visible text](http://...)` (capture 1 is kept). The URL may hold one
/// level of balanced parentheses, as Wikipedia links do.
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[([^\]]*)\]\(\s*(?:https?://|www\.)(?:[^()\s]|\([^()\s]*\))*\s*\)")
        .expect("valid regex")
});

/// `(espn.com)`, `(www.bbc.co.uk/sport)`, `(https://x.test)` plus the space before it.
/// Without a scheme or `www.` the name must end in a known top-level domain,
/// so `(avg.goals)` is left alone.
static PAREN_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[ \t]*\(\s*(?:https?://(?:[^()\s]|\([^()\s]*\))*|www\.[^()\s]+|[a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:com|org|net|io|co|uk|us|tv|info|edu|gov|de|fr|es|it|nl|pt|br|au|ca|ie|news|sport)(?:/[^()\s]*)?)\s*\)",
    )
    .expect("valid regex")
});

/// Bare URLs plus the space before them; trailing sentence punctuation stays.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)[ \t]*(?:https?://|www\.)[^\s]*[^\s.,;:!?)\]'"]"#).expect("valid regex")
});

static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));

static TRAILING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("valid regex"));

/// Removes links and URLs, keeping the visible text of markdown links, then
/// collapses the whitespace the removals leave behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkStripper;

impl ReplyFilter for LinkStripper {
    fn apply(&self, text: &str) -> String {
        let text = MARKDOWN_LINK.replace_all(text, "$1");
        let text = PAREN_DOMAIN.replace_all(&text, "");
        let text = BARE_URL.replace_all(&text, "");
        let text = SPACE_RUN.replace_all(&text, " ");
        let text = TRAILING_SPACE.replace_all(&text, "\n");
        text.trim().to_string()
    }
}
