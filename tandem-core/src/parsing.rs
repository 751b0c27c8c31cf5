//! Extraction of fenced code blocks from model output

use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    // Language tag is optional; the body runs to the closing fence.
    Regex::new(r"(?s)```([a-zA-Z0-9_+-]*)\n(.*?)```").expect("code fence regex is valid")
});

/// A fenced code block lifted out of a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag as written, lowercased; empty when the fence had none
    pub language: String,
    /// Block body without the fences
    pub source: String,
}

/// Extract every fenced code block from `text`, in order of appearance.
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    CODE_FENCE
        .captures_iter(text)
        .map(|caps| CodeBlock {
            language: caps[1].to_lowercase(),
            source: caps[2].trim_end().to_string(),
        })
        .collect()
}
