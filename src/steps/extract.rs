//! Pull code and JSON out of free-form generation responses.
//!
//! These are heuristics, not parsers. A response without a block tagged
//! for the target language yields the whole response as "the code".

use regex::Regex;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_+#.\-]*)[ \t]*\r?\n(.*?)```").expect("valid fence regex")
});

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid json fence regex"));

/// Extract the code from a response.
///
/// Returns the first fenced block tagged with `language`, otherwise the
/// whole response. Blocks in other languages or without a tag are never
/// picked. The result is trimmed.
pub fn extract_code_block(response: &str, language: &str) -> String {
    FENCE
        .captures_iter(response)
        .find(|caps| caps.get(1).is_some_and(|tag| tag.as_str().eq_ignore_ascii_case(language)))
        .and_then(|caps| caps.get(2))
        .map_or(response, |body| body.as_str())
        .trim()
        .to_string()
}

/// Extract a JSON object from a response.
///
/// A ```json fenced block wins; otherwise the span from the first `{` to
/// the last `}` is returned.
pub fn extract_json_block(response: &str) -> Option<&str> {
    if let Some(body) = JSON_FENCE.captures(response).and_then(|c| c.get(1)) {
        return Some(body.as_str());
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}
