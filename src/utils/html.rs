// src/utils/html.rs

use std::sync::OnceLock;

use regex::Regex;

static ENTITY_RE: OnceLock<Regex> = OnceLock::new();

/// Decode the HTML entities that appear in the imported question bank back
/// to literal characters. Only the five entities the import produces are
/// mapped; any other `&...;` sequence is left untouched rather than guessed
/// at.
pub fn decode_entities(text: &str) -> String {
    let re = ENTITY_RE.get_or_init(|| Regex::new(r"&[#\w]+;").unwrap());
    re.replace_all(text, |caps: &regex::Captures| {
        match &caps[0] {
            "&amp;" => "&".to_string(),
            "&lt;" => "<".to_string(),
            "&gt;" => ">".to_string(),
            "&quot;" => "\"".to_string(),
            "&#39;" => "'".to_string(),
            other => other.to_string(),
        }
    })
    .into_owned()
}
