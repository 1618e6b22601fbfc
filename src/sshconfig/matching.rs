//! Host pattern matching, and checks on text bound for a config file
// (c) 2024 Ross Younger

use crate::Error;

/// Does `candidate` match the wildcard `pattern`?
///
/// `*` matches any run of characters (including none) and `?` matches exactly one.
/// Everything else, including any metacharacters that happen to be in `candidate`, is literal.
/// This single predicate serves both "does this alias fall under that pattern" and
/// "does this pattern's text fall under that other pattern".
#[must_use]
pub fn pattern_matches(pattern: &str, candidate: &str) -> bool {
    !pattern.is_empty() && wildmatch::WildMatch::new(pattern).matches(candidate)
}

/// Checks that a pattern can stand as a single `Host` argument.
pub fn validate_pattern(pattern: &str) -> Result<(), Error> {
    let reason = if pattern.is_empty() {
        Some("pattern is empty")
    } else if pattern.chars().any(char::is_whitespace) {
        Some("pattern contains whitespace")
    } else if pattern.chars().any(|c| matches!(c, '"' | '\'' | '#' | '\\')) {
        Some("pattern contains a quote, comment or escape character")
    } else if pattern.chars().any(char::is_control) {
        Some("pattern contains a control character")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: reason.to_owned(),
        }),
        None => Ok(()),
    }
}

/// Keywords which would change the block structure if written as a setting
const STRUCTURAL_KEYWORDS: &[&str] = &["host", "match", "include"];

/// Checks that a setting can be written as one `key value` line.
///
/// The value is quoted on output, so only line breaks and other control characters are refused.
/// An empty value is allowed; callers decide what it means.
pub fn validate_setting(key: &str, value: &str) -> Result<(), Error> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.chars().any(|c| {
        c.is_whitespace() || c.is_control() || matches!(c, '=' | '"' | '\'' | '#' | '\\')
    }) {
        Some("key contains whitespace, `=`, a quote, comment or escape character")
    } else if STRUCTURAL_KEYWORDS.contains(&key.to_lowercase().as_str()) {
        Some("this keyword cannot be set as an option")
    } else if value.chars().any(|c| c != '\t' && c.is_control()) {
        Some("value contains a line break or control character")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::InvalidSetting {
            key: key.to_owned(),
            reason: reason.to_owned(),
        }),
        None => Ok(()),
    }
}

///////////////////////////////////////////////////////////////////////////////////////
