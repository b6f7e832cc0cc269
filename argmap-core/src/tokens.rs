//! Raw token handling.
//!
//! Every command line token is either a bare indicator word (help/version
//! and prefixed variants) or a `key=value` pair split on the first `=`, so
//! values may themselves contain `=`. Keys are normalized to lower case.

/// Split a token into a normalized `(key, value)` pair.
///
/// Returns `None` for tokens without `=`; those are not arguments.
pub(crate) fn split_token(token: &str) -> Option<(String, String)> {
    let (key, value) = token.split_once('=')?;
    Some((key.trim().to_lowercase(), value.trim().to_string()))
}

/// Strip one layer of surrounding double quotes.
pub(crate) fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Case-insensitive, trimmed match against an indicator list.
pub(crate) fn matches_indicator(token: &str, indicators: &[String]) -> bool {
    let normalized = token.trim().to_lowercase();
    indicators.iter().any(|i| *i == normalized)
}
