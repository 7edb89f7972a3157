//! Just enough of PHP's `serialize()` format to read WordPress options.
//!
//! WordPress stores role maps and plugin lists serialized, e.g.
//! `a:2:{s:6:"editor";b:1;s:6:"author";b:0;}`. Only string keys/values and
//! boolean flags are needed here.

use std::sync::LazyLock;

use regex::Regex;

static STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"s:\d+:"([^"]*)";"#).expect("valid string pattern"));

static TRUE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"s:\d+:"([^"]*)";b:1;"#).expect("valid flag pattern"));

/// Every serialized string in `value`, keys and values alike.
pub fn strings(value: &str) -> impl Iterator<Item = &str> {
    STRING_RE
        .captures_iter(value)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

/// Keys whose value is boolean `true`, as in a capabilities map.
pub fn true_keys(value: &str) -> impl Iterator<Item = &str> {
    TRUE_KEY_RE
        .captures_iter(value)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

/// Whether a serialized list or map mentions `needle` as a string.
pub fn contains_string(value: &str, needle: &str) -> bool {
    strings(value).any(|s| s == needle)
}
