//! Flat style and attribute maps plus CSS text emission.
//!
//! Style keys are camelCase (`backgroundColor`, `gridTemplateColumns`) and
//! values are opaque CSS value strings. Maps are `BTreeMap` so every consumer
//! - the live canvas, the static generator, the exporter - emits declarations
//! in the same order for the same input.

use std::collections::BTreeMap;

/// Flat style map: camelCase property name to CSS value string.
pub type StyleMap = BTreeMap<String, String>;

/// Flat attribute map: attribute name to value string.
pub type AttrMap = BTreeMap<String, String>;

/// Convert a camelCase style key to its kebab-case CSS property name.
#[must_use]
pub fn to_kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Serialize a style map as `prop:value` declarations joined by `;`.
///
/// Empty values are skipped entirely rather than emitted as `prop:`.
#[must_use]
pub fn to_css(styles: &StyleMap) -> String {
    styles
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}:{v}", to_kebab_case(k)))
        .collect::<Vec<_>>()
        .join(";")
}

/// Serialize a style map with every declaration suffixed ` !important`.
///
/// Used for breakpoint override rules, which must win over the base class
/// without specificity games.
#[must_use]
pub fn to_css_important(styles: &StyleMap) -> String {
    styles
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}:{v} !important", to_kebab_case(k)))
        .collect::<Vec<_>>()
        .join(";")
}

/// Build a [`StyleMap`] from `(key, value)` string pairs.
#[must_use]
pub fn style_map(pairs: &[(&str, &str)]) -> StyleMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
