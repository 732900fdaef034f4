//! Layout/visual style splitting.
//!
//! Every element renders as a wrapper div carrying its positioning concerns
//! and an inner tag carrying its appearance. [`split`] partitions a flat
//! style map between the two, with type-aware defaults. The live canvas and
//! the static generator must both go through this function so that exported
//! markup matches what the canvas shows.

use siteforge_core::catalog;
use siteforge_core::{ElementKind, StyleMap};

/// Keys that always belong to the wrapper.
const LAYOUT_KEYS: [&str; 7] = [
    "position", "left", "top", "right", "bottom", "display", "zIndex",
];

/// Size keys: wrapper-owned for ordinary elements, element-owned for media.
const SIZE_KEYS: [&str; 6] = [
    "width",
    "height",
    "minWidth",
    "minHeight",
    "maxWidth",
    "maxHeight",
];

/// The result of partitioning a style map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split {
    /// Declarations for the wrapper div.
    pub layout: StyleMap,
    /// Declarations for the inner tag.
    pub visual: StyleMap,
}

/// Partition a style map into wrapper (layout) and inner-tag (visual)
/// declarations for the given element kind.
///
/// Rules, in order:
/// 1. Fixed layout keys route to `layout`; size keys route to `visual` for
///    content-sized kinds (media tags own their box) and to `layout`
///    otherwise; everything else routes to `visual`.
/// 2. A missing `display` defaults by tag category (block / inline /
///    inline-block, unknown tags inline-block).
/// 3. A non-empty `zIndex` without a `position` forces
///    `position:relative` - stacking order is inert without one.
/// 4. Non-content-sized kinds mirror each wrapper size key into `visual` as
///    `100%` so the inner tag fills its sizing wrapper; inline tags that
///    were given a width or height additionally get
///    `visual.display:inline-block`, since inline boxes ignore sizes.
/// 5. Content-sized kinds migrate percentage-like widths/heights
///    (`%`/`vw`/`vh`) up to the wrapper and keep `100%` on the element:
///    relative sizes must resolve against the wrapper, not the element's
///    intrinsic box.
#[must_use]
pub fn split(styles: &StyleMap, kind: &ElementKind) -> Split {
    split_inner(styles, kind, true)
}

/// [`split`] without the default-display assignment.
///
/// Breakpoint override maps go through this variant: override rules are
/// emitted as an `!important` appendix over the base rules and must contain
/// only the properties the override actually declares.
#[must_use]
pub fn split_delta(styles: &StyleMap, kind: &ElementKind) -> Split {
    split_inner(styles, kind, false)
}

fn split_inner(styles: &StyleMap, kind: &ElementKind, assign_default_display: bool) -> Split {
    let sized_by_content = kind.is_sized_by_content();
    let tag = kind.tag_name();
    let mut layout = StyleMap::new();
    let mut visual = StyleMap::new();

    for (key, value) in styles {
        if LAYOUT_KEYS.contains(&key.as_str()) {
            layout.insert(key.clone(), value.clone());
        } else if SIZE_KEYS.contains(&key.as_str()) {
            if sized_by_content {
                visual.insert(key.clone(), value.clone());
            } else {
                layout.insert(key.clone(), value.clone());
            }
        } else {
            visual.insert(key.clone(), value.clone());
        }
    }

    if assign_default_display && !layout.contains_key("display") {
        layout.insert(
            "display".to_string(),
            catalog::display_category(tag).css_value().to_string(),
        );
    }

    if !layout.contains_key("position") && layout.get("zIndex").is_some_and(|z| !z.is_empty()) {
        layout.insert("position".to_string(), "relative".to_string());
    }

    if sized_by_content {
        for key in ["width", "height"] {
            let Some(value) = visual.get(key) else {
                continue;
            };
            if !is_percent_like(value) {
                continue;
            }
            layout.insert(key.to_string(), value.clone());
            visual.insert(key.to_string(), "100%".to_string());
            layout
                .entry("display".to_string())
                .or_insert_with(|| "block".to_string());
        }
    } else {
        let sized = layout.get("width").is_some_and(|v| !v.is_empty())
            || layout.get("height").is_some_and(|v| !v.is_empty());
        for key in SIZE_KEYS {
            if layout.get(key).is_some_and(|v| !v.is_empty()) && !visual.contains_key(key) {
                visual.insert(key.to_string(), "100%".to_string());
            }
        }
        if sized && catalog::is_inline_tag(tag) {
            visual.insert("display".to_string(), "inline-block".to_string());
        }
    }

    Split { layout, visual }
}

/// Whether a size value is relative to its container rather than absolute.
fn is_percent_like(value: &str) -> bool {
    value.contains('%') || value.contains("vw") || value.contains("vh")
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteforge_core::style::style_map;

    fn kind(type_str: &str) -> ElementKind {
        ElementKind::from_type(type_str)
    }

    #[test]
    fn test_layout_keys_route_to_layout() {
        let result = split(
            &style_map(&[("position", "absolute"), ("left", "10px"), ("color", "red")]),
            &kind("div"),
        );
        assert_eq!(
            result.layout.get("position").map(String::as_str),
            Some("absolute")
        );
        assert_eq!(result.layout.get("left").map(String::as_str), Some("10px"));
        assert_eq!(result.visual.get("color").map(String::as_str), Some("red"));
        assert!(result.visual.get("position").is_none());
    }

    #[test]
    fn test_size_on_wrapper_mirrors_full_into_visual() {
        let result = split(&style_map(&[("width", "200px")]), &kind("div"));
        assert_eq!(
            result.layout.get("width").map(String::as_str),
            Some("200px")
        );
        assert_eq!(result.visual.get("width").map(String::as_str), Some("100%"));
    }

    #[test]
    fn test_content_sized_keeps_absolute_size() {
        let result = split(&style_map(&[("width", "200px")]), &kind("image"));
        assert_eq!(
            result.visual.get("width").map(String::as_str),
            Some("200px")
        );
        assert!(result.layout.get("width").is_none());
    }

    #[test]
    fn test_content_sized_percent_migrates_to_wrapper() {
        let result = split(&style_map(&[("width", "50%")]), &kind("image"));
        assert_eq!(result.layout.get("width").map(String::as_str), Some("50%"));
        assert_eq!(result.visual.get("width").map(String::as_str), Some("100%"));
        assert_eq!(
            result.layout.get("display").map(String::as_str),
            Some("block")
        );
    }

    #[test]
    fn test_content_sized_viewport_units_migrate() {
        let result = split(&style_map(&[("height", "40vh")]), &kind("iframe"));
        assert_eq!(
            result.layout.get("height").map(String::as_str),
            Some("40vh")
        );
        assert_eq!(
            result.visual.get("height").map(String::as_str),
            Some("100%")
        );
    }

    #[test]
    fn test_default_display_by_category() {
        assert_eq!(
            split(&StyleMap::new(), &kind("div"))
                .layout
                .get("display")
                .map(String::as_str),
            Some("block")
        );
        assert_eq!(
            split(&StyleMap::new(), &kind("span"))
                .layout
                .get("display")
                .map(String::as_str),
            Some("inline")
        );
        assert_eq!(
            split(&StyleMap::new(), &kind("button"))
                .layout
                .get("display")
                .map(String::as_str),
            Some("inline-block")
        );
        // Unknown tags fall back to inline-block.
        assert_eq!(
            split(&StyleMap::new(), &kind("text"))
                .layout
                .get("display")
                .map(String::as_str),
            Some("inline-block")
        );
    }

    #[test]
    fn test_explicit_display_wins() {
        let result = split(&style_map(&[("display", "flex")]), &kind("div"));
        assert_eq!(
            result.layout.get("display").map(String::as_str),
            Some("flex")
        );
    }

    #[test]
    fn test_z_index_forces_relative_position() {
        let result = split(&style_map(&[("zIndex", "3")]), &kind("div"));
        assert_eq!(
            result.layout.get("position").map(String::as_str),
            Some("relative")
        );

        let explicit = split(
            &style_map(&[("zIndex", "3"), ("position", "fixed")]),
            &kind("div"),
        );
        assert_eq!(
            explicit.layout.get("position").map(String::as_str),
            Some("fixed")
        );

        let empty = split(&style_map(&[("zIndex", "")]), &kind("div"));
        assert!(empty.layout.get("position").is_none());
    }

    #[test]
    fn test_sized_inline_tag_forces_inline_block() {
        let result = split(&style_map(&[("width", "120px")]), &kind("span"));
        assert_eq!(
            result.visual.get("display").map(String::as_str),
            Some("inline-block")
        );
    }

    #[test]
    fn test_unsized_inline_tag_stays_inline() {
        let result = split(&style_map(&[("color", "red")]), &kind("span"));
        assert!(result.visual.get("display").is_none());
        assert_eq!(
            result.layout.get("display").map(String::as_str),
            Some("inline")
        );
    }

    #[test]
    fn test_idempotent_under_remerge() {
        let styles = style_map(&[
            ("width", "200px"),
            ("color", "red"),
            ("zIndex", "2"),
            ("padding", "4px"),
        ]);
        let first = split(&styles, &kind("div"));

        // Re-merge with layout taking precedence on shared keys (the mirrored
        // visual `100%` is derived, not authored).
        let mut merged = first.visual.clone();
        merged.extend(first.layout.clone());
        let second = split(&merged, &kind("div"));

        assert_eq!(first, second);
    }

    #[test]
    fn test_delta_skips_default_display() {
        let result = split_delta(&style_map(&[("color", "red")]), &kind("div"));
        assert!(result.layout.is_empty());
        assert_eq!(result.visual.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_delta_still_mirrors_sizes() {
        let result = split_delta(&style_map(&[("width", "80%")]), &kind("div"));
        assert_eq!(result.layout.get("width").map(String::as_str), Some("80%"));
        assert_eq!(result.visual.get("width").map(String::as_str), Some("100%"));
    }
}
