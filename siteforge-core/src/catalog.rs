//! Static per-tag configuration: default style/class seed tables, tag
//! category sets and display defaults.
//!
//! These tables are loaded once and never mutated. Lookups for unrecognized
//! tag names fall back explicitly (empty styles, no class, inline-block
//! display) rather than relying on an absent entry meaning anything.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::style::{style_map, StyleMap};

/// Default display behavior for a tag, used when an element declares no
/// explicit `display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCategory {
    /// Block-level tags.
    Block,
    /// Inline tags (width/height are inert without an explicit display).
    Inline,
    /// Form, media and interactive tags.
    InlineBlock,
}

impl DisplayCategory {
    /// The CSS `display` value for this category.
    #[must_use]
    pub fn css_value(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Inline => "inline",
            Self::InlineBlock => "inline-block",
        }
    }
}

const BLOCK_TAGS: &[&str] = &[
    "div",
    "section",
    "article",
    "header",
    "footer",
    "main",
    "nav",
    "ul",
    "ol",
    "li",
    "p",
    "h1",
    "h2",
    "h3",
    "table",
    "form",
    "figure",
    "figcaption",
    "blockquote",
];

const INLINE_TAGS: &[&str] = &[
    "span", "a", "small", "strong", "em", "mark", "u", "s", "code",
];

const CONTAINER_TAGS: &[&str] = &[
    "div",
    "section",
    "article",
    "main",
    "nav",
    "header",
    "footer",
    "aside",
    "form",
    "ul",
    "ol",
    "li",
    "table",
    "thead",
    "tbody",
    "tfoot",
    "tr",
    "td",
    "th",
    "figure",
    "figcaption",
    "fieldset",
    "details",
];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const SIZED_BY_CONTENT: &[&str] = &["img", "image", "iframe", "video", "audio", "canvas", "svg"];

/// Classify a tag's default display mode. Unknown tags are inline-block.
#[must_use]
pub fn display_category(tag: &str) -> DisplayCategory {
    if BLOCK_TAGS.contains(&tag) {
        DisplayCategory::Block
    } else if INLINE_TAGS.contains(&tag) {
        DisplayCategory::Inline
    } else {
        // Form, media and interactive tags (img, input, button, textarea,
        // select, iframe, label) and anything unrecognized.
        DisplayCategory::InlineBlock
    }
}

/// Whether a tag is an inline tag (for the size-forces-inline-block rule).
#[must_use]
pub fn is_inline_tag(tag: &str) -> bool {
    INLINE_TAGS.contains(&tag)
}

/// Whether a tag is a structural container (gets `position:relative` and the
/// multi-child grid default).
#[must_use]
pub fn is_container_tag(tag: &str) -> bool {
    CONTAINER_TAGS.contains(&tag)
}

/// Whether a tag is a void tag (self-closing, no children or text).
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Whether a type sizes itself from intrinsic content (media tags). Size
/// styles on these stay on the element; everything else sizes its wrapper.
#[must_use]
pub fn is_sized_by_content(type_key: &str) -> bool {
    SIZED_BY_CONTENT.contains(&type_key)
}

static DEFAULT_STYLES: Lazy<HashMap<&'static str, StyleMap>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        "text",
        style_map(&[
            ("fontSize", "16px"),
            ("color", "#000000"),
            ("margin", "8px 0px"),
            ("textAlign", "left"),
            ("fontWeight", "normal"),
            ("lineHeight", "1.5"),
        ]),
    );
    table.insert(
        "button",
        style_map(&[
            ("backgroundColor", "#2563eb"),
            ("color", "#ffffff"),
            ("padding", "10px 16px"),
            ("margin", "8px 0px"),
            ("borderRadius", "6px"),
            ("border", "none"),
            ("cursor", "pointer"),
            ("fontSize", "14px"),
        ]),
    );
    table.insert(
        "image",
        style_map(&[
            ("width", "200px"),
            ("height", "auto"),
            ("margin", "8px 0px"),
            ("borderRadius", "0px"),
            ("objectFit", "cover"),
            ("display", "block"),
        ]),
    );
    table.insert(
        "h1",
        style_map(&[
            ("fontSize", "32px"),
            ("fontWeight", "700"),
            ("margin", "8px 0px"),
        ]),
    );
    table.insert(
        "h2",
        style_map(&[
            ("fontSize", "26px"),
            ("fontWeight", "600"),
            ("margin", "8px 0px"),
        ]),
    );
    table.insert(
        "h3",
        style_map(&[
            ("fontSize", "22px"),
            ("fontWeight", "600"),
            ("margin", "8px 0px"),
        ]),
    );
    table.insert(
        "paragraph",
        style_map(&[
            ("fontSize", "16px"),
            ("lineHeight", "1.6"),
            ("margin", "8px 0px"),
        ]),
    );
    let link_styles = style_map(&[
        ("color", "#2563eb"),
        ("textDecoration", "underline"),
        ("cursor", "pointer"),
        ("margin", "8px 0px"),
        ("display", "inline-block"),
    ]);
    table.insert("link", link_styles.clone());
    table.insert("a", link_styles);
    table.insert(
        "iframe",
        style_map(&[
            ("width", "320px"),
            ("height", "200px"),
            ("border", "1px solid #ddd"),
        ]),
    );
    table
});

static DEFAULT_CLASSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("text", "mb-3"),
        ("paragraph", "mb-3"),
        ("button", "btn btn-primary"),
        ("image", "img-fluid"),
        ("link", "link-primary text-decoration-none"),
        ("a", "link-primary text-decoration-none"),
        ("h1", "h1"),
        ("h2", "h2"),
        ("h3", "h3"),
        ("input", "form-control"),
        ("textarea", "form-control"),
        ("select", "form-select w-auto"),
        ("div", "container"),
        ("section", "container"),
        ("article", "container"),
        ("main", "container"),
        ("nav", "navbar"),
        ("ul", "list-unstyled"),
        ("ol", "list-unstyled"),
        ("table", "table"),
    ])
});

/// Seed styles for a newly created element of the given type. Types without
/// an entry start with an empty style map.
#[must_use]
pub fn default_styles(type_key: &str) -> StyleMap {
    DEFAULT_STYLES.get(type_key).cloned().unwrap_or_default()
}

/// Seed class string for a newly created element of the given type.
#[must_use]
pub fn default_class(type_key: &str) -> Option<&'static str> {
    DEFAULT_CLASSES.get(type_key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_categories() {
        assert_eq!(display_category("div"), DisplayCategory::Block);
        assert_eq!(display_category("span"), DisplayCategory::Inline);
        assert_eq!(display_category("button"), DisplayCategory::InlineBlock);
        // Unknown tags fall back to inline-block.
        assert_eq!(display_category("text"), DisplayCategory::InlineBlock);
        assert_eq!(display_category("custom-tag"), DisplayCategory::InlineBlock);
    }

    #[test]
    fn test_container_and_void_sets() {
        assert!(is_container_tag("section"));
        assert!(is_container_tag("td"));
        assert!(!is_container_tag("span"));
        assert!(is_void_tag("br"));
        assert!(is_void_tag("img"));
        assert!(!is_void_tag("div"));
    }

    #[test]
    fn test_sized_by_content() {
        assert!(is_sized_by_content("image"));
        assert!(is_sized_by_content("img"));
        assert!(is_sized_by_content("iframe"));
        assert!(!is_sized_by_content("div"));
        assert!(!is_sized_by_content("button"));
    }

    #[test]
    fn test_default_styles_known_type() {
        let styles = default_styles("button");
        assert_eq!(
            styles.get("backgroundColor").map(String::as_str),
            Some("#2563eb")
        );
        assert_eq!(styles.len(), 8);
    }

    #[test]
    fn test_default_styles_unknown_type_is_empty() {
        assert!(default_styles("pre").is_empty());
        assert!(default_styles("p").is_empty());
    }

    #[test]
    fn test_default_classes() {
        assert_eq!(default_class("button"), Some("btn btn-primary"));
        assert_eq!(default_class("link"), Some("link-primary text-decoration-none"));
        assert_eq!(default_class("pre"), None);
    }
}
