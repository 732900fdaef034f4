//! Page elements - the building blocks of the element tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::id::ElementId;
use crate::style::{AttrMap, StyleMap};
use crate::viewport::ViewportKey;

/// The content kind of an element.
///
/// The semantically special kinds (text, button, image, link, iframe) carry
/// their own props; every other tag renders generically through [`Tag`].
///
/// [`Tag`]: ElementKind::Tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text block.
    Text {
        /// Text content.
        text: String,
    },

    /// A clickable button.
    Button {
        /// Button label.
        text: String,
    },

    /// An image.
    Image {
        /// Image source URL.
        src: String,
        /// Alt text.
        alt: String,
    },

    /// A hyperlink.
    Link {
        /// Link destination.
        href: String,
        /// Link target ("_blank", "_self", ...).
        target: String,
        /// Link text.
        text: String,
    },

    /// An embedded frame.
    Iframe {
        /// Frame source URL.
        src: String,
        /// Frame title.
        title: String,
    },

    /// Any other HTML tag, rendered generically.
    Tag {
        /// The tag name ("div", "h1", "input", ...).
        name: String,
        /// Optional text content for non-void tags.
        #[serde(default)]
        text: String,
    },
}

impl ElementKind {
    /// Map an insertable type string onto a kind, the single entry point for
    /// toolbox-driven creation. Unrecognized strings become generic tags.
    #[must_use]
    pub fn from_type(type_str: &str) -> Self {
        match type_str {
            "text" => Self::Text {
                text: String::new(),
            },
            "button" => Self::Button {
                text: String::new(),
            },
            "image" => Self::Image {
                src: String::new(),
                alt: String::new(),
            },
            "link" | "a" => Self::Link {
                href: String::new(),
                target: String::new(),
                text: String::new(),
            },
            "iframe" => Self::Iframe {
                src: String::new(),
                title: String::new(),
            },
            other => Self::Tag {
                name: other.to_string(),
                text: String::new(),
            },
        }
    }

    /// The original type string, used for catalog lookups and style-split
    /// classification.
    #[must_use]
    pub fn type_key(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Button { .. } => "button",
            Self::Image { .. } => "image",
            Self::Link { .. } => "link",
            Self::Iframe { .. } => "iframe",
            Self::Tag { name, .. } => {
                if name.is_empty() {
                    "div"
                } else {
                    name
                }
            }
        }
    }

    /// The HTML tag emitted for this kind. Only image and link are remapped;
    /// every other type string is already its tag.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        match self {
            Self::Image { .. } => "img",
            Self::Link { .. } => "a",
            _ => self.type_key(),
        }
    }

    /// Text content rendered inside the tag (empty for void tags and media).
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } | Self::Button { text } => text,
            Self::Link { text, .. } => text,
            Self::Tag { text, .. } => text,
            Self::Image { .. } | Self::Iframe { .. } => "",
        }
    }

    /// Whether this kind renders an intrinsically-sized box that must own its
    /// width/height (media tags).
    #[must_use]
    pub fn is_sized_by_content(&self) -> bool {
        catalog::is_sized_by_content(self.type_key())
    }
}

/// Pseudo-class style layers for a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoStyles {
    /// Declarations applied on `:hover`.
    #[serde(default)]
    pub hover: StyleMap,
    /// Declarations applied on `:active`.
    #[serde(default)]
    pub active: StyleMap,
    /// Declarations applied on `:focus`.
    #[serde(default)]
    pub focus: StyleMap,
}

/// CSS animation settings for an element's wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Keyframes name; `"none"` disables the animation entirely.
    pub name: String,
    /// `animation-duration` value.
    pub duration: String,
    /// `animation-timing-function` value.
    pub timing: String,
    /// `animation-delay` value.
    pub delay: String,
    /// `animation-iteration-count` value.
    pub iteration: String,
    /// `animation-direction` value.
    pub direction: String,
    /// `animation-fill-mode` value.
    pub fill_mode: String,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            name: "none".to_string(),
            duration: "1s".to_string(),
            timing: "ease".to_string(),
            delay: "0s".to_string(),
            iteration: "1".to_string(),
            direction: "normal".to_string(),
            fill_mode: "both".to_string(),
        }
    }
}

impl Animation {
    /// Whether any `animation-*` declarations should be emitted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.name.is_empty() && self.name != "none"
    }

    /// Expand into the `animation-*` style declarations for the wrapper.
    ///
    /// Returns an empty map when the animation is `"none"`.
    #[must_use]
    pub fn to_styles(&self) -> StyleMap {
        if !self.is_active() {
            return StyleMap::new();
        }
        let mut styles = StyleMap::new();
        styles.insert("animationName".to_string(), self.name.clone());
        styles.insert("animationDuration".to_string(), self.duration.clone());
        styles.insert("animationTimingFunction".to_string(), self.timing.clone());
        styles.insert("animationDelay".to_string(), self.delay.clone());
        styles.insert(
            "animationIterationCount".to_string(),
            self.iteration.clone(),
        );
        styles.insert("animationDirection".to_string(), self.direction.clone());
        styles.insert("animationFillMode".to_string(), self.fill_mode.clone());
        styles
    }
}

/// An element in a page's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Content kind and its props.
    pub kind: ElementKind,
    /// Parent element, or `None` for a page root.
    pub parent_id: Option<ElementId>,
    /// Whether the element follows its parent when the parent is dragged.
    pub locked_to_parent: bool,
    /// Base styles (camelCase keys). These ARE the base layer; there is no
    /// "base" entry in `responsive_styles`.
    pub styles: StyleMap,
    /// HTML attributes (`className` is the class attribute).
    pub attrs: AttrMap,
    /// Per-breakpoint style overrides.
    #[serde(default)]
    pub responsive_styles: BTreeMap<ViewportKey, StyleMap>,
    /// Pseudo-class style layers.
    #[serde(default)]
    pub pseudo_styles: PseudoStyles,
    /// Wrapper animation settings.
    #[serde(default)]
    pub animation: Animation,
}

impl Element {
    /// Create a new element, seeding styles and class from the catalog's
    /// per-type default tables.
    #[must_use]
    pub fn new(kind: ElementKind, parent_id: Option<ElementId>) -> Self {
        let type_key = kind.type_key();
        let styles = catalog::default_styles(type_key);
        let mut attrs = AttrMap::new();
        if let Some(class) = catalog::default_class(type_key) {
            attrs.insert("className".to_string(), class.to_string());
        }
        Self {
            id: ElementId::new(),
            kind,
            parent_id,
            locked_to_parent: parent_id.is_some(),
            styles,
            attrs,
            responsive_styles: BTreeMap::new(),
            pseudo_styles: PseudoStyles::default(),
            animation: Animation::default(),
        }
    }

    /// Replace the base styles.
    #[must_use]
    pub fn with_styles(mut self, styles: StyleMap) -> Self {
        self.styles = styles;
        self
    }

    /// Replace the attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: AttrMap) -> Self {
        self.attrs = attrs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::style_map;

    #[test]
    fn test_from_type_special_kinds() {
        assert!(matches!(
            ElementKind::from_type("text"),
            ElementKind::Text { .. }
        ));
        assert!(matches!(
            ElementKind::from_type("link"),
            ElementKind::Link { .. }
        ));
        assert!(matches!(
            ElementKind::from_type("a"),
            ElementKind::Link { .. }
        ));
        assert!(matches!(
            ElementKind::from_type("h1"),
            ElementKind::Tag { .. }
        ));
    }

    #[test]
    fn test_tag_name_normalization() {
        assert_eq!(ElementKind::from_type("image").tag_name(), "img");
        assert_eq!(ElementKind::from_type("link").tag_name(), "a");
        assert_eq!(ElementKind::from_type("text").tag_name(), "text");
        assert_eq!(ElementKind::from_type("section").tag_name(), "section");
        assert_eq!(
            ElementKind::Tag {
                name: String::new(),
                text: String::new(),
            }
            .tag_name(),
            "div"
        );
    }

    #[test]
    fn test_new_element_seeds_defaults() {
        let button = Element::new(ElementKind::from_type("button"), None);
        assert_eq!(
            button.attrs.get("className").map(String::as_str),
            Some("btn btn-primary")
        );
        assert_eq!(
            button.styles.get("backgroundColor").map(String::as_str),
            Some("#2563eb")
        );
        assert!(!button.locked_to_parent);
    }

    #[test]
    fn test_child_element_locks_to_parent() {
        let parent = Element::new(ElementKind::from_type("div"), None);
        let child = Element::new(ElementKind::from_type("text"), Some(parent.id));
        assert!(child.locked_to_parent);
        assert_eq!(child.parent_id, Some(parent.id));
    }

    #[test]
    fn test_unknown_type_has_no_defaults() {
        let el = Element::new(ElementKind::from_type("pre"), None);
        assert!(el.styles.is_empty());
        assert!(el.attrs.is_empty());
    }

    #[test]
    fn test_animation_none_emits_nothing() {
        let anim = Animation::default();
        assert!(!anim.is_active());
        assert!(anim.to_styles().is_empty());
    }

    #[test]
    fn test_animation_expansion() {
        let anim = Animation {
            name: "fade-in".to_string(),
            ..Animation::default()
        };
        let styles = anim.to_styles();
        assert_eq!(
            styles.get("animationName").map(String::as_str),
            Some("fade-in")
        );
        assert_eq!(styles.len(), 7);
    }

    #[test]
    fn test_element_with_styles_builder() {
        let el = Element::new(ElementKind::from_type("div"), None)
            .with_styles(style_map(&[("width", "200px")]));
        assert_eq!(el.styles.get("width").map(String::as_str), Some("200px"));
    }
}
