//! Page HTML/CSS generation.
//!
//! Walks a page's element forest depth-first and emits the wrapper/inner
//! markup pair for each element, plus the page's `<style>` payload (base
//! reset, pseudo-class rules, responsive media-query rules) and the full
//! standalone document with body attributes and the sandboxed inline script.
//!
//! Attribute and style values are written verbatim - they come from the
//! builder's own state, which is the trust boundary here. Only text content
//! is escaped.

use std::collections::HashMap;
use std::fmt::Write;

use siteforge_core::catalog;
use siteforge_core::style::{to_css, to_css_important};
use siteforge_core::{AttrMap, Element, ElementId, ElementKind, Page, ViewportKey};

use crate::split::{split, split_delta};

/// Reset rules emitted at the top of every page's style tag.
const BASE_CSS: &str = "body{margin:0;padding:0;} .page-root{position:relative;min-height:100vh;padding:24px;} .page-root *{box-sizing:border-box;}";

/// A page rendered to its two embeddable fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParts {
    /// The `page-root` markup containing the whole element tree.
    pub html: String,
    /// The `<style>` tag with base, pseudo and responsive rules.
    pub style_tag: String,
}

/// Render a page's element tree into its HTML and style-tag fragments.
#[must_use]
pub fn generate_page_parts(page: &Page) -> PageParts {
    let mut by_parent: HashMap<Option<ElementId>, Vec<&Element>> = HashMap::new();
    for element in &page.elements {
        by_parent.entry(element.parent_id).or_default().push(element);
    }

    let mut css_blocks: Vec<String> = Vec::new();
    let mut responsive_blocks: Vec<String> = Vec::new();

    let html_inner = by_parent
        .get(&None)
        .map(|roots| {
            roots
                .iter()
                .map(|el| render_element(el, &by_parent, &mut css_blocks, &mut responsive_blocks))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    let style_tag = format!(
        "<style>{BASE_CSS}{}{}</style>",
        css_blocks.join(""),
        responsive_blocks.join("")
    );
    let html = format!("<div class=\"page-root\">{html_inner}</div>");

    PageParts { html, style_tag }
}

/// Render a page as a complete standalone document: styles, body wrapper,
/// element tree and the page script wrapped in a sandboxed IIFE. The script
/// tag is omitted entirely when the page has no JS at all.
#[must_use]
pub fn generate_page_html(page: &Page) -> String {
    let PageParts { html, style_tag } = generate_page_parts(page);

    let mut body_styles = page.body_styles.clone();
    let has_absolute = page
        .elements
        .iter()
        .any(|el| el.styles.get("position").is_some_and(|p| p == "absolute"));
    if has_absolute && !body_styles.contains_key("position") {
        body_styles.insert("position".to_string(), "relative".to_string());
    }

    let body_style = to_css(&body_styles);
    let body_attrs = attrs_to_string(&page.body_attrs);

    let mut body_responsive_css = String::new();
    for key in ViewportKey::breakpoints() {
        let Some(mq) = key.media_query() else {
            continue;
        };
        let Some(overrides) = page.body_responsive.get(&key) else {
            continue;
        };
        if overrides.is_empty() {
            continue;
        }
        let css = to_css_important(overrides);
        if !css.is_empty() {
            let _ = write!(body_responsive_css, "@media {mq}{{body{{{css}}}}}");
        }
    }

    let file_css = page
        .css_files
        .iter()
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let file_js = page
        .js_files
        .iter()
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut all_styles = style_tag;
    if !body_responsive_css.is_empty() {
        let _ = write!(all_styles, "<style>{body_responsive_css}</style>");
    }
    if !file_css.is_empty() {
        let _ = write!(all_styles, "<style>{file_css}</style>");
    }
    if !page.custom_css.is_empty() {
        let _ = write!(all_styles, "<style>{}</style>", page.custom_css);
    }

    let script_body = [file_js.as_str(), page.custom_js.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    let script_tag = if script_body.is_empty() {
        String::new()
    } else {
        format!(
            "<script>(function(){{const pageRoot=document.querySelector(\".page-root\");try{{\n{script_body}\n}}catch(err){{console.error(\"Custom JS error:\",err);}}}})();</script>"
        )
    };

    let mut out = String::with_capacity(all_styles.len() + html.len() + script_tag.len() + 64);
    out.push_str(&all_styles);
    out.push_str("\n<body");
    if !body_style.is_empty() || !body_attrs.is_empty() {
        out.push(' ');
    }
    out.push_str(&body_attrs);
    if !body_style.is_empty() {
        if !body_attrs.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "style=\"{body_style}\"");
    }
    out.push_str(">\n");
    out.push_str(&html);
    out.push('\n');
    out.push_str(&script_tag);
    out.push_str("</body>");
    out
}

fn render_element(
    element: &Element,
    by_parent: &HashMap<Option<ElementId>, Vec<&Element>>,
    css_blocks: &mut Vec<String>,
    responsive_blocks: &mut Vec<String>,
) -> String {
    let tag = element.kind.tag_name();
    let wrapper_class = format!("element-{}", element.id);

    let mut attrs = element.attrs.clone();
    merge_class_attr(&mut attrs);

    let mut parts = split(&element.styles, &element.kind);

    // Children render first so their CSS blocks precede this element's, in
    // depth-first order.
    let children: Vec<String> = by_parent
        .get(&Some(element.id))
        .map(|kids| {
            kids.iter()
                .map(|child| render_element(child, by_parent, css_blocks, responsive_blocks))
                .collect()
        })
        .unwrap_or_default();

    let is_container = catalog::is_container_tag(tag);
    let has_display_override = element.styles.contains_key("display");

    if is_container && children.len() > 1 && !has_display_override {
        parts
            .visual
            .entry("display".to_string())
            .or_insert_with(|| "grid".to_string());
        parts
            .visual
            .entry("gridTemplateColumns".to_string())
            .or_insert_with(|| "repeat(auto-fit, minmax(160px, 1fr))".to_string());
        parts
            .visual
            .entry("gap".to_string())
            .or_insert_with(|| "12px".to_string());
    }

    if is_container && !parts.layout.contains_key("position") {
        parts
            .layout
            .insert("position".to_string(), "relative".to_string());
    }

    let mut wrapper_styles = parts.layout;
    wrapper_styles.extend(element.animation.to_styles());

    match &element.kind {
        ElementKind::Link { href, target, .. } => {
            let link_class = attrs.get("className").map(String::as_str).unwrap_or("");
            if !parts.visual.contains_key("textDecoration") && link_class.contains("link-primary")
            {
                parts
                    .visual
                    .insert("textDecoration".to_string(), "none".to_string());
            }
            if !href.is_empty() {
                attrs.insert("href".to_string(), href.clone());
            }
            if !target.is_empty() {
                attrs.insert("target".to_string(), target.clone());
            }
        }
        ElementKind::Image { src, alt } => {
            if !src.is_empty() {
                attrs.insert("src".to_string(), src.clone());
            }
            if !alt.is_empty() {
                attrs.insert("alt".to_string(), alt.clone());
            }
        }
        ElementKind::Iframe { src, title } => {
            if !src.is_empty() {
                attrs.insert("src".to_string(), src.clone());
            }
            if !title.is_empty() {
                attrs.insert("title".to_string(), title.clone());
            }
        }
        ElementKind::Text { .. } | ElementKind::Button { .. } | ElementKind::Tag { .. } => {}
    }

    let element_style = to_css(&parts.visual);
    if !element_style.is_empty() {
        attrs.insert("style".to_string(), element_style);
    }
    let element_attrs = attrs_to_string(&attrs);

    let pseudo = &element.pseudo_styles;
    for (state, layer) in [
        ("hover", &pseudo.hover),
        ("active", &pseudo.active),
        ("focus", &pseudo.focus),
    ] {
        let css = to_css(layer);
        if !css.is_empty() {
            css_blocks.push(format!(".{wrapper_class}:{state}{{{css}}}"));
        }
    }

    for key in ViewportKey::breakpoints() {
        let Some(mq) = key.media_query() else {
            continue;
        };
        let Some(overrides) = element.responsive_styles.get(&key) else {
            continue;
        };
        if overrides.is_empty() {
            continue;
        }
        let delta = split_delta(overrides, &element.kind);
        let wrapper_css = to_css_important(&delta.layout);
        let visual_css = to_css_important(&delta.visual);
        if !wrapper_css.is_empty() {
            responsive_blocks.push(format!("@media {mq}{{.{wrapper_class}{{{wrapper_css}}}}}"));
        }
        if !visual_css.is_empty() {
            responsive_blocks.push(format!(
                "@media {mq}{{.{wrapper_class} > {tag}{{{visual_css}}}}}"
            ));
        }
    }

    let wrapper_style = to_css(&wrapper_styles);
    let wrapper_attrs = if wrapper_style.is_empty() {
        format!("class=\"{wrapper_class}\"")
    } else {
        format!("class=\"{wrapper_class}\" style=\"{wrapper_style}\"")
    };

    let element_attrs_sep = if element_attrs.is_empty() {
        String::new()
    } else {
        format!(" {element_attrs}")
    };

    if catalog::is_void_tag(tag) {
        return format!("<div {wrapper_attrs}><{tag}{element_attrs_sep} /></div>");
    }

    format!(
        "<div {wrapper_attrs}><{tag}{element_attrs_sep}>{}{}</{tag}></div>",
        escape_html(element.kind.text()),
        children.join("")
    )
}

/// Fold a legacy `class` attribute into `className`.
fn merge_class_attr(attrs: &mut AttrMap) {
    if let Some(extra) = attrs.remove("class") {
        match attrs.get_mut("className") {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&extra);
            }
            None => {
                attrs.insert("className".to_string(), extra);
            }
        }
    }
}

/// Serialize attributes as `name="value"` pairs. `className` emits as
/// `class`; empty values are skipped. Values are not escaped (trusted).
#[must_use]
pub(crate) fn attrs_to_string(attrs: &AttrMap) -> String {
    attrs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| {
            let name = if k == "className" { "class" } else { k.as_str() };
            format!("{name}=\"{v}\"")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text content for embedding in markup. Only `&`, `<` and `>` -
/// attribute values are trusted and written verbatim.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteforge_core::style::style_map;
    use siteforge_core::{Animation, PseudoStyles, StyleMap};

    fn page_with(elements: Vec<Element>) -> Page {
        let mut page = Page::new();
        page.elements = elements;
        page
    }

    fn element(type_str: &str, parent: Option<ElementId>) -> Element {
        Element::new(ElementKind::from_type(type_str), parent)
    }

    #[test]
    fn test_empty_page() {
        let parts = generate_page_parts(&Page::new());
        assert_eq!(parts.html, "<div class=\"page-root\"></div>");
        assert_eq!(parts.style_tag, format!("<style>{BASE_CSS}</style>"));
    }

    #[test]
    fn test_every_element_gets_a_wrapper_class() {
        let mut root = element("div", None);
        root.styles = StyleMap::new();
        let root_id = root.id;
        let child = element("text", Some(root_id));
        let child_id = child.id;
        let sibling = element("button", None);
        let sibling_id = sibling.id;
        let page = page_with(vec![root, child, sibling]);

        let parts = generate_page_parts(&page);
        for id in [root_id, child_id, sibling_id] {
            assert_eq!(
                parts.html.matches(&format!("class=\"element-{id}\"")).count(),
                1
            );
        }
        // The child nests inside the root's inner tag.
        let root_pos = parts.html.find(&format!("element-{root_id}")).unwrap();
        let child_pos = parts.html.find(&format!("element-{child_id}")).unwrap();
        let root_close = parts.html.find("</div></div>").unwrap();
        assert!(root_pos < child_pos && child_pos < root_close);
    }

    #[test]
    fn test_multi_child_container_defaults_to_grid() {
        let mut root = element("section", None);
        root.styles = StyleMap::new();
        let root_id = root.id;
        let page = page_with(vec![
            root,
            element("text", Some(root_id)),
            element("button", Some(root_id)),
        ]);

        let parts = generate_page_parts(&page);
        assert!(parts.html.contains("display:grid"));
        assert!(parts
            .html
            .contains("grid-template-columns:repeat(auto-fit, minmax(160px, 1fr))"));
        assert!(parts.html.contains("gap:12px"));
    }

    #[test]
    fn test_single_child_container_has_no_grid() {
        let mut root = element("section", None);
        root.styles = StyleMap::new();
        let root_id = root.id;
        let page = page_with(vec![root, element("text", Some(root_id))]);
        let parts = generate_page_parts(&page);
        assert!(!parts.html.contains("display:grid"));
    }

    #[test]
    fn test_explicit_display_suppresses_grid() {
        let mut root = element("section", None);
        root.styles = style_map(&[("display", "flex")]);
        let root_id = root.id;
        let page = page_with(vec![
            root,
            element("text", Some(root_id)),
            element("button", Some(root_id)),
        ]);
        let parts = generate_page_parts(&page);
        assert!(!parts.html.contains("display:grid"));
        assert!(parts.html.contains("display:flex"));
    }

    #[test]
    fn test_container_gets_relative_position() {
        let mut root = element("div", None);
        root.styles = StyleMap::new();
        let page = page_with(vec![root]);
        let parts = generate_page_parts(&page);
        assert!(parts.html.contains("position:relative"));
    }

    #[test]
    fn test_void_tag_self_closes() {
        let mut el = element("hr", None);
        el.styles = StyleMap::new();
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        assert!(parts.html.contains("<hr />"));
        assert!(!parts.html.contains("</hr>"));
    }

    #[test]
    fn test_image_attrs_and_tag() {
        let mut el = Element::new(
            ElementKind::Image {
                src: "/cat.png".to_string(),
                alt: "A cat".to_string(),
            },
            None,
        );
        el.styles = StyleMap::new();
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        assert!(parts.html.contains("<img"));
        assert!(parts.html.contains("src=\"/cat.png\""));
        assert!(parts.html.contains("alt=\"A cat\""));
        assert!(parts.html.contains(" />"));
    }

    #[test]
    fn test_link_primary_drops_underline() {
        let mut el = Element::new(
            ElementKind::Link {
                href: "/about".to_string(),
                target: String::new(),
                text: "About".to_string(),
            },
            None,
        );
        el.styles = StyleMap::new();
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        assert!(parts.html.contains("href=\"/about\""));
        assert!(parts.html.contains("text-decoration:none"));
    }

    #[test]
    fn test_text_content_is_escaped() {
        let mut el = Element::new(
            ElementKind::Text {
                text: "1 < 2 & 3 > 2".to_string(),
            },
            None,
        );
        el.styles = StyleMap::new();
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        assert!(parts.html.contains("1 &lt; 2 &amp; 3 &gt; 2"));
    }

    #[test]
    fn test_pseudo_rules_emitted_in_order() {
        let mut el = element("button", None);
        el.pseudo_styles = PseudoStyles {
            hover: style_map(&[("opacity", "0.8")]),
            active: style_map(&[("opacity", "0.6")]),
            focus: StyleMap::new(),
        };
        let id = el.id;
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        let hover = format!(".element-{id}:hover{{opacity:0.8}}");
        let active = format!(".element-{id}:active{{opacity:0.6}}");
        assert!(parts.style_tag.contains(&hover));
        assert!(parts.style_tag.contains(&active));
        assert!(parts.style_tag.find(&hover).unwrap() < parts.style_tag.find(&active).unwrap());
        assert!(!parts.style_tag.contains(":focus"));
    }

    #[test]
    fn test_responsive_rules_use_important() {
        let mut el = element("div", None);
        el.styles = StyleMap::new();
        el.responsive_styles
            .insert(ViewportKey::Mobile, style_map(&[("width", "100%"), ("color", "blue")]));
        let id = el.id;
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        assert!(parts.style_tag.contains(&format!(
            "@media (max-width: 576px){{.element-{id}{{width:100% !important}}}}"
        )));
        assert!(parts.style_tag.contains(&format!(
            "@media (max-width: 576px){{.element-{id} > div{{color:blue !important;width:100% !important}}}}"
        )));
    }

    #[test]
    fn test_responsive_tablet_before_mobile() {
        let mut el = element("div", None);
        el.styles = StyleMap::new();
        el.responsive_styles
            .insert(ViewportKey::Mobile, style_map(&[("color", "blue")]));
        el.responsive_styles
            .insert(ViewportKey::Tablet, style_map(&[("color", "green")]));
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        let tablet = parts.style_tag.find("(max-width: 992px)").unwrap();
        let mobile = parts.style_tag.find("(max-width: 576px)").unwrap();
        assert!(tablet < mobile);
    }

    #[test]
    fn test_animation_expands_on_wrapper() {
        let mut el = element("div", None);
        el.styles = StyleMap::new();
        el.animation = Animation {
            name: "fade-in".to_string(),
            duration: "2s".to_string(),
            ..Animation::default()
        };
        let page = page_with(vec![el]);
        let parts = generate_page_parts(&page);
        assert!(parts.html.contains("animation-name:fade-in"));
        assert!(parts.html.contains("animation-duration:2s"));
        assert!(parts.html.contains("animation-fill-mode:both"));
    }

    #[test]
    fn test_full_document_single_button_scenario() {
        let mut el = Element::new(ElementKind::from_type("button"), None);
        if let ElementKind::Button { text } = &mut el.kind {
            *text = "Button".to_string();
        }
        let id = el.id;
        let page = page_with(vec![el]);

        let doc = generate_page_html(&page);
        assert!(doc.contains("<body>\n<div class=\"page-root\">"));
        assert!(doc.contains(&format!(
            "<div class=\"element-{id}\" style=\"display:inline-block\">"
        )));
        assert!(doc.contains("<button class=\"btn btn-primary\""));
        assert!(doc.contains(">Button</button>"));
        // No JS anywhere means no script tag at all.
        assert!(!doc.contains("<script>"));
        assert!(doc.ends_with("</body>"));
    }

    #[test]
    fn test_full_document_body_attrs_and_styles() {
        let mut page = Page::new();
        page.body_styles = style_map(&[("backgroundColor", "#fff")]);
        page.body_attrs = AttrMap::from([("data-theme".to_string(), "light".to_string())]);
        let doc = generate_page_html(&page);
        assert!(doc.contains("<body data-theme=\"light\" style=\"background-color:#fff\">"));
    }

    #[test]
    fn test_absolute_child_forces_relative_body() {
        let mut el = element("text", None);
        el.styles = style_map(&[("position", "absolute"), ("left", "20px")]);
        let page = page_with(vec![el]);
        let doc = generate_page_html(&page);
        assert!(doc.contains("<body style=\"position:relative\">"));
    }

    #[test]
    fn test_custom_js_emits_sandboxed_iife() {
        let mut page = Page::new();
        page.custom_js = "pageRoot.dataset.ready = \"1\";".to_string();
        let doc = generate_page_html(&page);
        assert!(doc.contains(
            "<script>(function(){const pageRoot=document.querySelector(\".page-root\");try{"
        ));
        assert!(doc.contains("pageRoot.dataset.ready = \"1\";"));
        assert!(doc.contains("catch(err){console.error(\"Custom JS error:\",err);}})();</script>"));
    }

    #[test]
    fn test_custom_css_and_file_css_order() {
        let mut page = Page::new();
        page.custom_css = ".a{color:red}".to_string();
        let mut file = siteforge_core::NamedFile::new("theme");
        file.content = ".b{color:blue}".to_string();
        page.css_files.push(file);
        let doc = generate_page_html(&page);
        let file_pos = doc.find(".b{color:blue}").unwrap();
        let custom_pos = doc.find(".a{color:red}").unwrap();
        assert!(file_pos < custom_pos);
    }

    #[test]
    fn test_body_responsive_overrides() {
        let mut page = Page::new();
        page.body_responsive.insert(
            ViewportKey::Tablet,
            style_map(&[("padding", "8px")]),
        );
        let doc = generate_page_html(&page);
        assert!(doc.contains("@media (max-width: 992px){body{padding:8px !important}}"));
    }

    #[test]
    fn test_orphaned_elements_are_unreachable() {
        // A dangling parent id (after a shallow delete) keeps the element out
        // of the rendered tree.
        let orphan = element("text", Some(ElementId::new()));
        let orphan_id = orphan.id;
        let page = page_with(vec![orphan]);
        let parts = generate_page_parts(&page);
        assert!(!parts.html.contains(&format!("element-{orphan_id}")));
    }

    #[test]
    fn test_deterministic_output() {
        let mut root = element("div", None);
        root.styles = style_map(&[("width", "50%"), ("zIndex", "2")]);
        let root_id = root.id;
        let mut child = element("image", Some(root_id));
        child.styles = style_map(&[("width", "50%")]);
        let page = page_with(vec![root, child]);

        let first = generate_page_html(&page);
        let second = generate_page_html(&page);
        assert_eq!(first, second);
    }
}
