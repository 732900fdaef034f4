//! Pages and their attached CSS/JS file units.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::id::{ElementId, FileId, PageId};
use crate::style::{AttrMap, StyleMap};
use crate::viewport::ViewportKey;

/// A named CSS or JS unit attached to a page or to the project. Files are
/// insertion-ordered and concatenated in that order at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFile {
    /// Unique identifier.
    pub id: FileId,
    /// Display name, sanitized into a filename at export time.
    pub name: String,
    /// Raw text content.
    pub content: String,
}

impl NamedFile {
    /// Create an empty file with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FileId::new(),
            name: name.into(),
            content: String::new(),
        }
    }
}

/// A partial update to a [`NamedFile`].
#[derive(Debug, Clone, Default)]
pub struct NamedFilePatch {
    /// New display name, if changing.
    pub name: Option<String>,
    /// New content, if changing.
    pub content: Option<String>,
}

impl NamedFilePatch {
    fn apply(&self, file: &mut NamedFile) {
        if let Some(name) = &self.name {
            file.name = name.clone();
        }
        if let Some(content) = &self.content {
            file.content = content.clone();
        }
    }
}

/// Apply a patch to the file with the given id. Missing ids are a no-op.
pub(crate) fn patch_file(files: &mut [NamedFile], id: FileId, patch: &NamedFilePatch) {
    if let Some(file) = files.iter_mut().find(|f| f.id == id) {
        patch.apply(file);
    }
}

/// A page: element forest plus body styling and page-scoped CSS/JS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier.
    pub id: PageId,
    /// Page title.
    pub title: String,
    /// `/`-rooted route path. Uniqueness is not enforced here.
    pub route: String,
    /// Optional parent page (for navigation hierarchies).
    pub parent_id: Option<PageId>,
    /// Free-text description.
    pub description: String,
    /// The element forest; roots have `parent_id == None`.
    pub elements: Vec<Element>,
    /// Base styles applied to the document body.
    pub body_styles: StyleMap,
    /// Per-breakpoint body style overrides.
    #[serde(default)]
    pub body_responsive: BTreeMap<ViewportKey, StyleMap>,
    /// Attributes applied to the body tag.
    #[serde(default)]
    pub body_attrs: AttrMap,
    /// Free-form page CSS, emitted after file CSS.
    pub custom_css: String,
    /// Free-form page script, executed in the sandboxed page scope.
    pub custom_js: String,
    /// Page-scoped CSS files, concatenated in insertion order.
    pub css_files: Vec<NamedFile>,
    /// Page-scoped JS files, concatenated in insertion order.
    pub js_files: Vec<NamedFile>,
}

impl Page {
    /// Create an empty page titled "Home" routed at "/".
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: PageId::new(),
            title: "Home".to_string(),
            route: "/".to_string(),
            parent_id: None,
            description: String::new(),
            elements: Vec::new(),
            body_styles: StyleMap::new(),
            body_responsive: BTreeMap::new(),
            body_attrs: AttrMap::new(),
            custom_css: String::new(),
            custom_js: String::new(),
            css_files: Vec::new(),
            js_files: Vec::new(),
        }
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Mutable element lookup.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Whether `ancestor_id` appears in `id`'s parent chain. Used to guard
    /// reparent operations against cycles; tolerates dangling parent ids.
    #[must_use]
    pub fn is_descendant_of(&self, id: ElementId, ancestor_id: ElementId) -> bool {
        let mut current = self.element(id);
        let mut hops = 0usize;
        while let Some(el) = current {
            match el.parent_id {
                Some(pid) if pid == ancestor_id => return true,
                Some(pid) => current = self.element(pid),
                None => return false,
            }
            // A stale snapshot could in principle contain a cycle; bail out
            // rather than spin.
            hops += 1;
            if hops > self.elements.len() {
                return false;
            }
        }
        false
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial update to a page's metadata.
#[derive(Debug, Clone, Default)]
pub struct PagePatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New route, if changing.
    pub route: Option<String>,
    /// New parent page, if changing (outer `Option` = "change or not").
    pub parent_id: Option<Option<PageId>>,
    /// New description, if changing.
    pub description: Option<String>,
}

impl PagePatch {
    /// Apply this patch to a page.
    pub fn apply(&self, page: &mut Page) {
        if let Some(title) = &self.title {
            page.title = title.clone();
        }
        if let Some(route) = &self.route {
            page.route = route.clone();
        }
        if let Some(parent_id) = self.parent_id {
            page.parent_id = parent_id;
        }
        if let Some(description) = &self.description {
            page.description = description.clone();
        }
    }
}
