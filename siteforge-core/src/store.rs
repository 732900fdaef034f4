//! Builder state container.
//!
//! [`BuilderStore`] owns an immutable snapshot of the whole builder state.
//! Every mutation reads the current snapshot, computes a new value, and swaps
//! it in as one step; subscribers then receive the new snapshot by reference.
//! Consumers must treat a snapshot as frozen - never mutate one in place
//! between swaps.
//!
//! Mutating operations that target a missing page/element/file id leave the
//! state unchanged instead of failing. The generators downstream are total
//! over whatever state is committed here.

use std::sync::{Arc, PoisonError, RwLock};

use crate::element::{Animation, Element, ElementKind};
use crate::error::{BuilderError, BuilderResult};
use crate::id::{ElementId, FileId, PageId};
use crate::page::{patch_file, NamedFile, NamedFilePatch, Page, PagePatch};
use crate::style::{AttrMap, StyleMap};
use crate::viewport::ViewportKey;

/// The complete builder state: all pages, project-global files and the
/// current selection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BuilderState {
    /// All pages, in creation order.
    pub pages: Vec<Page>,
    /// The page currently being edited.
    pub current_page_id: Option<PageId>,
    /// Project-global CSS files.
    pub global_css_files: Vec<NamedFile>,
    /// Project-global JS files.
    pub global_js_files: Vec<NamedFile>,
    /// The selected element, if any.
    pub selected_element_id: Option<ElementId>,
}

impl BuilderState {
    /// Create a state with one empty default page selected.
    #[must_use]
    pub fn new() -> Self {
        let page = Page::new();
        let current = page.id;
        Self {
            pages: vec![page],
            current_page_id: Some(current),
            global_css_files: Vec::new(),
            global_js_files: Vec::new(),
            selected_element_id: None,
        }
    }

    /// Look up a page by id.
    #[must_use]
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// The page currently being edited.
    #[must_use]
    pub fn current_page(&self) -> Option<&Page> {
        self.current_page_id.and_then(|id| self.page(id))
    }

    fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    fn current_page_mut(&mut self) -> Option<&mut Page> {
        let id = self.current_page_id?;
        self.page_mut(id)
    }

    /// Serialize the whole state to a JSON blob. This is the interface the
    /// external session-persistence collaborator consumes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BuilderResult<String> {
        serde_json::to_string(self).map_err(BuilderError::Serialization)
    }

    /// Restore a state from a JSON blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be parsed.
    pub fn from_json(json: &str) -> BuilderResult<Self> {
        serde_json::from_str(json).map_err(BuilderError::Serialization)
    }
}

impl Default for BuilderState {
    fn default() -> Self {
        Self::new()
    }
}

type Subscriber = Box<dyn Fn(&Arc<BuilderState>) + Send + Sync>;

/// Snapshot-swapping state container for the builder.
///
/// # Example
///
/// ```
/// use siteforge_core::element::ElementKind;
/// use siteforge_core::store::BuilderStore;
///
/// let store = BuilderStore::new();
/// let id = store
///     .add_element(ElementKind::from_type("button"), None)
///     .expect("a current page exists");
/// assert!(store.snapshot().current_page().unwrap().element(id).is_some());
/// ```
#[derive(Clone, Default)]
pub struct BuilderStore {
    state: Arc<RwLock<Arc<BuilderState>>>,
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl std::fmt::Debug for BuilderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("BuilderStore")
            .field("pages", &snapshot.pages.len())
            .field("current_page_id", &snapshot.current_page_id)
            .finish()
    }
}

impl BuilderStore {
    /// Create a store with one empty default page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(Arc::new(BuilderState::new()))),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The current immutable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<BuilderState> {
        let guard = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Register a callback invoked with each new snapshot after a commit.
    pub fn subscribe(&self, f: impl Fn(&Arc<BuilderState>) + Send + Sync + 'static) {
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subs.push(Box::new(f));
    }

    /// Replace the whole state (e.g. restoring a persisted session blob).
    ///
    /// A missing or stale `current_page_id` falls back to the first page.
    pub fn set_snapshot(&self, mut state: BuilderState) {
        let current_ok = state
            .current_page_id
            .is_some_and(|id| state.page(id).is_some());
        if !current_ok {
            state.current_page_id = state.pages.first().map(|p| p.id);
        }
        state.selected_element_id = None;
        self.commit(|s| *s = state);
    }

    fn commit<F>(&self, f: F)
    where
        F: FnOnce(&mut BuilderState),
    {
        let next = {
            let mut guard = self
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut next = (**guard).clone();
            f(&mut next);
            let next = Arc::new(next);
            *guard = Arc::clone(&next);
            next
        };
        let subs = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for sub in subs.iter() {
            sub(&next);
        }
    }

    fn with_current_page(&self, f: impl FnOnce(&mut Page)) {
        self.commit(|state| {
            if let Some(page) = state.current_page_mut() {
                f(page);
            }
        });
    }

    fn with_element(&self, id: ElementId, f: impl FnOnce(&mut Element)) {
        self.with_current_page(|page| {
            if let Some(element) = page.element_mut(id) {
                f(element);
            } else {
                tracing::debug!("Element not found, state unchanged: {id}");
            }
        });
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    /// Add a page. Body styles, attributes and custom CSS/JS are copied from
    /// the first page as a copy-on-create snapshot; the element list and file
    /// lists start empty. The new page becomes current.
    pub fn add_page(&self, info: PagePatch) -> PageId {
        let mut page = Page::new();
        let id = page.id;
        self.commit(|state| {
            if let Some(first) = state.pages.first() {
                page.title = info.title.clone().unwrap_or_else(|| first.title.clone());
                page.route = info.route.clone().unwrap_or_else(|| first.route.clone());
                page.description = info
                    .description
                    .clone()
                    .unwrap_or_else(|| first.description.clone());
                page.body_styles = first.body_styles.clone();
                page.body_responsive = first.body_responsive.clone();
                page.body_attrs = first.body_attrs.clone();
                page.custom_css = first.custom_css.clone();
                page.custom_js = first.custom_js.clone();
            } else {
                info.apply(&mut page);
            }
            page.parent_id = info.parent_id.unwrap_or(None);
            state.pages.push(page);
            state.current_page_id = Some(id);
            state.selected_element_id = None;
        });
        id
    }

    /// Patch a page's metadata.
    pub fn update_page(&self, id: PageId, patch: PagePatch) {
        self.commit(|state| {
            if let Some(page) = state.page_mut(id) {
                patch.apply(page);
            }
        });
    }

    /// Switch the current page and clear the selection.
    pub fn select_page(&self, id: PageId) {
        self.commit(|state| {
            if state.page(id).is_some() {
                state.current_page_id = Some(id);
                state.selected_element_id = None;
            }
        });
    }

    // -----------------------------------------------------------------------
    // Elements (current page)
    // -----------------------------------------------------------------------

    /// Add an element to the current page, seeded from the catalog's default
    /// style/class tables. Returns `None` when no page is current.
    pub fn add_element(&self, kind: ElementKind, parent_id: Option<ElementId>) -> Option<ElementId> {
        self.snapshot().current_page_id?;
        let element = Element::new(kind, parent_id);
        let id = element.id;
        self.with_current_page(move |page| page.elements.push(element));
        Some(id)
    }

    /// Apply an arbitrary update to an element.
    pub fn update_element(&self, id: ElementId, f: impl FnOnce(&mut Element)) {
        self.with_element(id, f);
    }

    /// Merge declarations into an element's base styles.
    pub fn merge_styles(&self, id: ElementId, styles: StyleMap) {
        self.with_element(id, move |el| el.styles.extend(styles));
    }

    /// Replace an element's base styles.
    pub fn set_styles(&self, id: ElementId, styles: StyleMap) {
        self.with_element(id, move |el| el.styles = styles);
    }

    /// Merge declarations into an element's override layer for a breakpoint.
    pub fn merge_responsive_styles(&self, id: ElementId, key: ViewportKey, styles: StyleMap) {
        self.with_element(id, move |el| {
            el.responsive_styles.entry(key).or_default().extend(styles);
        });
    }

    /// Replace an element's override layer for a breakpoint.
    pub fn set_responsive_styles(&self, id: ElementId, key: ViewportKey, styles: StyleMap) {
        self.with_element(id, move |el| {
            el.responsive_styles.insert(key, styles);
        });
    }

    /// Merge declarations into one pseudo-class layer.
    pub fn merge_pseudo_styles(&self, id: ElementId, state: PseudoState, styles: StyleMap) {
        self.with_element(id, move |el| {
            state.layer_mut(&mut el.pseudo_styles).extend(styles);
        });
    }

    /// Replace one pseudo-class layer.
    pub fn set_pseudo_styles(&self, id: ElementId, state: PseudoState, styles: StyleMap) {
        self.with_element(id, move |el| {
            *state.layer_mut(&mut el.pseudo_styles) = styles;
        });
    }

    /// Merge animation settings.
    pub fn merge_animation(&self, id: ElementId, f: impl FnOnce(&mut Animation)) {
        self.with_element(id, move |el| f(&mut el.animation));
    }

    /// Replace an element's attributes.
    pub fn set_attributes(&self, id: ElementId, attrs: AttrMap) {
        self.with_element(id, move |el| el.attrs = attrs);
    }

    /// Reparent an element. Attaching an element to itself or to one of its
    /// own descendants would create a cycle and is ignored.
    pub fn set_element_parent(&self, id: ElementId, parent_id: Option<ElementId>) {
        self.with_current_page(move |page| {
            if let Some(pid) = parent_id {
                if pid == id || page.is_descendant_of(pid, id) {
                    tracing::debug!("Rejected cyclic reparent of {id} onto {pid}");
                    return;
                }
            }
            if let Some(element) = page.element_mut(id) {
                element.parent_id = parent_id;
            }
        });
    }

    /// Set whether an element follows its parent on drag.
    pub fn set_element_lock(&self, id: ElementId, locked: bool) {
        self.with_element(id, move |el| el.locked_to_parent = locked);
    }

    /// Delete an element and its direct children, then clear the selection.
    ///
    /// Deeper descendants are intentionally left in place with dangling
    /// parent ids; the generator treats them as unreachable.
    pub fn delete_element(&self, id: ElementId) {
        self.commit(|state| {
            if let Some(page) = state.current_page_mut() {
                page.elements
                    .retain(|el| el.id != id && el.parent_id != Some(id));
            }
            state.selected_element_id = None;
        });
    }

    /// Change the selection.
    pub fn select_element(&self, id: Option<ElementId>) {
        self.commit(|state| state.selected_element_id = id);
    }

    // -----------------------------------------------------------------------
    // Body and page text (current page)
    // -----------------------------------------------------------------------

    /// Merge declarations into the body styles.
    pub fn merge_body_styles(&self, styles: StyleMap) {
        self.with_current_page(move |page| page.body_styles.extend(styles));
    }

    /// Replace the body styles.
    pub fn set_body_styles(&self, styles: StyleMap) {
        self.with_current_page(move |page| page.body_styles = styles);
    }

    /// Merge declarations into the body override layer for a breakpoint.
    pub fn merge_body_responsive(&self, key: ViewportKey, styles: StyleMap) {
        self.with_current_page(move |page| {
            page.body_responsive.entry(key).or_default().extend(styles);
        });
    }

    /// Replace the body override layer for a breakpoint.
    pub fn set_body_responsive(&self, key: ViewportKey, styles: StyleMap) {
        self.with_current_page(move |page| {
            page.body_responsive.insert(key, styles);
        });
    }

    /// Replace the body attributes.
    pub fn set_body_attrs(&self, attrs: AttrMap) {
        self.with_current_page(move |page| page.body_attrs = attrs);
    }

    /// Replace the page's custom CSS text.
    pub fn set_custom_css(&self, css: impl Into<String>) {
        let css = css.into();
        self.with_current_page(move |page| page.custom_css = css);
    }

    /// Replace the page's custom JS text.
    pub fn set_custom_js(&self, js: impl Into<String>) {
        let js = js.into();
        self.with_current_page(move |page| page.custom_js = js);
    }

    // -----------------------------------------------------------------------
    // Global CSS/JS files
    // -----------------------------------------------------------------------

    /// Add an empty project-global CSS file.
    pub fn add_global_css_file(&self, name: Option<String>) -> FileId {
        let file = NamedFile::new(name.unwrap_or_else(|| "global".to_string()));
        let id = file.id;
        self.commit(move |state| state.global_css_files.push(file));
        id
    }

    /// Patch a project-global CSS file.
    pub fn update_global_css_file(&self, id: FileId, patch: NamedFilePatch) {
        self.commit(move |state| patch_file(&mut state.global_css_files, id, &patch));
    }

    /// Remove a project-global CSS file.
    pub fn delete_global_css_file(&self, id: FileId) {
        self.commit(move |state| state.global_css_files.retain(|f| f.id != id));
    }

    /// Add an empty project-global JS file.
    pub fn add_global_js_file(&self, name: Option<String>) -> FileId {
        let file = NamedFile::new(name.unwrap_or_else(|| "global".to_string()));
        let id = file.id;
        self.commit(move |state| state.global_js_files.push(file));
        id
    }

    /// Patch a project-global JS file.
    pub fn update_global_js_file(&self, id: FileId, patch: NamedFilePatch) {
        self.commit(move |state| patch_file(&mut state.global_js_files, id, &patch));
    }

    /// Remove a project-global JS file.
    pub fn delete_global_js_file(&self, id: FileId) {
        self.commit(move |state| state.global_js_files.retain(|f| f.id != id));
    }

    // -----------------------------------------------------------------------
    // Page CSS/JS files (current page)
    // -----------------------------------------------------------------------

    /// Add an empty CSS file to the current page.
    pub fn add_page_css_file(&self, name: Option<String>) -> FileId {
        let file = NamedFile::new(name.unwrap_or_else(|| "page".to_string()));
        let id = file.id;
        self.with_current_page(move |page| page.css_files.push(file));
        id
    }

    /// Patch a CSS file on the current page.
    pub fn update_page_css_file(&self, id: FileId, patch: NamedFilePatch) {
        self.with_current_page(move |page| patch_file(&mut page.css_files, id, &patch));
    }

    /// Remove a CSS file from the current page.
    pub fn delete_page_css_file(&self, id: FileId) {
        self.with_current_page(move |page| page.css_files.retain(|f| f.id != id));
    }

    /// Add an empty JS file to the current page.
    pub fn add_page_js_file(&self, name: Option<String>) -> FileId {
        let file = NamedFile::new(name.unwrap_or_else(|| "page".to_string()));
        let id = file.id;
        self.with_current_page(move |page| page.js_files.push(file));
        id
    }

    /// Patch a JS file on the current page.
    pub fn update_page_js_file(&self, id: FileId, patch: NamedFilePatch) {
        self.with_current_page(move |page| patch_file(&mut page.js_files, id, &patch));
    }

    /// Remove a JS file from the current page.
    pub fn delete_page_js_file(&self, id: FileId) {
        self.with_current_page(move |page| page.js_files.retain(|f| f.id != id));
    }
}

/// Identifier for one pseudo-class style layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoState {
    /// The `:hover` layer.
    Hover,
    /// The `:active` layer.
    Active,
    /// The `:focus` layer.
    Focus,
}

impl PseudoState {
    fn layer_mut(self, pseudo: &mut crate::element::PseudoStyles) -> &mut StyleMap {
        match self {
            Self::Hover => &mut pseudo.hover,
            Self::Active => &mut pseudo.active,
            Self::Focus => &mut pseudo.focus,
        }
    }

    /// The CSS pseudo-class name.
    #[must_use]
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Active => "active",
            Self::Focus => "focus",
        }
    }
}
