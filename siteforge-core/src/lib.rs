//! # Siteforge Core
//!
//! Data model for the Siteforge page builder: pages, element trees, style
//! maps, the viewport/breakpoint registry, per-type default tables and the
//! snapshot-swapping builder state store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              siteforge-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Element Tree    │  Catalog                 │
//! │  - Pages         │  - Default styles        │
//! │  - Elements      │  - Default classes       │
//! │  - Style maps    │  - Tag categories        │
//! ├─────────────────────────────────────────────┤
//! │  Builder Store   │  Viewports               │
//! │  - Snapshots     │  - Breakpoint registry   │
//! │  - Transitions   │  - Media conditions      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Generation over this model lives in `siteforge-codegen`; the image/zip
//! export surfaces live in `siteforge-export`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod element;
pub mod error;
pub mod id;
pub mod page;
pub mod store;
pub mod style;
pub mod viewport;

pub use element::{Animation, Element, ElementKind, PseudoStyles};
pub use error::{BuilderError, BuilderResult};
pub use id::{ElementId, FileId, PageId};
pub use page::{NamedFile, NamedFilePatch, Page, PagePatch};
pub use store::{BuilderState, BuilderStore, PseudoState};
pub use style::{AttrMap, StyleMap};
pub use viewport::{Viewport, ViewportKey, VIEWPORTS};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
