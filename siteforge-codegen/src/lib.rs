//! # Siteforge Codegen
//!
//! Deterministic code generation over the `siteforge-core` model:
//!
//! - [`split`] partitions a flat style map into wrapper (layout) and
//!   inner-tag (visual) declarations with type-aware defaults. The live
//!   canvas and every export path share this function, which is what keeps
//!   exported markup visually identical to the canvas.
//! - [`generate_page_parts`] / [`generate_page_html`] render a page's
//!   element forest into embeddable fragments or a standalone document.
//! - [`build_project_files`] assembles the component-project virtual file
//!   set (path -> content).
//! - [`rewrite_imports`] recomputes relative import specifiers after the
//!   file set has been reorganized.
//!
//! Everything here is synchronous, pure and total over well-formed model
//! state: generation never fails, it degrades (missing ids render nothing,
//! unresolvable imports stay as written).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod generator;
pub mod paths;
pub mod project;
pub mod rewrite;
pub mod split;

pub use generator::{escape_html, generate_page_html, generate_page_parts, PageParts};
pub use project::{build_project_files, sanitize_file_name};
pub use rewrite::rewrite_imports;
pub use split::{split, split_delta, Split};

/// Codegen crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
