//! # Siteforge Export
//!
//! Export surfaces for the Siteforge engine:
//!
//! - [`export_page_archive`] / [`export_project`] /
//!   [`export_project_archive`] package generated documents and the
//!   assembled component project through the [`ArchiveWriter`] and
//!   [`DownloadSink`] collaborator boundaries (the zip container itself is
//!   external).
//! - [`export_page_image`] renders a page to SVG or PNG: off-screen height
//!   measurement via [`OffscreenMeasurer`], a foreign-content SVG wrap, and
//!   resvg/tiny-skia rasterization at a clamped pixel density.
//!
//! The image pipeline is the only asynchronous, failure-surfacing component
//! of the engine; everything feeding it is pure and total.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod error;
pub mod image;

pub use archive::{
    export_page_archive, export_project, export_project_archive, sanitize_route_to_file,
    ArchiveWriter, DownloadSink,
};
pub use error::{ExportError, ExportResult};
pub use image::{
    build_export_fragment, export_page_image, wrap_in_svg, ImageExportOptions, ImageFormat,
    MountHandle, OffscreenMeasurer,
};

/// Export crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
