//! Archive export orchestration.
//!
//! The container format is a collaborator concern: the engine only needs
//! "add named text entry" and "finalize to blob", expressed by
//! [`ArchiveWriter`], and a [`DownloadSink`] to hand the finished blob to
//! the user.

use std::collections::BTreeMap;

use siteforge_codegen::{build_project_files, generate_page_html, rewrite_imports};
use siteforge_core::{NamedFile, Page};

use crate::error::ExportResult;

/// Archive packaging collaborator: collects named text entries and produces
/// a downloadable binary container.
pub trait ArchiveWriter {
    /// Add one text entry under the given path.
    fn add_entry(&mut self, path: &str, content: &str);

    /// Finalize the container into a binary blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be produced.
    fn finalize(&mut self) -> ExportResult<Vec<u8>>;
}

/// Download collaborator: presents a finished blob to the user as a file
/// save.
pub trait DownloadSink {
    /// Deliver the blob under the given filename.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn deliver(&self, filename: &str, bytes: Vec<u8>) -> ExportResult<()>;
}

/// Derive an archive entry filename from a page route. The root route maps
/// to the fallback; any other route becomes `<route>.html`.
#[must_use]
pub fn sanitize_route_to_file(route: &str, fallback: &str) -> String {
    if route.is_empty() || route == "/" {
        return fallback.to_string();
    }
    let clean = route.strip_prefix('/').unwrap_or(route);
    let clean = clean.strip_suffix('/').unwrap_or(clean);
    if clean.is_empty() {
        fallback.to_string()
    } else {
        format!("{clean}.html")
    }
}

/// Export a single page as a one-file archive of its standalone document.
///
/// # Errors
///
/// Returns an error if packaging or delivery fails.
pub fn export_page_archive<W, S>(page: &Page, writer: &mut W, sink: &S) -> ExportResult<()>
where
    W: ArchiveWriter + ?Sized,
    S: DownloadSink + ?Sized,
{
    let html = generate_page_html(page);
    let file_name = sanitize_route_to_file(&page.route, "index.html");
    writer.add_entry(&file_name, &html);
    let blob = writer.finalize()?;

    let stem = file_name.strip_suffix(".html").unwrap_or(&file_name);
    sink.deliver(&format!("page-{stem}.zip"), blob)
}

/// Package an edited virtual file set, rewriting relative imports so they
/// resolve against the post-edit layout.
///
/// # Errors
///
/// Returns an error if packaging or delivery fails.
pub fn export_project_archive<W, S>(
    new_files: &BTreeMap<String, String>,
    original_files: &BTreeMap<String, String>,
    path_map: &BTreeMap<String, String>,
    filename: &str,
    writer: &mut W,
    sink: &S,
) -> ExportResult<()>
where
    W: ArchiveWriter + ?Sized,
    S: DownloadSink + ?Sized,
{
    let rewritten = rewrite_imports(original_files, new_files, path_map);
    for (path, content) in &rewritten {
        writer.add_entry(path, content);
    }
    let blob = writer.finalize()?;
    sink.deliver(filename, blob)
}

/// Assemble and package the component project for the given pages and
/// global files, unedited (identity path map).
///
/// # Errors
///
/// Returns an error if packaging or delivery fails.
pub fn export_project<W, S>(
    pages: &[Page],
    global_css_files: &[NamedFile],
    global_js_files: &[NamedFile],
    writer: &mut W,
    sink: &S,
) -> ExportResult<()>
where
    W: ArchiveWriter + ?Sized,
    S: DownloadSink + ?Sized,
{
    let files = build_project_files(pages, global_css_files, global_js_files);
    let path_map: BTreeMap<String, String> =
        files.keys().map(|k| (k.clone(), k.clone())).collect();
    export_project_archive(&files, &files, &path_map, "react-project.zip", writer, sink)
}
