//! Page image export.
//!
//! Builds the same markup/CSS as the page generator, scoped so that rules
//! targeting `body` hit an export-specific wrapper class instead, measures
//! the fragment's natural height through an off-screen host, wraps it in a
//! fixed-size SVG container with an embedded foreign-content region, and
//! either serializes that container (SVG) or rasterizes it to a PNG at the
//! requested pixel density.
//!
//! This is the one asynchronous surface of the engine. There is no internal
//! timeout - a host that never resolves a measurement will hang the caller,
//! which should impose its own bound. Concurrent exports are expected to be
//! suppressed by the caller's in-flight flag rather than queued here.

use std::fmt::Write;

use async_trait::async_trait;

use siteforge_codegen::generate_page_parts;
use siteforge_core::style::{to_css, to_css_important};
use siteforge_core::{Page, ViewportKey};

use crate::archive::{sanitize_route_to_file, DownloadSink};
use crate::error::{ExportError, ExportResult};

/// Image output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Rasterized bitmap.
    Png,
    /// The vector container itself.
    Svg,
}

impl ImageFormat {
    /// The output file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Configuration for a page image export.
#[derive(Debug, Clone)]
pub struct ImageExportOptions {
    /// Output format.
    pub format: ImageFormat,
    /// Render width in CSS pixels; the height is measured.
    pub width: u32,
    /// Raster density multiplier, clamped to `[1, 4]` for PNG output.
    pub pixel_ratio: f32,
    /// Concatenated project-global CSS text.
    pub global_css_text: String,
}

impl Default for ImageExportOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            width: 1200,
            pixel_ratio: 2.0,
            global_css_text: String::new(),
        }
    }
}

/// Opaque handle to a mounted off-screen fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountHandle(u64);

impl MountHandle {
    /// Wrap a host-assigned mount id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The host-assigned mount id.
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Off-screen measurement collaborator.
///
/// The host mounts the markup into a non-interactive container sized to the
/// requested width, reports its natural rendered height, and tears the
/// container down again. The pipeline guarantees [`unmount`] runs whether or
/// not [`measure`] succeeds.
///
/// [`measure`]: OffscreenMeasurer::measure
/// [`unmount`]: OffscreenMeasurer::unmount
#[async_trait]
pub trait OffscreenMeasurer: Send + Sync {
    /// Attach the markup off-screen at the given width.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be mounted.
    async fn mount(&self, markup: &str, width: u32) -> ExportResult<MountHandle>;

    /// Read the natural rendered height of a mounted fragment, in CSS
    /// pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if layout metrics are unavailable.
    async fn measure(&self, handle: MountHandle) -> ExportResult<f32>;

    /// Detach a mounted fragment. Must not fail; called unconditionally.
    async fn unmount(&self, handle: MountHandle);
}

/// Export a page as an image and deliver it through the download sink.
///
/// # Errors
///
/// Returns an error when measurement, rasterization, encoding or delivery
/// fails. Generation itself cannot fail.
pub async fn export_page_image<M, S>(
    page: &Page,
    options: &ImageExportOptions,
    measurer: &M,
    sink: &S,
) -> ExportResult<()>
where
    M: OffscreenMeasurer + ?Sized,
    S: DownloadSink + ?Sized,
{
    let fragment = build_export_fragment(page, &options.global_css_text);
    let height = measured_height(measurer, &fragment, options.width).await?;
    tracing::debug!(
        "Measured page '{}' at {}x{height}",
        page.title,
        options.width
    );
    let svg = wrap_in_svg(&fragment, options.width, css_px(height));

    let file_name = sanitize_route_to_file(&page.route, "index.html");
    let stem = file_name.strip_suffix(".html").unwrap_or(&file_name);
    let filename = format!("page-{stem}.{}", options.format.extension());

    match options.format {
        ImageFormat::Svg => sink.deliver(&filename, svg.into_bytes()),
        ImageFormat::Png => {
            let ratio = options.pixel_ratio.clamp(1.0, 4.0);
            let png = rasterize_to_png(&svg, ratio)?;
            sink.deliver(&filename, png)
        }
    }
}

/// Build the export markup fragment: the page's element tree inside an
/// `export-root` wrapper carrying the body's inline styles, with all page
/// CSS scoped to that wrapper.
#[must_use]
pub fn build_export_fragment(page: &Page, global_css_text: &str) -> String {
    let parts = generate_page_parts(page);
    let base_css = strip_style_tag(&parts.style_tag);

    let file_css = page
        .css_files
        .iter()
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut css = String::with_capacity(
        base_css.len() + global_css_text.len() + file_css.len() + page.custom_css.len() + 64,
    );
    css.push_str(base_css);
    if !global_css_text.is_empty() {
        css.push('\n');
        css.push_str(global_css_text);
    }
    if !file_css.is_empty() {
        css.push('\n');
        css.push_str(&file_css);
    }
    if !page.custom_css.is_empty() {
        css.push('\n');
        css.push_str(&page.custom_css);
    }

    // Rules written against the document body apply to the wrapper instead.
    let mut scoped_css = css.replace("body{", ".export-root{");

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
        let rules = to_css_important(overrides);
        if !rules.is_empty() {
            let _ = write!(scoped_css, "@media {mq}{{.export-root{{{rules}}}}}");
        }
    }

    let body_style = to_css(&page.body_styles);
    let style_attr = if body_style.is_empty() {
        String::new()
    } else {
        format!(" style=\"{body_style}\"")
    };

    format!(
        "<div xmlns=\"http://www.w3.org/1999/xhtml\" class=\"export-root\"{style_attr}><style>{scoped_css}</style>{}</div>",
        parts.html
    )
}

/// Wrap a markup fragment in a fixed-size SVG container with an embedded
/// foreign-content region.
#[must_use]
pub fn wrap_in_svg(fragment: &str, width: u32, height: u32) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\"><foreignObject width=\"100%\" height=\"100%\">{fragment}</foreignObject></svg>"
    )
}

/// Mount, measure, unmount - the unmount runs even when measurement fails.
async fn measured_height<M>(measurer: &M, markup: &str, width: u32) -> ExportResult<f32>
where
    M: OffscreenMeasurer + ?Sized,
{
    let handle = measurer.mount(markup, width).await?;
    let result = measurer.measure(handle).await;
    measurer.unmount(handle).await;
    result
}

/// Rasterize the SVG container to PNG bytes at the given scale.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rasterize_to_png(svg: &str, scale: f32) -> ExportResult<Vec<u8>> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| ExportError::Rasterize(format!("SVG parsing failed: {e}")))?;

    let px_w = (tree.size().width() * scale) as u32;
    let px_h = (tree.size().height() * scale) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| ExportError::Rasterize("Failed to create pixmap".to_string()))?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(format!("PNG encoding failed: {e}")))
}

/// Round a measured CSS height up to whole pixels, at least one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn css_px(height: f32) -> u32 {
    let px = height.ceil() as u32;
    px.max(1)
}

fn strip_style_tag(style_tag: &str) -> &str {
    style_tag
        .strip_prefix("<style>")
        .and_then(|s| s.strip_suffix("</style>"))
        .unwrap_or(style_tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteforge_core::style::style_map;

    #[test]
    fn test_fragment_scopes_body_rules() {
        let page = Page::new();
        let fragment = build_export_fragment(&page, "");
        assert!(fragment.contains(".export-root{margin:0;padding:0;}"));
        assert!(!fragment.contains("body{"));
        assert!(fragment.contains("class=\"export-root\""));
        assert!(fragment.contains("page-root"));
    }

    #[test]
    fn test_fragment_scopes_global_and_custom_body_rules() {
        let mut page = Page::new();
        page.custom_css = "body{color:red}".to_string();
        let fragment = build_export_fragment(&page, "body{font-family:serif}");
        assert_eq!(fragment.matches(".export-root{").count(), 3);
        assert!(!fragment.contains("body{"));
    }

    #[test]
    fn test_fragment_inlines_body_styles() {
        let mut page = Page::new();
        page.body_styles = style_map(&[("backgroundColor", "#eee")]);
        let fragment = build_export_fragment(&page, "");
        assert!(fragment.contains("class=\"export-root\" style=\"background-color:#eee\""));
    }

    #[test]
    fn test_fragment_appends_body_responsive_rules() {
        let mut page = Page::new();
        page.body_responsive
            .insert(ViewportKey::Mobile, style_map(&[("padding", "4px")]));
        let fragment = build_export_fragment(&page, "");
        assert!(fragment
            .contains("@media (max-width: 576px){.export-root{padding:4px !important}}"));
    }

    #[test]
    fn test_wrap_in_svg_structure() {
        let svg = wrap_in_svg("<div>x</div>", 800, 600);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"600\""));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert!(svg.contains("<foreignObject width=\"100%\" height=\"100%\"><div>x</div></foreignObject>"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_css_px_rounds_up_and_clamps() {
        assert_eq!(css_px(0.0), 1);
        assert_eq!(css_px(99.2), 100);
        assert_eq!(css_px(480.0), 480);
    }

    #[test]
    fn test_strip_style_tag() {
        assert_eq!(strip_style_tag("<style>a{}</style>"), "a{}");
        assert_eq!(strip_style_tag("bare"), "bare");
    }
}
