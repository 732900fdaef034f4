//! Assembly of the exportable component project.
//!
//! Produces a virtual file system (path -> text content) for a React
//! project: one component per page embedding its generated markup and style
//! tag, sanitized global/page CSS and JS files, router wiring, a bootstrap
//! entry point, the host HTML document and the package manifest.
//!
//! Output is deterministic: identical input produces a byte-identical path
//! set and contents. Page components are named `Page<N>` in page-array
//! order - entity ids never appear in file paths.

use std::collections::BTreeMap;
use std::fmt::Write;

use siteforge_core::{NamedFile, Page};

use crate::generator::generate_page_parts;

/// The fixed package manifest for the exported project: exactly three
/// runtime dependencies and the start/build scripts.
const PACKAGE_JSON: &str = r#"{
  "name": "exported-ui",
  "private": true,
  "version": "0.1.0",
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0",
    "react-router-dom": "^6.23.1"
  },
  "scripts": {
    "start": "react-scripts start",
    "build": "react-scripts build"
  }
}"#;

/// The host HTML document mounting the exported app.
const PUBLIC_INDEX_HTML: &str = "<!doctype html>\n<html lang=\"en\">\n  <head>\n    <meta charset=\"utf-8\" />\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n    <title>Exported Project</title>\n  </head>\n  <body>\n    <div id=\"root\"></div>\n  </body>\n</html>\n";

/// The bootstrap entry point mounting the root component.
const INDEX_JS: &str = "import React from \"react\";\nimport ReactDOM from \"react-dom/client\";\nimport App from \"./App\";\n\nconst root = ReactDOM.createRoot(document.getElementById(\"root\"));\nroot.render(<App />);\n";

/// Sanitize a declared file name into a filesystem-safe filename.
///
/// Runs of characters outside `[A-Za-z0-9-_]` collapse to a single `-`,
/// leading/trailing dashes are stripped and the result is lowercased. An
/// empty or fully-invalid name falls back to `fallback`, and the extension
/// is appended unless already present.
#[must_use]
pub fn sanitize_file_name(name: &str, fallback: &str, ext: &str) -> String {
    let raw_source = if name.is_empty() { fallback } else { name };
    let raw = raw_source.trim();

    let mut safe = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            safe.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else if !pending_dash {
            safe.push('-');
            pending_dash = true;
        }
    }
    let safe = safe.trim_matches('-');

    let base = if safe.is_empty() {
        if fallback.is_empty() {
            "file"
        } else {
            fallback
        }
    } else {
        safe
    };

    if base.ends_with(ext) {
        base.to_string()
    } else {
        format!("{base}{ext}")
    }
}

/// Assemble the virtual file set of the exportable project.
#[must_use]
pub fn build_project_files(
    pages: &[Page],
    global_css_files: &[NamedFile],
    global_js_files: &[NamedFile],
) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    let mut page_imports = Vec::new();
    let mut page_routes = Vec::new();
    let mut global_css_imports = Vec::new();
    let mut global_js_imports = Vec::new();

    for (index, file) in global_css_files.iter().enumerate() {
        let filename = sanitize_file_name(&file.name, &format!("global-{}", index + 1), ".css");
        files.insert(format!("src/styles/{filename}"), file.content.clone());
        global_css_imports.push(format!("import \"./styles/{filename}\";"));
    }

    for (index, file) in global_js_files.iter().enumerate() {
        let filename = sanitize_file_name(&file.name, &format!("global-{}", index + 1), ".js");
        files.insert(format!("src/scripts/{filename}"), file.content.clone());
        global_js_imports.push(format!("import \"./scripts/{filename}\";"));
    }

    for (index, page) in pages.iter().enumerate() {
        let safe_name = format!("Page{}", index + 1);
        let parts = generate_page_parts(page);

        let mut page_css_imports = Vec::new();
        for (file_index, file) in page.css_files.iter().enumerate() {
            let filename = sanitize_file_name(
                &file.name,
                &format!("{safe_name}-{}", file_index + 1),
                ".css",
            );
            files.insert(format!("src/pages/{filename}"), file.content.clone());
            page_css_imports.push(format!("import \"./{filename}\";"));
        }

        let mut page_js_imports = Vec::new();
        for (file_index, file) in page.js_files.iter().enumerate() {
            let filename = sanitize_file_name(
                &file.name,
                &format!("{safe_name}-{}", file_index + 1),
                ".js",
            );
            files.insert(format!("src/pages/{filename}"), file.content.clone());
            page_js_imports.push(format!("import \"./{filename}\";"));
        }

        let component = page_component_source(
            &safe_name,
            &parts.html,
            &parts.style_tag,
            &page.custom_js,
            &page_css_imports,
            &page_js_imports,
        );
        files.insert(format!("src/pages/{safe_name}.jsx"), component);

        page_imports.push(format!(
            "import {safe_name} from \"./pages/{safe_name}\";"
        ));
        page_routes.push(format!(
            "<Route path=\"{}\" element={{<{safe_name} />}} />",
            page.route
        ));
    }

    files.insert(
        "src/App.js".to_string(),
        app_source(
            &global_css_imports,
            &global_js_imports,
            &page_imports,
            &page_routes,
        ),
    );
    files.insert("src/index.js".to_string(), INDEX_JS.to_string());
    files.insert("public/index.html".to_string(), PUBLIC_INDEX_HTML.to_string());
    files.insert("package.json".to_string(), PACKAGE_JSON.to_string());

    files
}

/// Emit one page-component source file. The page's markup and style tag are
/// embedded as JS string literals; the custom script runs on mount inside a
/// sandboxed function scope bound to `pageRoot`/`document`/`window`, and a
/// callable return value becomes the unmount cleanup.
fn page_component_source(
    safe_name: &str,
    html: &str,
    style_tag: &str,
    custom_js: &str,
    css_imports: &[String],
    js_imports: &[String],
) -> String {
    let custom_js_literal = js_string_literal(custom_js);
    let html_literal = js_string_literal(html);

    let mut out = String::new();
    out.push_str("import React, { useEffect, useRef } from \"react\";\n");
    out.push_str(&css_imports.join("\n"));
    out.push('\n');
    out.push_str(&js_imports.join("\n"));
    out.push('\n');
    let _ = write!(
        out,
        "\nexport default function {safe_name}() {{\n  \
         const rootRef = useRef(null);\n  \
         const customJs = {custom_js_literal};\n\n  \
         useEffect(() => {{\n    \
         if (!customJs) return;\n    \
         const pageRoot = rootRef.current?.querySelector(\".page-root\") || rootRef.current;\n    \
         try {{\n      \
         const fn = new Function(\"pageRoot\", \"document\", \"window\", customJs);\n      \
         const cleanup = fn(pageRoot, document, window);\n      \
         if (typeof cleanup === \"function\") return cleanup;\n    \
         }} catch (err) {{\n      \
         console.error(\"Custom JS error:\", err);\n    \
         }}\n  \
         }}, [customJs]);\n\n  \
         return (\n    \
         <div ref={{rootRef}}>\n      \
         {style_tag}\n      \
         <div dangerouslySetInnerHTML={{{{ __html: {html_literal} }}}} />\n    \
         </div>\n  \
         );\n}}\n"
    );
    out
}

/// Emit the root `App.js` wiring the router with one route per page plus a
/// not-found fallback.
fn app_source(
    global_css_imports: &[String],
    global_js_imports: &[String],
    page_imports: &[String],
    page_routes: &[String],
) -> String {
    let mut out = String::new();
    out.push_str("import React from \"react\";\n");
    out.push_str("import { BrowserRouter, Routes, Route } from \"react-router-dom\";\n");
    out.push_str(&global_css_imports.join("\n"));
    out.push('\n');
    out.push_str(&global_js_imports.join("\n"));
    out.push('\n');
    out.push_str(&page_imports.join("\n"));
    out.push('\n');
    let routes = page_routes.join("\n        ");
    let _ = write!(
        out,
        "\nexport default function App() {{\n  \
         return (\n    \
         <BrowserRouter>\n      \
         <Routes>\n        \
         {routes}\n        \
         <Route path=\"*\" element={{<div>Not Found</div>}} />\n      \
         </Routes>\n    \
         </BrowserRouter>\n  \
         );\n}}\n"
    );
    out
}

/// Encode text as a double-quoted JS string literal (JSON string syntax is a
/// subset of JS).
fn js_string_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}
