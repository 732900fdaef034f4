//! Relative-import rewriting after virtual file reorganization.
//!
//! When the user renames, moves or deletes files in the assembled project,
//! relative `from "..."` specifiers inside script files must be recomputed
//! against the new layout. Specifiers that do not resolve to a known
//! original file - bare package imports, typos, targets that were deleted -
//! are left untouched; a deleted target therefore produces a dangling
//! import the caller is expected to surface separately.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::paths;

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"from\s+["']([^"']+)["']"#).expect("static import pattern"));

/// Script extensions whose presence in a specifier is preserved on rewrite.
const SCRIPT_EXTS: [&str; 4] = [".jsx", ".tsx", ".js", ".ts"];

/// Rewrite relative import specifiers so they resolve after a
/// rename/move/delete pass over the project's virtual file set.
///
/// * `original_files` - the file set as assembled, before any edits.
/// * `new_files` - the post-edit file set (deleted files absent).
/// * `path_map` - old path to new path for every surviving file; files
///   missing from the map are treated as unmoved.
///
/// Only `.js`/`.jsx` files are scanned; other files pass through verbatim.
/// With an identity `path_map` the result is byte-identical to `new_files`.
#[must_use]
pub fn rewrite_imports(
    original_files: &BTreeMap<String, String>,
    new_files: &BTreeMap<String, String>,
    path_map: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let reverse: HashMap<&str, &str> = path_map
        .iter()
        .map(|(old, new)| (new.as_str(), old.as_str()))
        .collect();

    let mut updated = BTreeMap::new();
    for (new_path, content) in new_files {
        if !is_script_file(new_path) {
            updated.insert(new_path.clone(), content.clone());
            continue;
        }

        let old_path = reverse
            .get(new_path.as_str())
            .copied()
            .unwrap_or(new_path.as_str());
        let old_dir = paths::dirname(old_path);

        let rewritten = IMPORT_RE.replace_all(content, |caps: &Captures| {
            rewrite_specifier(caps, &old_dir, new_path, original_files, new_files, path_map)
        });
        updated.insert(new_path.clone(), rewritten.into_owned());
    }
    updated
}

fn rewrite_specifier(
    caps: &Captures,
    old_dir: &str,
    new_path: &str,
    original_files: &BTreeMap<String, String>,
    new_files: &BTreeMap<String, String>,
    path_map: &BTreeMap<String, String>,
) -> String {
    let full_match = caps[0].to_string();
    let spec = &caps[1];

    // Bare package specifiers are external dependencies.
    if !spec.starts_with('.') && !spec.starts_with('/') {
        return full_match;
    }

    let old_abs = paths::resolve(old_dir, spec);
    let candidates = [
        old_abs.clone(),
        paths::with_ext(&old_abs, ".js"),
        paths::with_ext(&old_abs, ".jsx"),
        paths::join(&old_abs, "index.js"),
        paths::join(&old_abs, "index.jsx"),
    ];

    let Some(old_target) = candidates
        .iter()
        .find(|candidate| original_files.contains_key(*candidate))
    else {
        tracing::debug!("Unresolved import specifier left untouched: {spec}");
        return full_match;
    };

    let new_target = path_map
        .get(old_target)
        .cloned()
        .unwrap_or_else(|| old_target.clone());

    // A target absent from the post-edit set was deleted; the import cannot
    // resolve and stays as-is (dangling, by policy).
    if !new_files.contains_key(&new_target) {
        tracing::debug!("Import target deleted, specifier left untouched: {spec}");
        return full_match;
    }

    let rel = paths::relative(new_path, &new_target);
    let final_spec = if has_script_ext(spec) {
        rel
    } else {
        strip_script_ext(&rel)
    };
    format!("from \"{final_spec}\"")
}

fn is_script_file(path: &str) -> bool {
    path.ends_with(".js") || path.ends_with(".jsx")
}

fn has_script_ext(spec: &str) -> bool {
    SCRIPT_EXTS.iter().any(|ext| spec.ends_with(ext))
}

fn strip_script_ext(spec: &str) -> String {
    for ext in SCRIPT_EXTS {
        if let Some(stripped) = spec.strip_suffix(ext) {
            return stripped.to_string();
        }
    }
    spec.to_string()
}
