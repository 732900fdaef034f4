//! Virtual path operations for the assembled project's file set.
//!
//! Paths here are `/`-separated keys into a virtual file map, never OS
//! paths, so these are plain string operations.

/// Normalize separators to `/`.
#[must_use]
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// The directory portion of a path ("" for a bare filename).
#[must_use]
pub fn dirname(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}

/// Join two segments, collapsing duplicate separators.
#[must_use]
pub fn join(base: &str, rest: &str) -> String {
    let mut joined = normalize(&format!("{base}/{rest}"));
    while joined.contains("//") {
        joined = joined.replace("//", "/");
    }
    joined
}

/// Resolve a relative specifier against a base directory to an absolute
/// virtual path. A leading `/` means root-relative; `.` and `..` segments
/// collapse.
#[must_use]
pub fn resolve(base_dir: &str, rel: &str) -> String {
    if let Some(rooted) = rel.strip_prefix('/') {
        return rooted.to_string();
    }
    let mut stack: Vec<&str> = Vec::new();
    let joined = join(base_dir, rel);
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}

/// The relative specifier that reaches `to_file` from `from_file`'s
/// directory, always starting with `./` or `../`.
#[must_use]
pub fn relative(from_file: &str, to_file: &str) -> String {
    let from_dir = dirname(from_file);
    let mut from_parts: Vec<&str> = if from_dir.is_empty() {
        Vec::new()
    } else {
        from_dir.split('/').collect()
    };
    let mut to_parts: Vec<&str> = to_file.split('/').collect();

    while !from_parts.is_empty() && !to_parts.is_empty() && from_parts[0] == to_parts[0] {
        from_parts.remove(0);
        to_parts.remove(0);
    }

    let mut segments: Vec<&str> = vec![".."; from_parts.len()];
    segments.extend(to_parts);
    let rel = segments.join("/");
    if rel.is_empty() {
        "./".to_string()
    } else if rel.starts_with('.') {
        rel
    } else {
        format!("./{rel}")
    }
}

/// Append an extension unless the path already ends with it.
#[must_use]
pub fn with_ext(path: &str, ext: &str) -> String {
    if path.ends_with(ext) {
        path.to_string()
    } else {
        format!("{path}{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("src/pages/Page1.jsx"), "src/pages");
        assert_eq!(dirname("package.json"), "");
        assert_eq!(dirname("src\\App.js"), "src");
    }

    #[test]
    fn test_join_collapses_slashes() {
        assert_eq!(join("src", "App.js"), "src/App.js");
        assert_eq!(join("src/", "/App.js"), "src/App.js");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("src/pages", "./Home"), "src/pages/Home");
        assert_eq!(resolve("src/pages", "../App"), "src/App");
        assert_eq!(resolve("src/pages", "../../package.json"), "package.json");
        assert_eq!(resolve("src", "/src/App.js"), "src/App.js");
    }

    #[test]
    fn test_relative() {
        assert_eq!(relative("src/App.js", "src/pages/Page1.jsx"), "./pages/Page1.jsx");
        assert_eq!(relative("src/pages/Page1.jsx", "src/App.js"), "../App.js");
        assert_eq!(relative("src/pages/Page1.jsx", "src/pages/a.css"), "./a.css");
        assert_eq!(relative("App.js", "lib/util.js"), "./lib/util.js");
    }

    #[test]
    fn test_with_ext() {
        assert_eq!(with_ext("src/App", ".js"), "src/App.js");
        assert_eq!(with_ext("src/App.js", ".js"), "src/App.js");
    }
}
