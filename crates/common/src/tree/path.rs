//! Slash-delimited path helpers.
//!
//! Paths inside a tree are always absolute and normalized: a leading `/`,
//! no trailing `/`, no empty segments. The root is `/`. Caller-supplied
//! paths are accepted in any shape (`a/b`, `/a//b/`, ...) and normalized
//! through [`segments`].

pub const ROOT: &str = "/";
pub const SEPARATOR: char = '/';

/// Split a path into its non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Render a caller-supplied path in canonical form.
pub fn normalize(path: &str) -> String {
    let segments = segments(path);
    if segments.is_empty() {
        return ROOT.to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    for segment in segments {
        out.push(SEPARATOR);
        out.push_str(segment);
    }
    out
}

pub fn is_root(path: &str) -> bool {
    segments(path).is_empty()
}

/// Join a normalized parent path with a single name.
pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT {
        format!("{}{}", ROOT, name)
    } else {
        format!("{}{}{}", parent, SEPARATOR, name)
    }
}

/// Split a path into its normalized parent and its final segment.
///
/// Returns `None` for the root, which has neither.
pub fn split(path: &str) -> Option<(String, &str)> {
    let mut segments = segments(path);
    let name = segments.pop()?;
    let parent = if segments.is_empty() {
        ROOT.to_string()
    } else {
        let mut parent = String::new();
        for segment in segments {
            parent.push(SEPARATOR);
            parent.push_str(segment);
        }
        parent
    };
    Some((parent, name))
}

/// Final segment of a normalized path; empty for the root.
pub fn name(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or_default()
}

/// Whether `path` equals `ancestor` or lies underneath it, compared by segment.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    let path = segments(path);
    let ancestor = segments(ancestor);
    path.len() >= ancestor.len() && path[..ancestor.len()] == ancestor[..]
}
