use std::path::{Component, Path, PathBuf};

use tree_sitter::Node;

use crate::error::MappersError;

/// Extract UTF-8 text from a tree-sitter node, returning `""` on failure.
pub fn txt<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Strip surrounding quotes (`'`, `"`) from a string literal.
pub fn trim_quotes(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\'' || c == '"')
}

/// Make a path absolute against the working directory and fold away `.` and
/// `..` components without touching the filesystem.
pub fn absolute_normalized(path: &Path) -> Result<PathBuf, MappersError> {
    let abs = std::path::absolute(path).map_err(|e| MappersError::io(path, e))?;

    let mut out = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Lexical relative path from `base` to `target`, both already absolute and
/// normalized. Returns an empty path when they are equal.
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }
    rel
}

/// Render a path with `/` separators regardless of host conventions.
pub fn to_posix(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}
