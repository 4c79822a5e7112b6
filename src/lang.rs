use std::path::Path;

use tree_sitter::Language;

/// TypeScript grammars a mapper file can be parsed with.
///
/// Mapper files are TypeScript sources; the only choice to make is whether
/// JSX syntax is allowed, which tree-sitter-typescript ships as a separate
/// grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDialect {
    Ts,
    Tsx,
}

impl SourceDialect {
    /// Resolve an extension to a dialect (non-error variant).
    pub fn for_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("tsx") {
            return Some(Self::Tsx);
        }
        if is_ts_extension(ext) {
            return Some(Self::Ts);
        }
        None
    }

    /// Pick the grammar for a file, falling back to plain TypeScript when the
    /// extension is unknown (a custom file pattern may select anything).
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::for_extension)
            .unwrap_or(Self::Ts)
    }

    /// tree-sitter parser language for this dialect.
    pub fn tree_sitter_language(self) -> Language {
        match self {
            Self::Ts => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

fn is_ts_extension(ext: &str) -> bool {
    ext.eq_ignore_ascii_case("ts")
        || ext.eq_ignore_ascii_case("mts")
        || ext.eq_ignore_ascii_case("cts")
}

/// Drop a trailing TypeScript-family extension from a recorded path.
///
/// `models/user.mappers.ts` becomes `models/user.mappers`; paths ending in
/// anything else are returned unchanged.
pub fn strip_source_extension(path: &str) -> &str {
    let Some(dot) = path.rfind('.') else {
        return path;
    };
    let ext = &path[dot + 1..];
    if ext.contains('/') || SourceDialect::for_extension(ext).is_none() {
        return path;
    }
    &path[..dot]
}
