/// Errors produced while building a mapper registry.
///
/// Every variant is fatal: a scan either yields the complete registry or
/// fails with the first error encountered.
#[derive(Debug, thiserror::Error)]
pub enum MappersError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Walk {
        path: String,
        source: walkdir::Error,
    },

    #[error("{path}:{line}:{column}: syntax error in mapper file")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
    },

    #[error("failed to load grammar: {0}")]
    Language(String),

    #[error("invalid {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        source: regex::Error,
    },

    #[error("config {path}: {source}")]
    Config {
        path: String,
        source: serde_json::Error,
    },
}

impl MappersError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
