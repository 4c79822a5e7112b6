use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::error::MappersError;

/// Directory basenames skipped when no ignore list is given.
pub const DEFAULT_IGNORE_LIST: &[&str] = &[".git", ".vscode", "node_modules"];

/// Basenames of files that are parsed for mappers.
pub const DEFAULT_MAPPER_FILES_PATTERN: &str = r"\.mappers\.ts$";

/// Declared names that count as mappers.
pub const DEFAULT_MAPPER_SUFFIX_PATTERN: &str = "Mapper$";

/// Caller overrides for a scan. Every field is optional; unset fields fall
/// back to the defaults in [`ScanConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScanOptions {
    pub current_dir: Option<PathBuf>,
    pub ignore_list: Option<Vec<String>>,
    pub remove_extension: Option<bool>,
    pub mapper_files_pattern: Option<String>,
    pub mapper_suffix_pattern: Option<String>,
}

impl ScanOptions {
    /// Layer `other` on top of `self`: fields set in `other` win, the rest
    /// are kept.
    pub fn overlay(self, other: ScanOptions) -> ScanOptions {
        ScanOptions {
            current_dir: other.current_dir.or(self.current_dir),
            ignore_list: other.ignore_list.or(self.ignore_list),
            remove_extension: other.remove_extension.or(self.remove_extension),
            mapper_files_pattern: other.mapper_files_pattern.or(self.mapper_files_pattern),
            mapper_suffix_pattern: other.mapper_suffix_pattern.or(self.mapper_suffix_pattern),
        }
    }

    /// Load options from a JSON file. `//` and `/* */` comments are allowed.
    ///
    /// A relative `currentDir` is resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<ScanOptions, MappersError> {
        let content = std::fs::read_to_string(path).map_err(|e| MappersError::io(path, e))?;
        let stripped = strip_jsonc_comments(&content);

        let mut options: ScanOptions =
            serde_json::from_str(&stripped).map_err(|e| MappersError::Config {
                path: path.display().to_string(),
                source: e,
            })?;

        if let (Some(dir), Some(parent)) = (options.current_dir.as_ref(), path.parent()) {
            if dir.is_relative() {
                options.current_dir = Some(parent.join(dir));
            }
        }

        Ok(options)
    }
}

/// Fully resolved scan configuration. Built once per invocation and shared
/// by reference with every step of the traversal.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub output_dir: PathBuf,
    pub current_dir: PathBuf,
    pub ignore_list: Vec<String>,
    pub remove_extension: bool,
    pub mapper_files_pattern: Regex,
    pub mapper_suffix_pattern: Regex,
}

impl ScanConfig {
    /// Merge `options` over the defaults and compile both patterns.
    ///
    /// Fails before touching the filesystem if a pattern does not compile.
    pub fn resolve(output_dir: &Path, options: ScanOptions) -> Result<ScanConfig, MappersError> {
        let mapper_files_pattern = compile(
            "mapperFilesPattern",
            options
                .mapper_files_pattern
                .as_deref()
                .unwrap_or(DEFAULT_MAPPER_FILES_PATTERN),
        )?;
        let mapper_suffix_pattern = compile(
            "mapperSuffixPattern",
            options
                .mapper_suffix_pattern
                .as_deref()
                .unwrap_or(DEFAULT_MAPPER_SUFFIX_PATTERN),
        )?;

        let current_dir = match options.current_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| MappersError::io(Path::new("."), e))?,
        };

        let ignore_list = options
            .ignore_list
            .unwrap_or_else(|| DEFAULT_IGNORE_LIST.iter().map(|s| s.to_string()).collect());

        Ok(ScanConfig {
            output_dir: output_dir.to_path_buf(),
            current_dir,
            ignore_list,
            remove_extension: options.remove_extension.unwrap_or(true),
            mapper_files_pattern,
            mapper_suffix_pattern,
        })
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignore_list.iter().any(|ignored| ignored == name)
    }

    pub fn is_mapper_file(&self, name: &str) -> bool {
        self.mapper_files_pattern.is_match(name)
    }

    /// Logical key for a declared name, or `None` if it is not a mapper.
    ///
    /// The first match of the suffix pattern is removed: `UserMapper` gives
    /// `User`.
    pub fn mapper_key(&self, name: &str) -> Option<String> {
        if !self.mapper_suffix_pattern.is_match(name) {
            return None;
        }
        Some(self.mapper_suffix_pattern.replace(name, "").into_owned())
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, MappersError> {
    Regex::new(pattern).map_err(|source| MappersError::InvalidPattern { field, source })
}

/// Remove `//` and `/* */` comments outside of string literals.
fn strip_jsonc_comments(input: &str) -> String {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out: Vec<u8> = Vec::with_capacity(len);
    let mut i = 0;

    while i < len {
        let ch = bytes[i];

        if ch == b'"' {
            out.push(ch);
            i += 1;
            while i < len {
                let c = bytes[i];
                out.push(c);
                i += 1;
                if c == b'\\' && i < len {
                    out.push(bytes[i]);
                    i += 1;
                } else if c == b'"' {
                    break;
                }
            }
            continue;
        }

        if ch == b'/' && i + 1 < len && bytes[i + 1] == b'/' {
            while i < len && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        if ch == b'/' && i + 1 < len && bytes[i + 1] == b'*' {
            i += 2;
            while i + 1 < len && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                i += 1;
            }
            i = (i + 2).min(len);
            continue;
        }

        out.push(ch);
        i += 1;
    }

    // Only ASCII comment bytes were dropped, so the result is still UTF-8.
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn defaults() -> ScanConfig {
        ScanConfig::resolve(Path::new("out"), ScanOptions::default()).unwrap()
    }

    #[test]
    fn resolve_applies_defaults() {
        let cfg = defaults();
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.current_dir, std::env::current_dir().unwrap());
        assert_eq!(cfg.ignore_list, vec![".git", ".vscode", "node_modules"]);
        assert!(cfg.remove_extension);
        assert!(cfg.is_mapper_file("user.mappers.ts"));
        assert!(!cfg.is_mapper_file("user.mappers.tsx"));
        assert!(!cfg.is_mapper_file("user.ts"));
    }

    #[test]
    fn overriding_one_field_keeps_other_defaults() {
        let cfg = ScanConfig::resolve(
            Path::new("out"),
            ScanOptions {
                mapper_suffix_pattern: Some("Converter$".to_string()),
                ..ScanOptions::default()
            },
        )
        .unwrap();

        assert!(cfg.remove_extension);
        assert!(cfg.is_ignored_dir("node_modules"));
        assert!(cfg.is_mapper_file("a.mappers.ts"));
        assert_eq!(cfg.mapper_key("UserConverter").as_deref(), Some("User"));
        assert_eq!(cfg.mapper_key("UserMapper"), None);
    }

    #[test]
    fn mapper_key_strips_suffix() {
        let cfg = defaults();
        assert_eq!(cfg.mapper_key("UserMapper").as_deref(), Some("User"));
        assert_eq!(cfg.mapper_key("MapperUtils"), None);
        assert_eq!(cfg.mapper_key("User"), None);
    }

    #[test]
    fn mapper_key_removes_only_first_match() {
        let cfg = ScanConfig::resolve(
            Path::new("out"),
            ScanOptions {
                mapper_suffix_pattern: Some("Map".to_string()),
                ..ScanOptions::default()
            },
        )
        .unwrap();
        assert_eq!(cfg.mapper_key("MapUserMap").as_deref(), Some("UserMap"));
    }

    #[test]
    fn invalid_pattern_fails_fast() {
        let err = ScanConfig::resolve(
            Path::new("out"),
            ScanOptions {
                current_dir: Some(PathBuf::from("/definitely/not/here")),
                mapper_files_pattern: Some("(".to_string()),
                ..ScanOptions::default()
            },
        )
        .unwrap_err();

        assert!(matches!(
            err,
            MappersError::InvalidPattern {
                field: "mapperFilesPattern",
                ..
            }
        ));
    }

    #[test]
    fn overlay_replaces_only_set_fields() {
        let base = ScanOptions {
            current_dir: Some(PathBuf::from("src")),
            remove_extension: Some(false),
            ..ScanOptions::default()
        };
        let top = ScanOptions {
            remove_extension: Some(true),
            ignore_list: Some(vec!["dist".to_string()]),
            ..ScanOptions::default()
        };

        let merged = base.overlay(top);
        assert_eq!(merged.current_dir, Some(PathBuf::from("src")));
        assert_eq!(merged.remove_extension, Some(true));
        assert_eq!(merged.ignore_list, Some(vec!["dist".to_string()]));
        assert_eq!(merged.mapper_files_pattern, None);
    }

    #[test]
    fn from_file_parses_jsonc_and_resolves_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappers.json");
        fs::write(
            &path,
            r#"{
  // scan only the models
  "currentDir": "src/models",
  /* keep .ts in references */
  "removeExtension": false,
  "mapperSuffixPattern": "Mapper$|Converter$"
}"#,
        )
        .unwrap();

        let options = ScanOptions::from_file(&path).unwrap();
        assert_eq!(options.current_dir, Some(dir.path().join("src/models")));
        assert_eq!(options.remove_extension, Some(false));
        assert_eq!(
            options.mapper_suffix_pattern.as_deref(),
            Some("Mapper$|Converter$")
        );
        assert_eq!(options.ignore_list, None);
    }

    #[test]
    fn from_file_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappers.json");
        fs::write(&path, r#"{ "ignoreDirs": ["x"] }"#).unwrap();

        let err = ScanOptions::from_file(&path).unwrap_err();
        assert!(matches!(err, MappersError::Config { .. }));
    }

    #[test]
    fn strip_jsonc_keeps_slashes_inside_strings() {
        let input = r#"{ "mapperFilesPattern": "//not-a-comment" } // trailing"#;
        let result = strip_jsonc_comments(input);
        assert!(result.contains(r#""//not-a-comment""#));
        assert!(!result.contains("trailing"));
    }
}
