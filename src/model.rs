use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Syntactic form a mapper candidate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Class,
    ReExport,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Interface => "interface",
            Self::TypeAlias => "type",
            Self::Class => "class",
            Self::ReExport => "re-export",
        };
        f.write_str(label)
    }
}

/// A named top-level declaration or exported name, before suffix matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub kind: DeclarationKind,
    pub line: usize,
}

/// One `(key, reference)` pair produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperEntry {
    pub key: String,
    pub reference: String,
}

/// Build `./<relative-path>#<declared-name>`.
pub fn reference(relative_path: &str, name: &str) -> String {
    format!("./{relative_path}#{name}")
}

/// Logical key to reference mapping produced by one scan.
///
/// Backed by a `BTreeMap` so serialized output is stable; key order carries
/// no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Registry {
    entries: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the reference it replaced.
    pub fn insert(&mut self, entry: MapperEntry) -> Option<String> {
        self.entries.insert(entry.key, entry.reference)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl FromIterator<MapperEntry> for Registry {
    fn from_iter<I: IntoIterator<Item = MapperEntry>>(iter: I) -> Self {
        let mut registry = Self::new();
        for entry in iter {
            registry.insert(entry);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, reference: &str) -> MapperEntry {
        MapperEntry {
            key: key.to_string(),
            reference: reference.to_string(),
        }
    }

    #[test]
    fn reference_joins_path_and_fragment() {
        assert_eq!(
            reference("models/user.mappers", "UserMapper"),
            "./models/user.mappers#UserMapper"
        );
    }

    #[test]
    fn later_insert_wins() {
        let mut registry = Registry::new();
        assert_eq!(registry.insert(entry("User", "./a#UserMapper")), None);
        assert_eq!(
            registry.insert(entry("User", "./b#UserMapper")).as_deref(),
            Some("./a#UserMapper")
        );
        assert_eq!(registry.get("User"), Some("./b#UserMapper"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn collect_keeps_last_entry_per_key() {
        let registry: Registry = [
            entry("A", "./l#AMapper"),
            entry("B", "./l#BMapper"),
            entry("B", "./r#BMapper"),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.get("A"), Some("./l#AMapper"));
        assert_eq!(registry.get("B"), Some("./r#BMapper"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn serializes_as_flat_object() {
        let registry: Registry = [entry("User", "./u#UserMapper")].into_iter().collect();
        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"{"User":"./u#UserMapper"}"#);
    }

    #[test]
    fn declaration_kind_labels() {
        assert_eq!(DeclarationKind::TypeAlias.to_string(), "type");
        assert_eq!(DeclarationKind::ReExport.to_string(), "re-export");
    }
}
