use std::path::Path;

use tree_sitter::Node;

use crate::config::ScanConfig;
use crate::error::MappersError;
use crate::lang::SourceDialect;
use crate::model::{reference, Candidate, DeclarationKind, MapperEntry};
use crate::parser;
use crate::util::{trim_quotes, txt};

/// A matched mapper file, ready for extraction.
pub struct SourceFile<'a> {
    /// Path on disk; picks the grammar and names the file in diagnostics.
    pub path: &'a Path,
    /// Path recorded in references, relative to the output root.
    pub relative_path: &'a str,
    pub text: &'a str,
}

/// Parse a mapper file and derive its `(key, reference)` entries in source
/// order. Later entries for the same key are meant to overwrite earlier ones.
pub fn extract(
    file: &SourceFile<'_>,
    config: &ScanConfig,
) -> Result<Vec<MapperEntry>, MappersError> {
    let dialect = SourceDialect::for_path(file.path);
    let tree = parser::parse_source(&file.path.display().to_string(), file.text, dialect)?;
    let candidates = collect_candidates(tree.root_node(), file.text.as_bytes());
    Ok(mapper_entries(&candidates, file.relative_path, config))
}

/// Keep candidates whose name matches the suffix pattern and turn them into
/// registry entries.
pub fn mapper_entries(
    candidates: &[Candidate],
    relative_path: &str,
    config: &ScanConfig,
) -> Vec<MapperEntry> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let key = config.mapper_key(&candidate.name)?;
            tracing::trace!(
                key = %key,
                name = %candidate.name,
                kind = %candidate.kind,
                line = candidate.line,
                "mapper declaration"
            );
            Some(MapperEntry {
                key,
                reference: reference(relative_path, &candidate.name),
            })
        })
        .collect()
}

/// Walk top-level children of the AST root and collect every named
/// interface, type alias, class and named re-export, in source order.
///
/// No suffix filtering happens here.
pub fn collect_candidates(root: Node, src: &[u8]) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        match node.kind() {
            "export_statement" => process_export(node, src, &mut candidates),
            _ => candidates.extend(declaration_candidate(node, src)),
        }
    }

    candidates
}

// ── Declarations ──

/// Candidate for a type-like declaration, looking through `declare`.
fn declaration_candidate(node: Node, src: &[u8]) -> Option<Candidate> {
    let kind = match node.kind() {
        "interface_declaration" => DeclarationKind::Interface,
        "type_alias_declaration" => DeclarationKind::TypeAlias,
        // `class` is the expression form `export default class XMapper {}` may take.
        "class_declaration" | "abstract_class_declaration" | "class" => DeclarationKind::Class,
        "ambient_declaration" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find_map(|child| declaration_candidate(child, src));
            return inner;
        }
        _ => return None,
    };

    let name_node = node.child_by_field_name("name")?;
    let name = txt(name_node, src);
    if name.is_empty() {
        return None;
    }

    Some(Candidate {
        name: name.to_string(),
        kind,
        line: node.start_position().row + 1,
    })
}

// ── Exports ──

fn process_export(node: Node, src: &[u8], candidates: &mut Vec<Candidate>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "export_clause" {
            extract_export_clause(child, src, candidates);
        } else if let Some(candidate) = declaration_candidate(child, src) {
            candidates.push(candidate);
        }
    }
}

/// `export { A, B as CMapper }` contributes the exported names `A` and
/// `CMapper`, with or without a `from` source.
fn extract_export_clause(clause: Node, src: &[u8], candidates: &mut Vec<Candidate>) {
    let mut cursor = clause.walk();
    for spec in clause.named_children(&mut cursor) {
        if spec.kind() != "export_specifier" {
            continue;
        }
        let exported = spec
            .child_by_field_name("alias")
            .or_else(|| spec.child_by_field_name("name"));
        let Some(exported) = exported else {
            continue;
        };

        let name = trim_quotes(txt(exported, src));
        if name.is_empty() {
            continue;
        }

        candidates.push(Candidate {
            name: name.to_string(),
            kind: DeclarationKind::ReExport,
            line: spec.start_position().row + 1,
        });
    }
}
