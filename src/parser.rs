use tree_sitter::{Node, Parser, Tree};

use crate::error::MappersError;
use crate::lang::SourceDialect;

/// Parse source text into a tree-sitter tree, rejecting malformed input.
///
/// tree-sitter recovers from syntax errors by inserting ERROR and MISSING
/// nodes. A mapper file with either is reported with the position of the
/// first one so it cannot silently contribute fewer entries than it declares.
pub fn parse_source(
    display_path: &str,
    source: &str,
    dialect: SourceDialect,
) -> Result<Tree, MappersError> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.tree_sitter_language())
        .map_err(|e| MappersError::Language(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or_else(|| MappersError::Syntax {
        path: display_path.to_string(),
        line: 1,
        column: 1,
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root).unwrap_or(root);
        let pos = bad.start_position();
        return Err(MappersError::Syntax {
            path: display_path.to_string(),
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }

    Ok(tree)
}

/// First ERROR or MISSING node in document order.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}
