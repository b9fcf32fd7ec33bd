//! Finding the node under an offset

use java_parser::java::ast::{Identifier, SyntaxNode, SyntaxTree};

/// Innermost node whose span contains `offset`, ends inclusive.
///
/// The smallest span wins. Between equal spans the one later in document order wins, which is
/// the more deeply nested one.
pub fn node_at(tree: &SyntaxTree, offset: usize) -> Option<&SyntaxNode> {
    let mut best: Option<&SyntaxNode> = None;
    for node in tree.nodes() {
        let span = node.span();
        if offset < span.start || offset > span.end {
            continue;
        }
        match best {
            Some(current) if current.span().len() < span.len() => {}
            _ => best = Some(node),
        }
    }
    best
}

/// Identifier of the innermost declaration or name reference at `offset`
pub fn identifier_at(tree: &SyntaxTree, offset: usize) -> Option<&Identifier> {
    node_at(tree, offset).map(SyntaxNode::identifier)
}
