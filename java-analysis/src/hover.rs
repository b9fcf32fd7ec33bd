use crate::lookup::node_at;
use java_parser::java::ast::{Span, SyntaxNode, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverResult {
    /// `"<kind> <name>"`
    pub contents: String,
    /// Span of the hovered identifier
    pub span: Span,
}

/// Describe the innermost named node at `offset`.
///
/// Declarations describe themselves. A name reference borrows the kind of the first declaration
/// with the same name and yields nothing when there is none.
pub fn hover(tree: &SyntaxTree, offset: usize) -> Option<HoverResult> {
    let node = node_at(tree, offset)?;
    let kind = match node {
        SyntaxNode::TypeDecl(declaration)
        | SyntaxNode::MethodDecl(declaration)
        | SyntaxNode::VarDecl(declaration) => declaration.kind(),
        SyntaxNode::NameRef(identifier) => tree.first_declaration_named(&identifier.text)?.kind(),
    };
    let identifier = node.identifier();
    Some(HoverResult {
        contents: format!("{kind} {}", identifier.text),
        span: identifier.span.clone(),
    })
}
