use crate::lookup::identifier_at;
use java_parser::java::ast::{DeclarationKind, Span, SyntaxTree};

/// Where a name is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTarget {
    pub name: String,
    pub kind: DeclarationKind,
    /// Whole declaration
    pub span: Span,
    /// Declared name only
    pub selection_span: Span,
}

/// Resolve the identifier at `offset` to the first declaration in document order with the same
/// name, across all kinds. No scoping, overloads or other files are considered.
pub fn definition(tree: &SyntaxTree, offset: usize) -> Option<DefinitionTarget> {
    let identifier = identifier_at(tree, offset)?;
    let declaration = tree.first_declaration_named(&identifier.text)?;
    Some(DefinitionTarget {
        name: declaration.name.text.clone(),
        kind: declaration.kind(),
        span: declaration.span.clone(),
        selection_span: declaration.name.span.clone(),
    })
}
