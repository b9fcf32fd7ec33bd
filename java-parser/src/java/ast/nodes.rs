//! Node types of the syntax tree

use super::problem::Problem;
use super::range::Span;
use std::fmt;

/// An identifier occurrence and where it sits in the source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub text: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// The three declaration kinds surfaced to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Method,
    Variable,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Method => "method",
            DeclarationKind::Variable => "variable",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer-grained description of what a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    Method,
    Constructor,
    Field,
    EnumConstant,
    Local,
    Parameter,
}

impl Flavor {
    pub fn kind(self) -> DeclarationKind {
        match self {
            Flavor::Class | Flavor::Interface | Flavor::Enum | Flavor::Record | Flavor::Annotation => {
                DeclarationKind::Class
            }
            Flavor::Method | Flavor::Constructor => DeclarationKind::Method,
            Flavor::Field | Flavor::EnumConstant | Flavor::Local | Flavor::Parameter => {
                DeclarationKind::Variable
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Class => "class",
            Flavor::Interface => "interface",
            Flavor::Enum => "enum",
            Flavor::Record => "record",
            Flavor::Annotation => "annotation",
            Flavor::Method => "method",
            Flavor::Constructor => "constructor",
            Flavor::Field => "field",
            Flavor::EnumConstant => "enum constant",
            Flavor::Local => "local variable",
            Flavor::Parameter => "parameter",
        }
    }
}

/// A node that introduces a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: Identifier,
    /// Extent of the declaration. Types and methods run from their first modifier to their last
    /// token; variable fragments cover the name and initializer only, parameters start at
    /// their type.
    pub span: Span,
    pub flavor: Flavor,
}

impl Declaration {
    pub fn new(flavor: Flavor, name: Identifier, span: Span) -> Self {
        Self { name, span, flavor }
    }

    pub fn kind(&self) -> DeclarationKind {
        self.flavor.kind()
    }
}

/// Every named node the parser reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    TypeDecl(Declaration),
    MethodDecl(Declaration),
    VarDecl(Declaration),
    NameRef(Identifier),
}

impl SyntaxNode {
    /// Wrap a declaration in the variant matching its kind.
    pub fn declaration(declaration: Declaration) -> Self {
        match declaration.kind() {
            DeclarationKind::Class => SyntaxNode::TypeDecl(declaration),
            DeclarationKind::Method => SyntaxNode::MethodDecl(declaration),
            DeclarationKind::Variable => SyntaxNode::VarDecl(declaration),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            SyntaxNode::TypeDecl(declaration)
            | SyntaxNode::MethodDecl(declaration)
            | SyntaxNode::VarDecl(declaration) => &declaration.span,
            SyntaxNode::NameRef(identifier) => &identifier.span,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        match self {
            SyntaxNode::TypeDecl(declaration)
            | SyntaxNode::MethodDecl(declaration)
            | SyntaxNode::VarDecl(declaration) => &declaration.name,
            SyntaxNode::NameRef(identifier) => identifier,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            SyntaxNode::TypeDecl(declaration)
            | SyntaxNode::MethodDecl(declaration)
            | SyntaxNode::VarDecl(declaration) => Some(declaration),
            SyntaxNode::NameRef(_) => None,
        }
    }

    pub(crate) fn set_end(&mut self, end: usize) {
        let span = match self {
            SyntaxNode::TypeDecl(declaration)
            | SyntaxNode::MethodDecl(declaration)
            | SyntaxNode::VarDecl(declaration) => &mut declaration.span,
            SyntaxNode::NameRef(identifier) => &mut identifier.span,
        };
        span.end = end.max(span.start);
    }
}

/// Result of one parse. Immutable and tied to the exact text it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    problems: Vec<Problem>,
}

impl SyntaxTree {
    /// Build a tree, putting nodes into document order (enclosing before enclosed) and
    /// problems into source order.
    pub fn new(mut nodes: Vec<SyntaxNode>, mut problems: Vec<Problem>) -> Self {
        nodes.sort_by(|a, b| {
            a.span()
                .start
                .cmp(&b.span().start)
                .then_with(|| b.span().end.cmp(&a.span().end))
        });
        problems.sort_by_key(|problem| problem.span.start);
        Self { nodes, problems }
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter().filter_map(SyntaxNode::as_declaration)
    }

    /// First declaration in document order whose name is exactly `name`.
    pub fn first_declaration_named(&self, name: &str) -> Option<&Declaration> {
        self.declarations()
            .find(|declaration| declaration.name.text == name)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.problems.is_empty()
    }
}
