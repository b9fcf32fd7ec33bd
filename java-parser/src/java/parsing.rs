//! Parsing module for Java source
//!
//!     Parsing runs in three steps:
//!         1. Lexing: tokens plus lexical problems. See [lexing](crate::java::lexing).
//!         2. Declaration parsing: named nodes, syntax problems and the import list. See
//!            [parser].
//!         3. Import checking: single-type imports whose simple name is never referenced are
//!            reported as warnings. See [imports].
//!
//!     The result is a [`SyntaxTree`]. Parsing never fails: whatever is wrong with the input
//!     ends up in the tree's problems, and the nodes cover as much as could be recognized.
//!
//!     Callers that need to swap the parser out (servers under test, mostly) go through the
//!     [`SyntaxProvider`] trait. [`JavaSyntaxProvider`] is the real thing.

mod imports;
mod parser;

use crate::java::ast::SyntaxTree;
use crate::java::lexing::tokenize;
use parser::Parser;

/// Turns source text into a syntax tree.
///
/// Implementations must be pure functions of the text: same input, same tree.
pub trait SyntaxProvider: Send + Sync + 'static {
    fn parse(&self, source: &str) -> SyntaxTree;
}

/// The declaration-level Java parser
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaSyntaxProvider;

impl SyntaxProvider for JavaSyntaxProvider {
    fn parse(&self, source: &str) -> SyntaxTree {
        parse_compilation_unit(source)
    }
}

/// Parse a whole source file
pub fn parse_compilation_unit(source: &str) -> SyntaxTree {
    let lexed = tokenize(source);
    let parsed = Parser::new(source, lexed.tokens).parse();

    let mut problems = lexed.problems;
    problems.extend(parsed.problems);
    problems.extend(imports::unused_imports(&parsed.imports, &parsed.nodes));
    SyntaxTree::new(parsed.nodes, problems)
}
