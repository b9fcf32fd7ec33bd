//! # java-analysis
//!
//! Queries over a parsed Java file: completion, hover, go-to-definition and the document
//! outline.
//!
//!     Every function here is stateless and takes a [`SyntaxTree`](java_parser::java::ast::SyntaxTree)
//!     produced from the current text. Offsets are byte offsets into that same text; converting
//!     wire positions is the caller's job (see [`java_parser::java::ast::range`]).
//!
//!     Name matching is textual and file-local. The first declaration in document order with a
//!     matching name wins, whatever its kind or scope.

pub mod completion;
pub mod definition;
pub mod document_symbols;
pub mod hover;
pub mod lookup;

pub use completion::{completion_items, CompletionCandidate};
pub use definition::{definition, DefinitionTarget};
pub use document_symbols::{document_symbols, JavaDocumentSymbol};
pub use hover::{hover, HoverResult};
pub use lookup::{identifier_at, node_at};
