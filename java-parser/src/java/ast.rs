//! Syntax tree for Java source
//!
//!     The tree is intentionally flat. A parse produces a list of named nodes in document order
//!     plus the problems found along the way. Nesting is not stored explicitly; it is recoverable
//!     from span containment because enclosing nodes always come before the nodes they enclose.
//!
//!     Node kinds are a closed set (see [`SyntaxNode`]): type, method and variable declarations
//!     plus bare name references. Consumers match on them exhaustively.
//!
//!     All spans are byte offsets into the exact text that was parsed. Converting them to wire
//!     positions goes through [`range`].

pub mod nodes;
pub mod problem;
pub mod range;

pub use nodes::{Declaration, DeclarationKind, Flavor, Identifier, SyntaxNode, SyntaxTree};
pub use problem::{Problem, Severity};
pub use range::{offset_of, offset_to_position, Position, SourceIndex, Span};
