//! Language Server Protocol (LSP) implementation for Java
//!
//!     This crate serves Java source files to any LSP-compatible editor. It keeps the text of
//!     open documents in memory, re-parses on every lifecycle event and every query, pushes
//!     diagnostics, and answers position-based queries from a freshly built syntax tree.
//!
//! Layers
//!
//!     The server is thin on purpose; the work happens in the sibling crates:
//!
//!         - java-parser: text to [`SyntaxTree`](java_parser::java::ast::SyntaxTree), plus the
//!           byte offset / wire position conversion.
//!         - java-analysis: completion, hover, definition and outline over one tree.
//!         - java-config: the layered configuration the binary loads at startup.
//!
//!     This crate adds the document store, the conversion of results into protocol types, the
//!     diagnostics publisher and the tower-lsp glue.
//!
//! Feature Set
//!
//!     1. Diagnostics (textDocument/publishDiagnostics):
//!         - Lexical and syntax errors, unused imports as warnings
//!         - Published after open, change and save; cleared on close
//!
//!     2. Completion (textDocument/completion):
//!         - Every declared name in the file, in document order
//!
//!     3. Hover (textDocument/hover):
//!         - `"<kind> <name>"` for the declaration or reference under the cursor
//!
//!     4. Go to Definition (textDocument/definition):
//!         - First declaration in the file with the same name
//!
//!     5. Document Symbols (textDocument/documentSymbol):
//!         - Outline of types and their members
//!
//!     Name matching is textual and file-local throughout: there is no scoping, no overload
//!     resolution and no cross-file index.
//!
//! Concurrency
//!
//!     tower-lsp may run handlers concurrently. The document store lock is held only for the map
//!     operation itself, never across a parse or a client call, and the last writer wins.

pub mod convert;
pub mod diagnostics;
pub mod documents;
pub mod server;

pub use server::{JavaLanguageServer, LspClient};
