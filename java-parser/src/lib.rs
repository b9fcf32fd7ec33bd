//! # java-parser
//!
//! A shallow, declaration-level parser for Java source.
//!
//! File Layout
//!
//!     src/java
//!       ├── lexing     Tokenization (logos) and lexical problems
//!       ├── parsing    Declaration parser, import checks, the SyntaxProvider seam
//!       └── ast        Syntax tree, problems, and position/offset conversion
//!
//!     The contract is: Java source in, [`SyntaxTree`](java::ast::SyntaxTree) out. Parsing never
//!     fails; everything that is wrong with the input is reported as a
//!     [`Problem`](java::ast::Problem) inside the tree.

pub mod java;
