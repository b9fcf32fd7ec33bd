//! Main module for java parsing functionality

pub mod ast;
pub mod lexing;
pub mod parsing;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
