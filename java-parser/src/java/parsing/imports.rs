//! Unused import detection
//!
//! An import counts as used when its simple name appears as a name reference anywhere in the
//! file. On-demand imports are never reported.

use super::parser::ImportDecl;
use crate::java::ast::{Problem, SyntaxNode};
use std::collections::HashSet;

pub(crate) fn unused_imports(imports: &[ImportDecl], nodes: &[SyntaxNode]) -> Vec<Problem> {
    let referenced: HashSet<&str> = nodes
        .iter()
        .filter_map(|node| match node {
            SyntaxNode::NameRef(identifier) => Some(identifier.text.as_str()),
            _ => None,
        })
        .collect();

    imports
        .iter()
        .filter(|import| !import.on_demand)
        .filter(|import| !referenced.contains(import.simple_name.as_str()))
        .map(|import| {
            Problem::warning(
                format!("The import {} is never used", import.path),
                import.span.clone(),
            )
        })
        .collect()
}
