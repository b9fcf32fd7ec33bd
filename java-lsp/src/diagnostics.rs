//! Problems to published diagnostics

use java_config::DiagnosticsConfig;
use java_parser::java::ast::{Severity, SourceIndex, SyntaxTree};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity};

use crate::convert::to_lsp_range;

/// Full replacement set for one document. Warnings are dropped when the configuration says so.
pub fn to_diagnostics(text: &str, tree: &SyntaxTree, config: &DiagnosticsConfig) -> Vec<Diagnostic> {
    let index = SourceIndex::new(text);
    tree.problems()
        .iter()
        .filter(|problem| config.publish_warnings || problem.is_error())
        .map(|problem| Diagnostic {
            range: to_lsp_range(&index, &problem.span),
            severity: Some(match problem.severity {
                Severity::Error => DiagnosticSeverity::ERROR,
                Severity::Warning => DiagnosticSeverity::WARNING,
            }),
            source: Some(config.source.clone()),
            message: problem.message.clone(),
            ..Diagnostic::default()
        })
        .collect()
}
