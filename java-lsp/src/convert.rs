//! Conversion between analysis results and protocol types

use java_analysis::{CompletionCandidate, JavaDocumentSymbol};
use java_parser::java::ast::{offset_of, Position as AstPosition, SourceIndex, Span};
use tower_lsp::lsp_types::{CompletionItem, DocumentSymbol, Position, Range};

pub fn to_lsp_position(position: AstPosition) -> Position {
    Position::new(position.line as u32, position.character as u32)
}

pub fn from_lsp_position(position: Position) -> AstPosition {
    AstPosition::new(position.line as usize, position.character as usize)
}

/// Byte offset in `text` for a wire position, clamped to the text
pub fn offset_at(text: &str, position: Position) -> usize {
    offset_of(text, from_lsp_position(position))
}

pub fn to_lsp_range(index: &SourceIndex<'_>, span: &Span) -> Range {
    let (start, end) = index.range(span);
    Range {
        start: to_lsp_position(start),
        end: to_lsp_position(end),
    }
}

pub fn to_completion_item(candidate: CompletionCandidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label,
        kind: Some(candidate.kind),
        detail: candidate.detail,
        ..CompletionItem::default()
    }
}

#[allow(deprecated)]
pub fn to_document_symbol(index: &SourceIndex<'_>, symbol: &JavaDocumentSymbol) -> DocumentSymbol {
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind,
        deprecated: None,
        range: to_lsp_range(index, &symbol.span),
        selection_range: to_lsp_range(index, &symbol.selection_span),
        children: if symbol.children.is_empty() {
            None
        } else {
            Some(
                symbol
                    .children
                    .iter()
                    .map(|child| to_document_symbol(index, child))
                    .collect(),
            )
        },
        tags: None,
    }
}
