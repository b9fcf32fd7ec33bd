use java_parser::java::ast::{Declaration, Flavor, Span, SyntaxTree};
use lsp_types::SymbolKind;

#[derive(Debug, Clone, PartialEq)]
pub struct JavaDocumentSymbol {
    pub name: String,
    pub detail: Option<String>,
    pub kind: SymbolKind,
    pub span: Span,
    pub selection_span: Span,
    pub children: Vec<JavaDocumentSymbol>,
}

/// Outline of types and their members. Nesting follows span containment; locals and
/// parameters are left out.
pub fn document_symbols(tree: &SyntaxTree) -> Vec<JavaDocumentSymbol> {
    let mut roots = Vec::new();
    let mut open: Vec<JavaDocumentSymbol> = Vec::new();

    for symbol in tree.declarations().filter_map(outline_symbol) {
        while open
            .last()
            .is_some_and(|parent| !contains(&parent.span, &symbol.span))
        {
            close_innermost(&mut open, &mut roots);
        }
        open.push(symbol);
    }
    while !open.is_empty() {
        close_innermost(&mut open, &mut roots);
    }
    roots
}

fn close_innermost(open: &mut Vec<JavaDocumentSymbol>, roots: &mut Vec<JavaDocumentSymbol>) {
    if let Some(done) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

fn contains(outer: &Span, inner: &Span) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

fn outline_symbol(declaration: &Declaration) -> Option<JavaDocumentSymbol> {
    let kind = match declaration.flavor {
        Flavor::Class => SymbolKind::CLASS,
        Flavor::Interface | Flavor::Annotation => SymbolKind::INTERFACE,
        Flavor::Enum => SymbolKind::ENUM,
        Flavor::Record => SymbolKind::STRUCT,
        Flavor::Method => SymbolKind::METHOD,
        Flavor::Constructor => SymbolKind::CONSTRUCTOR,
        Flavor::Field => SymbolKind::FIELD,
        Flavor::EnumConstant => SymbolKind::ENUM_MEMBER,
        Flavor::Local | Flavor::Parameter => return None,
    };
    Some(JavaDocumentSymbol {
        name: declaration.name.text.clone(),
        detail: Some(declaration.flavor.as_str().to_string()),
        kind,
        span: declaration.span.clone(),
        selection_span: declaration.name.span.clone(),
        children: Vec::new(),
    })
}
