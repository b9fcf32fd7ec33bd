use java_parser::java::ast::{Declaration, SyntaxNode, SyntaxTree};
use lsp_types::CompletionItemKind;

/// Describes a completion candidate that can be translated into protocol specific items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub detail: Option<String>,
    pub kind: CompletionItemKind,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// One candidate per declaration in the file, in document order. Duplicate names are kept.
pub fn completion_items(tree: &SyntaxTree) -> Vec<CompletionCandidate> {
    tree.nodes()
        .iter()
        .filter_map(|node| match node {
            SyntaxNode::TypeDecl(declaration) => {
                Some(candidate(declaration, CompletionItemKind::CLASS))
            }
            SyntaxNode::MethodDecl(declaration) => {
                Some(candidate(declaration, CompletionItemKind::METHOD))
            }
            SyntaxNode::VarDecl(declaration) => {
                Some(candidate(declaration, CompletionItemKind::VARIABLE))
            }
            SyntaxNode::NameRef(_) => None,
        })
        .collect()
}

fn candidate(declaration: &Declaration, kind: CompletionItemKind) -> CompletionCandidate {
    CompletionCandidate::new(&declaration.name.text, kind).with_detail(declaration.flavor.as_str())
}
