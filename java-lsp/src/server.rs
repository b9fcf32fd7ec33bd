//! Main language server implementation

use std::sync::Arc;

use crate::convert::{offset_at, to_completion_item, to_document_symbol, to_lsp_range};
use crate::diagnostics::to_diagnostics;
use crate::documents::DocumentStore;
use java_analysis::{completion_items, definition, document_symbols, hover};
use java_config::JavaLspConfig;
use java_parser::java::ast::{SourceIndex, SyntaxTree};
use java_parser::java::parsing::{JavaSyntaxProvider, SyntaxProvider};
use serde_json::Value;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionOptions, CompletionParams, CompletionResponse, Diagnostic,
    DidChangeConfigurationParams, DidChangeTextDocumentParams, DidChangeWatchedFilesParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DidSaveTextDocumentParams,
    DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse, ExecuteCommandParams,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverContents, HoverParams,
    HoverProviderCapability, InitializeParams, InitializeResult, InitializedParams, Location,
    MarkupContent, MarkupKind, OneOf, SaveOptions, ServerCapabilities, ServerInfo,
    TextDocumentItem, TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions, Url,
};
use tower_lsp::Client;
use tracing::{debug, info, warn};

/// The part of the client the server talks back to
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    );
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    ) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }
}

pub struct JavaLanguageServer<C = Client, S = JavaSyntaxProvider> {
    client: C,
    documents: DocumentStore,
    syntax: Arc<S>,
    config: JavaLspConfig,
}

impl JavaLanguageServer<Client, JavaSyntaxProvider> {
    pub fn new(client: Client, config: JavaLspConfig) -> Self {
        Self::with_syntax(client, Arc::new(JavaSyntaxProvider), config)
    }
}

impl<C, S> JavaLanguageServer<C, S>
where
    C: LspClient,
    S: SyntaxProvider,
{
    pub fn with_syntax(client: C, syntax: Arc<S>, config: JavaLspConfig) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            syntax,
            config,
        }
    }

    /// Parse `text` and push its full diagnostic set
    async fn publish(&self, uri: Url, text: &str, version: Option<i32>) {
        let tree = self.syntax.parse(text);
        let diagnostics = to_diagnostics(text, &tree, &self.config.diagnostics);
        debug!(%uri, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }

    /// Stored text and a fresh tree for it
    async fn parsed(&self, uri: &Url) -> Option<(Arc<String>, SyntaxTree)> {
        let text = self.documents.get(uri).await?;
        let tree = self.syntax.parse(&text);
        Some((text, tree))
    }
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(true),
                })),
                ..TextDocumentSyncOptions::default()
            },
        )),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(true),
            ..CompletionOptions::default()
        }),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        definition_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        ..ServerCapabilities::default()
    }
}

#[async_trait]
impl<C, S> tower_lsp::LanguageServer for JavaLanguageServer<C, S>
where
    C: LspClient,
    S: SyntaxProvider,
{
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!(
            client = params.client_info.as_ref().map(|info| info.name.as_str()),
            "initialize"
        );
        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: self.config.server.name.clone(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("client initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        let open = self.documents.len().await;
        info!(open, "shutdown");
        self.documents.clear().await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        debug!(%uri, version, "did_open");
        let text = self.documents.put(uri.clone(), text).await;
        self.publish(uri, &text, Some(version)).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let Some(change) = params.content_changes.into_iter().last() else {
            debug!(%uri, version, "did_change without content");
            return;
        };
        debug!(%uri, version, "did_change");
        let text = self.documents.put(uri.clone(), change.text).await;
        self.publish(uri, &text, Some(version)).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(stored) = self.documents.get(&uri).await else {
            debug!(%uri, "did_save for a document that is not open");
            return;
        };
        debug!(%uri, with_text = params.text.is_some(), "did_save");
        let text = match params.text {
            Some(text) => self.documents.put(uri.clone(), text).await,
            None => stored,
        };
        self.publish(uri, &text, None).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(%uri, "did_close");
        self.documents.remove(&uri).await;
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, _: DidChangeConfigurationParams) {
        debug!("ignoring configuration change");
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        debug!(count = params.changes.len(), "ignoring watched file changes");
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        debug!(%uri, "completion");
        let items = match self.parsed(uri).await {
            Some((_, tree)) => completion_items(&tree)
                .into_iter()
                .map(to_completion_item)
                .collect(),
            None => Vec::new(),
        };
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(item)
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position_params = params.text_document_position_params;
        let uri = &position_params.text_document.uri;
        debug!(%uri, position = ?position_params.position, "hover");
        let Some((text, tree)) = self.parsed(uri).await else {
            return Ok(None);
        };
        let offset = offset_at(&text, position_params.position);
        Ok(hover(&tree, offset).map(|result| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::PlainText,
                value: result.contents,
            }),
            range: Some(to_lsp_range(&SourceIndex::new(&text), &result.span)),
        }))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let position_params = params.text_document_position_params;
        let uri = position_params.text_document.uri;
        debug!(%uri, position = ?position_params.position, "goto_definition");
        let Some((text, tree)) = self.parsed(&uri).await else {
            return Ok(None);
        };
        let offset = offset_at(&text, position_params.position);
        Ok(definition(&tree, offset).map(|target| {
            let range = to_lsp_range(&SourceIndex::new(&text), &target.selection_span);
            GotoDefinitionResponse::Scalar(Location::new(uri, range))
        }))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = &params.text_document.uri;
        debug!(%uri, "document_symbol");
        let Some((text, tree)) = self.parsed(uri).await else {
            return Ok(None);
        };
        let index = SourceIndex::new(&text);
        let symbols: Vec<DocumentSymbol> = document_symbols(&tree)
            .iter()
            .map(|symbol| to_document_symbol(&index, symbol))
            .collect();
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        warn!(command = %params.command, "no commands are supported");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use java_parser::java::parsing::parse_compilation_unit;
    use java_parser::java::testing::{FOO_BAR_X, SHADOWED_BAR, SHAPES, UNCLOSED};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower_lsp::lsp_types::{
        CompletionItemKind, DiagnosticSeverity, Position, Range, TextDocumentContentChangeEvent,
        TextDocumentIdentifier, TextDocumentPositionParams, VersionedTextDocumentIdentifier,
    };
    use tower_lsp::LanguageServer;

    type Publication = (Url, Vec<Diagnostic>, Option<i32>);

    #[derive(Clone, Default)]
    struct RecordingClient {
        published: Arc<Mutex<Vec<Publication>>>,
    }

    impl RecordingClient {
        fn publications(&self) -> Vec<Publication> {
            self.published.lock().unwrap().clone()
        }

        fn last(&self) -> Publication {
            self.publications().pop().expect("something was published")
        }
    }

    #[async_trait]
    impl LspClient for RecordingClient {
        async fn publish_diagnostics(
            &self,
            uri: Url,
            diagnostics: Vec<Diagnostic>,
            version: Option<i32>,
        ) {
            self.published
                .lock()
                .unwrap()
                .push((uri, diagnostics, version));
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        parses: AtomicUsize,
    }

    impl SyntaxProvider for CountingProvider {
        fn parse(&self, source: &str) -> SyntaxTree {
            self.parses.fetch_add(1, Ordering::SeqCst);
            parse_compilation_unit(source)
        }
    }

    type TestServer = JavaLanguageServer<RecordingClient, CountingProvider>;

    fn server_with(config: JavaLspConfig) -> (TestServer, RecordingClient, Arc<CountingProvider>) {
        let client = RecordingClient::default();
        let provider = Arc::new(CountingProvider::default());
        let server = JavaLanguageServer::with_syntax(client.clone(), provider.clone(), config);
        (server, client, provider)
    }

    fn server() -> (TestServer, RecordingClient, Arc<CountingProvider>) {
        server_with(java_config::load_defaults().unwrap())
    }

    fn sample_uri() -> Url {
        Url::parse("file:///Sample.java").unwrap()
    }

    async fn open(server: &TestServer, text: &str) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: sample_uri(),
                    language_id: "java".into(),
                    version: 1,
                    text: text.to_string(),
                },
            })
            .await;
    }

    async fn change(server: &TestServer, version: i32, texts: &[&str]) {
        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: sample_uri(),
                    version,
                },
                content_changes: texts
                    .iter()
                    .map(|text| TextDocumentContentChangeEvent {
                        range: None,
                        range_length: None,
                        text: text.to_string(),
                    })
                    .collect(),
            })
            .await;
    }

    async fn save(server: &TestServer, uri: Url, text: Option<&str>) {
        server
            .did_save(DidSaveTextDocumentParams {
                text_document: TextDocumentIdentifier { uri },
                text: text.map(str::to_string),
            })
            .await;
    }

    fn at(position: Position) -> TextDocumentPositionParams {
        TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: sample_uri() },
            position,
        }
    }

    async fn completion_labels(server: &TestServer) -> Vec<(String, Option<CompletionItemKind>)> {
        let response = server
            .completion(CompletionParams {
                text_document_position: at(Position::new(0, 0)),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
                context: None,
            })
            .await
            .unwrap();
        match response {
            Some(CompletionResponse::Array(items)) => items
                .into_iter()
                .map(|item| (item.label, item.kind))
                .collect(),
            other => panic!("unexpected completion response: {other:?}"),
        }
    }

    async fn hover_text(server: &TestServer, position: Position) -> Option<(String, Option<Range>)> {
        let hover = server
            .hover(HoverParams {
                text_document_position_params: at(position),
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()?;
        match hover.contents {
            HoverContents::Markup(content) => {
                assert_eq!(content.kind, MarkupKind::PlainText);
                Some((content.value, hover.range))
            }
            other => panic!("unexpected hover contents: {other:?}"),
        }
    }

    async fn definition_at(
        server: &TestServer,
        position: Position,
    ) -> Option<GotoDefinitionResponse> {
        server
            .goto_definition(GotoDefinitionParams {
                text_document_position_params: at(position),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn initialize_declares_capabilities() {
        let (server, _, _) = server();
        let result = server.initialize(InitializeParams::default()).await.unwrap();
        let capabilities = result.capabilities;
        assert_eq!(
            capabilities.text_document_sync,
            Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(true),
                })),
                ..TextDocumentSyncOptions::default()
            }))
        );
        assert_eq!(
            capabilities
                .completion_provider
                .and_then(|options| options.resolve_provider),
            Some(true)
        );
        assert!(capabilities.hover_provider.is_some());
        assert!(capabilities.definition_provider.is_some());
        assert!(capabilities.document_symbol_provider.is_some());
        let info = result.server_info.unwrap();
        assert_eq!(info.name, "java-lsp");
        assert_eq!(info.version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn open_publishes_errors_with_version() {
        let (server, client, _) = server();
        open(&server, UNCLOSED).await;

        let (uri, diagnostics, version) = client.last();
        assert_eq!(uri, sample_uri());
        assert_eq!(version, Some(1));
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|diagnostic| {
            diagnostic.severity == Some(DiagnosticSeverity::ERROR)
                && diagnostic.source.as_deref() == Some("java")
        }));
    }

    #[tokio::test]
    async fn close_clears_diagnostics_and_forgets_text() {
        let (server, client, _) = server();
        open(&server, UNCLOSED).await;
        assert!(definition_at(&server, Position::new(0, 7)).await.is_some());
        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
            })
            .await;

        assert_eq!(client.publications().len(), 2);
        assert_eq!(client.last(), (sample_uri(), Vec::new(), None));
        assert!(completion_labels(&server).await.is_empty());
        assert!(hover_text(&server, Position::new(0, 7)).await.is_none());
        assert_eq!(definition_at(&server, Position::new(0, 7)).await, None);
    }

    #[tokio::test]
    async fn completion_lists_declarations_in_order() {
        let (server, _, _) = server();
        open(&server, FOO_BAR_X).await;
        assert_eq!(
            completion_labels(&server).await,
            vec![
                ("Foo".to_string(), Some(CompletionItemKind::CLASS)),
                ("bar".to_string(), Some(CompletionItemKind::METHOD)),
                ("x".to_string(), Some(CompletionItemKind::VARIABLE)),
            ]
        );
    }

    #[tokio::test]
    async fn completion_resolve_returns_item_unchanged() {
        let (server, _, _) = server();
        let item = CompletionItem {
            label: "bar".into(),
            kind: Some(CompletionItemKind::METHOD),
            detail: Some("method".into()),
            ..CompletionItem::default()
        };
        assert_eq!(server.completion_resolve(item.clone()).await.unwrap(), item);
    }

    #[tokio::test]
    async fn hover_describes_declaration_under_cursor() {
        let (server, _, _) = server();
        open(&server, FOO_BAR_X).await;

        let (text, range) = hover_text(&server, Position::new(1, 10)).await.unwrap();
        assert_eq!(text, "method bar");
        assert_eq!(
            range,
            Some(Range::new(Position::new(1, 9), Position::new(1, 12)))
        );
        assert!(hover_text(&server, Position::new(4, 0)).await.is_none());
    }

    #[tokio::test]
    async fn hover_columns_are_utf16() {
        let (server, _, _) = server();
        open(&server, "class Café { void bar() {} }").await;

        let (text, range) = hover_text(&server, Position::new(0, 18)).await.unwrap();
        assert_eq!(text, "method bar");
        assert_eq!(
            range,
            Some(Range::new(Position::new(0, 18), Position::new(0, 21)))
        );
    }

    #[tokio::test]
    async fn definition_jumps_to_first_declaration_with_the_name() {
        let (server, _, _) = server();
        open(&server, SHADOWED_BAR).await;

        assert_eq!(
            definition_at(&server, Position::new(5, 28)).await,
            Some(GotoDefinitionResponse::Scalar(Location::new(
                sample_uri(),
                Range::new(Position::new(1, 8), Position::new(1, 11)),
            )))
        );
    }

    #[tokio::test]
    async fn document_symbols_are_nested() {
        let (server, _, _) = server();
        open(&server, FOO_BAR_X).await;

        let response = server
            .document_symbol(DocumentSymbolParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap();
        let Some(DocumentSymbolResponse::Nested(symbols)) = response else {
            panic!("expected nested symbols, got {response:?}");
        };
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "Foo");
        let children: Vec<_> = symbols[0]
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|child| child.name.as_str())
            .collect();
        assert_eq!(children, vec!["bar", "x"]);
    }

    #[tokio::test]
    async fn change_to_empty_text_empties_everything() {
        let (server, client, _) = server();
        open(&server, UNCLOSED).await;
        change(&server, 2, &[""]).await;

        assert_eq!(client.last(), (sample_uri(), Vec::new(), Some(2)));
        assert!(completion_labels(&server).await.is_empty());
    }

    #[tokio::test]
    async fn only_the_last_change_is_applied() {
        let (server, client, _) = server();
        open(&server, "").await;
        change(&server, 2, &[UNCLOSED, FOO_BAR_X]).await;

        let (_, diagnostics, version) = client.last();
        assert!(diagnostics.is_empty());
        assert_eq!(version, Some(2));
        let labels: Vec<_> = completion_labels(&server)
            .await
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Foo", "bar", "x"]);
    }

    #[tokio::test]
    async fn change_without_content_is_ignored() {
        let (server, client, provider) = server();
        open(&server, FOO_BAR_X).await;
        change(&server, 2, &[]).await;

        assert_eq!(client.publications().len(), 1);
        assert_eq!(provider.parses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn save_without_text_reparses_stored_text() {
        let (server, client, provider) = server();
        open(&server, UNCLOSED).await;
        save(&server, sample_uri(), None).await;

        assert_eq!(provider.parses.load(Ordering::SeqCst), 2);
        let (_, diagnostics, version) = client.last();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(version, None);
    }

    #[tokio::test]
    async fn save_with_text_replaces_stored_text() {
        let (server, client, _) = server();
        open(&server, UNCLOSED).await;
        save(&server, sample_uri(), Some(FOO_BAR_X)).await;

        assert_eq!(client.last(), (sample_uri(), Vec::new(), None));
        assert_eq!(completion_labels(&server).await.len(), 3);
    }

    #[tokio::test]
    async fn saving_an_unknown_document_publishes_nothing() {
        let (server, client, provider) = server();
        let other = Url::parse("file:///Other.java").unwrap();
        save(&server, other.clone(), Some(UNCLOSED)).await;

        assert!(client.publications().is_empty());
        assert_eq!(provider.parses.load(Ordering::SeqCst), 0);
        assert!(server.documents.get(&other).await.is_none());
    }

    #[tokio::test]
    async fn warnings_can_be_suppressed() {
        let mut config = java_config::load_defaults().unwrap();
        config.diagnostics.publish_warnings = false;
        let (server, client, _) = server_with(config);
        open(&server, SHAPES).await;
        assert_eq!(client.last(), (sample_uri(), Vec::new(), Some(1)));
    }

    #[tokio::test]
    async fn warnings_are_published_by_default() {
        let (server, client, _) = server();
        open(&server, SHAPES).await;
        let (_, diagnostics, _) = client.last();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::WARNING));
    }

    #[tokio::test]
    async fn shutdown_clears_documents_and_is_idempotent() {
        let (server, _, _) = server();
        open(&server, FOO_BAR_X).await;

        server.shutdown().await.unwrap();
        server.shutdown().await.unwrap();

        assert!(server.documents.is_empty().await);
        assert!(completion_labels(&server).await.is_empty());
        assert!(hover_text(&server, Position::new(1, 10)).await.is_none());
    }

    #[tokio::test]
    async fn execute_command_is_a_no_op() {
        let (server, client, _) = server();
        let result = server
            .execute_command(ExecuteCommandParams {
                command: "java.organizeImports".into(),
                arguments: Vec::new(),
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap();
        assert_eq!(result, None);
        assert!(client.publications().is_empty());
    }

    #[tokio::test]
    async fn absent_documents_yield_empty_responses() {
        let (server, _, provider) = server();
        assert!(completion_labels(&server).await.is_empty());
        assert!(hover_text(&server, Position::new(0, 0)).await.is_none());
        let symbols = server
            .document_symbol(DocumentSymbolParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap();
        assert!(symbols.is_none());
        assert_eq!(provider.parses.load(Ordering::SeqCst), 0);
    }
}
