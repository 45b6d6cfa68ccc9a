#![allow(dead_code)]

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use symdef_lsp::Backend;
use symdef_lsp::index::{IndexError, SymbolIndex};
use symdef_lsp::types::SymbolRecord;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

pub fn create_test_backend() -> Backend {
    Backend::new_test()
}

/// An index that returns the same records for every query and counts how
/// often it was asked.
pub struct StaticIndex {
    symbols: Vec<SymbolRecord>,
    calls: AtomicUsize,
}

impl StaticIndex {
    pub fn new(symbols: Vec<SymbolRecord>) -> Self {
        Self {
            symbols,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[tower_lsp::async_trait]
impl SymbolIndex for StaticIndex {
    async fn search(&self, _query: &str) -> Result<Vec<SymbolRecord>, IndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.symbols.clone())
    }
}

/// An index whose backend is gone.
pub struct FailingIndex;

#[tower_lsp::async_trait]
impl SymbolIndex for FailingIndex {
    async fn search(&self, _query: &str) -> Result<Vec<SymbolRecord>, IndexError> {
        Err(IndexError::Unavailable("index offline".to_string()))
    }
}

pub fn range(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Range {
    Range {
        start: Position::new(start_line, start_char),
        end: Position::new(end_line, end_char),
    }
}

pub fn symbol(name: &str, kind: SymbolKind, uri: &str, line: u32) -> SymbolRecord {
    let len = name.encode_utf16().count() as u32;
    SymbolRecord::new(
        name,
        kind,
        Location {
            uri: Url::parse(uri).unwrap(),
            range: range(line, 4, line, 4 + len),
        },
    )
}

pub fn method(name: &str, line: u32) -> SymbolRecord {
    symbol(name, SymbolKind::METHOD, "file:///workspace/lib.ts", line)
}

/// Initialize params for a client that supports `LocationLink`s but not
/// dynamic registration, with `options` as `initializationOptions`.
pub fn initialize_params(options: serde_json::Value) -> InitializeParams {
    InitializeParams {
        initialization_options: Some(options),
        capabilities: ClientCapabilities {
            text_document: Some(TextDocumentClientCapabilities {
                definition: Some(GotoCapability {
                    dynamic_registration: Some(false),
                    link_support: Some(true),
                }),
                ..TextDocumentClientCapabilities::default()
            }),
            ..ClientCapabilities::default()
        },
        ..InitializeParams::default()
    }
}

/// A backend searching `symbols`, initialized with `languages` enabled.
pub async fn backend_with_symbols(
    symbols: Vec<SymbolRecord>,
    languages: &[&str],
) -> (Backend, Arc<StaticIndex>) {
    let index = Arc::new(StaticIndex::new(symbols));
    let backend = Backend::new_test_with_index(index.clone());
    backend
        .initialize(initialize_params(
            serde_json::json!({ "enabledLanguages": languages }),
        ))
        .await
        .unwrap();
    (backend, index)
}

pub async fn open_document(backend: &Backend, uri: &str, language_id: &str, text: &str) -> Url {
    let uri = Url::parse(uri).unwrap();
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: language_id.to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
    uri
}

pub fn definition_params(uri: &Url, line: u32, character: u32) -> GotoDefinitionParams {
    GotoDefinitionParams {
        text_document_position_params: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position: Position { line, character },
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
    }
}

/// Unwrap a `Link` response into its links.
pub fn expect_links(response: Option<GotoDefinitionResponse>) -> Vec<LocationLink> {
    match response {
        Some(GotoDefinitionResponse::Link(links)) => links,
        other => panic!("expected a LocationLink response, got {:?}", other),
    }
}

/// Create a temp directory containing `files`.
pub fn create_workspace(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (rel_path, content) in files {
        let full = dir.path().join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
    }
    dir
}
