/// LSP server trait implementation.
///
/// This module contains the `impl LanguageServer for Backend` block,
/// which handles the protocol messages the server supports (initialize,
/// document sync, configuration changes, definition and workspace symbol
/// requests).
use std::path::PathBuf;

use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::config::{PartialSettings, SETTINGS_SECTION};
use crate::types::{ClientSupport, OpenDocument};

/// Pick the workspace root: the first workspace folder, else `rootUri`.
#[allow(deprecated)]
fn workspace_root_from(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

fn client_support_from(capabilities: &ClientCapabilities) -> ClientSupport {
    let definition = capabilities
        .text_document
        .as_ref()
        .and_then(|t| t.definition.as_ref());
    ClientSupport {
        dynamic_definition: definition
            .and_then(|d| d.dynamic_registration)
            .unwrap_or(false),
        link_support: definition.and_then(|d| d.link_support).unwrap_or(false),
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace_root = workspace_root_from(&params);
        *self.workspace_root.lock() = workspace_root.clone();

        let client_layer = match params.initialization_options.as_ref() {
            Some(options) => PartialSettings::from_lsp_value(options).unwrap_or_else(|e| {
                tracing::warn!("ignoring initializationOptions: {e}");
                PartialSettings::default()
            }),
            None => PartialSettings::default(),
        };
        self.reload_settings(workspace_root.as_deref(), &client_layer);

        let support = client_support_from(&params.capabilities);
        *self.client_support.lock() = support;

        // Without dynamic registration the capability is decided once, here.
        let definition_provider = (!support.dynamic_definition
            && !self.settings().enabled_languages.is_empty())
        .then_some(OneOf::Left(true));

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                definition_provider,
                workspace_symbol_provider: Some(OneOf::Left(true)),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.sync_definition_registration().await;

        let settings = self.settings();
        match self.workspace_root() {
            Some(root) if settings.index_workspace => {
                self.log(
                    MessageType::INFO,
                    format!("SymDef initialized! Indexing {}", root.display()),
                )
                .await;
                self.spawn_workspace_scan(root, settings.max_file_size);
            }
            _ => {
                self.log(MessageType::INFO, "SymDef initialized!".to_string())
                    .await;
            }
        }
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let mut layer = match PartialSettings::from_lsp_value(&params.settings) {
            Ok(layer) => layer,
            Err(e) => {
                self.log(MessageType::WARNING, format!("Ignoring settings: {}", e))
                    .await;
                return;
            }
        };

        // Pull-model clients send an empty notification and expect us to ask.
        if layer == PartialSettings::default()
            && let Some(client) = &self.client
        {
            let item = ConfigurationItem {
                scope_uri: None,
                section: Some(SETTINGS_SECTION.to_string()),
            };
            match client.configuration(vec![item]).await {
                Ok(values) => {
                    if let Some(value) = values.first() {
                        layer = PartialSettings::from_lsp_value(value).unwrap_or_else(|e| {
                            tracing::warn!("ignoring pulled settings: {e}");
                            PartialSettings::default()
                        });
                    }
                }
                Err(e) => tracing::debug!("workspace/configuration unavailable: {e}"),
            }
        }

        self.apply_client_settings(&layer);
        self.sync_definition_registration().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;

        self.workspace_index.update_document(&doc.uri, &doc.text);
        self.open_files.lock().insert(
            doc.uri.clone(),
            OpenDocument {
                text: doc.text,
                language_id: doc.language_id,
                version: doc.version,
            },
        );

        self.log(MessageType::LOG, format!("Opened file: {}", doc.uri))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // Full sync: the last change carries the whole document.
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };

        let mut open_files = self.open_files.lock();
        let Some(doc) = open_files.get_mut(&uri) else {
            tracing::debug!("ignoring change to unopened document {uri}");
            return;
        };
        self.workspace_index.update_document(&uri, &change.text);
        doc.text = change.text;
        doc.version = params.text_document.version;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        self.open_files.lock().remove(&uri);

        // Closing falls back to the on-disk copy, which means file I/O.
        let index = self.workspace_index.clone();
        let closed = uri.clone();
        if let Err(e) =
            tokio::task::spawn_blocking(move || index.close_document(&closed)).await
        {
            tracing::warn!("re-indexing closed document failed: {e}");
        }

        self.log(MessageType::LOG, format!("Closed file: {}", uri))
            .await;
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        tracing::debug!(
            "textDocument/definition uri={} pos={}:{}",
            uri,
            position.line,
            position.character
        );

        match self.resolve_definition(&uri, position).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!("definition lookup failed: {e}");
                self.log(MessageType::ERROR, format!("Definition lookup failed: {}", e))
                    .await;
                let mut error = Error::internal_error();
                error.message = e.to_string().into();
                Err(error)
            }
        }
    }

    async fn symbol(
        &self,
        params: WorkspaceSymbolParams,
    ) -> Result<Option<Vec<SymbolInformation>>> {
        let symbols = self.index.search(&params.query).await.map_err(|e| {
            let mut error = Error::internal_error();
            error.message = e.to_string().into();
            error
        })?;

        if symbols.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            symbols
                .iter()
                .map(|symbol| symbol.to_symbol_information())
                .collect(),
        ))
    }
}
