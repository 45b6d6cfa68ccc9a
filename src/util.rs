/// Helper methods on `Backend`.
///
/// This module contains accessors for shared state, client logging,
/// settings reloads, definition-provider registration and the start-up
/// workspace scan.
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::config::{DEFINITION_REGISTRATION_ID, PartialSettings, Settings};
use crate::types::{ClientSupport, OpenDocument};

impl Backend {
    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }

    /// A snapshot of an open document.
    pub fn document(&self, uri: &Url) -> Option<OpenDocument> {
        self.open_files.lock().get(uri).cloned()
    }

    /// A snapshot of the effective settings.
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub(crate) fn client_support(&self) -> ClientSupport {
        *self.client_support.lock()
    }

    pub(crate) fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.lock().clone()
    }

    /// Number of symbols in the built-in workspace index.
    pub fn indexed_symbol_count(&self) -> usize {
        self.workspace_index.len()
    }

    /// Whether the dynamic definition registration is active.
    pub fn is_definition_registered(&self) -> bool {
        self.definition_registered.load(Ordering::SeqCst)
    }

    /// Rebuild settings from the file layers, the command-line layer and
    /// finally `client_layer`.
    pub(crate) fn reload_settings(
        &self,
        workspace_root: Option<&Path>,
        client_layer: &PartialSettings,
    ) {
        let mut settings = Settings::from_files(workspace_root, &self.overrides);
        settings.merge(client_layer);
        tracing::debug!(
            settings = %serde_json::to_string(&settings).unwrap_or_default(),
            "settings reloaded"
        );
        *self.settings.write() = settings;
    }

    /// Apply a `workspace/didChangeConfiguration` layer on top of the
    /// current settings.
    pub(crate) fn apply_client_settings(&self, layer: &PartialSettings) {
        self.settings.write().merge(layer);
    }

    /// Bring the client-side registration in line with the settings.
    ///
    /// Only used when the client supports dynamic registration.  Any
    /// existing registration is dropped first so a changed language list
    /// takes effect; an empty list leaves the provider unregistered.
    pub(crate) async fn sync_definition_registration(&self) {
        if !self.client_support().dynamic_definition {
            return;
        }
        let Some(client) = &self.client else {
            return;
        };

        if self.definition_registered.swap(false, Ordering::SeqCst) {
            let unregistration = Unregistration {
                id: DEFINITION_REGISTRATION_ID.to_string(),
                method: "textDocument/definition".to_string(),
            };
            if let Err(e) = client.unregister_capability(vec![unregistration]).await {
                tracing::warn!("failed to unregister definition provider: {e}");
            }
        }

        let Some(registration) = self.settings().definition_registration() else {
            tracing::info!("no enabled languages; definition provider not registered");
            return;
        };
        match client.register_capability(vec![registration]).await {
            Ok(()) => {
                self.definition_registered.store(true, Ordering::SeqCst);
                tracing::info!("definition provider registered");
            }
            Err(e) => tracing::warn!("failed to register definition provider: {e}"),
        }
    }

    /// Index the workspace on a blocking thread.  Requests keep being
    /// served while the scan runs.
    pub(crate) fn spawn_workspace_scan(&self, root: PathBuf, max_file_size: u64) {
        let index = self.workspace_index.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let scan_root = root.clone();
            let scanned = tokio::task::spawn_blocking(move || {
                let files = index.index_workspace(&scan_root, max_file_size);
                (files, index.len())
            })
            .await;

            let message = match scanned {
                Ok((files, symbols)) => {
                    tracing::info!(files, symbols, "workspace indexed");
                    format!(
                        "SymDef indexed {} symbol(s) in {} file(s) under {}",
                        symbols,
                        files,
                        root.display()
                    )
                }
                Err(e) => {
                    tracing::warn!("workspace scan failed: {e}");
                    format!("SymDef workspace scan failed: {e}")
                }
            };
            if let Some(client) = client {
                client.log_message(MessageType::INFO, message).await;
            }
        });
    }
}
