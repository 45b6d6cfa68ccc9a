//! SymDef: go-to-definition for method calls from a workspace symbol index.
//!
//! The server keeps open documents and a lightweight workspace symbol
//! index.  On a definition request it takes the word under the cursor,
//! searches the index, and keeps the methods that plausibly match (see
//! [`definition`]).
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use parking_lot::{Mutex, RwLock};
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

pub mod config;
pub mod definition;
pub mod index;
pub mod logging;
mod server;
pub mod text;
pub mod types;
mod util;

use config::{PartialSettings, Settings};
use index::{SymbolIndex, WorkspaceIndex};
use types::{ClientSupport, OpenDocument};

pub struct Backend {
    name: String,
    version: String,
    /// Open documents keyed by URI (full text sync).
    open_files: Arc<Mutex<HashMap<Url, OpenDocument>>>,
    /// Effective settings after all layers were applied.
    settings: Arc<RwLock<Settings>>,
    /// Layer supplied on the command line, re-applied whenever the file
    /// layers are reloaded.
    overrides: PartialSettings,
    workspace_root: Arc<Mutex<Option<PathBuf>>>,
    /// The index fed by open documents and the workspace scan.
    workspace_index: Arc<WorkspaceIndex>,
    /// The index definition requests search.  Normally the same object as
    /// `workspace_index`.
    index: Arc<dyn SymbolIndex>,
    client_support: Mutex<ClientSupport>,
    /// Whether the dynamic definition registration is currently active.
    definition_registered: AtomicBool,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client, overrides: PartialSettings) -> Self {
        Self::build(Some(client), overrides, None)
    }

    /// A backend without a client, for tests.  Logging to the client is a
    /// no-op and no settings files are read until `initialize`.
    pub fn new_test() -> Self {
        Self::build(None, PartialSettings::default(), None)
    }

    /// Like [`Backend::new_test`], but definition requests search `index`
    /// instead of the built-in workspace index.
    pub fn new_test_with_index(index: Arc<dyn SymbolIndex>) -> Self {
        Self::build(None, PartialSettings::default(), Some(index))
    }

    fn build(
        client: Option<Client>,
        overrides: PartialSettings,
        index: Option<Arc<dyn SymbolIndex>>,
    ) -> Self {
        let workspace_index = Arc::new(WorkspaceIndex::new());
        let index: Arc<dyn SymbolIndex> = match index {
            Some(index) => index,
            None => workspace_index.clone(),
        };

        let mut settings = Settings::default();
        settings.merge(&overrides);

        Self {
            name: "SymDef".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: Arc::new(Mutex::new(HashMap::new())),
            settings: Arc::new(RwLock::new(settings)),
            overrides,
            workspace_root: Arc::new(Mutex::new(None)),
            workspace_index,
            index,
            client_support: Mutex::new(ClientSupport::default()),
            definition_registered: AtomicBool::new(false),
            client,
        }
    }
}
