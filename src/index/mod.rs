/// Workspace symbol search.
///
/// The definition resolver treats symbol search as an opaque collaborator:
/// it hands a query to a [`SymbolIndex`] and filters whatever comes back.
/// Nothing in the resolver depends on how an index matches names or in
/// which order it returns them.
///
/// - [`scanner`]: Textual declaration scanner that turns a file's contents
///   into [`SymbolRecord`]s without parsing the language.
/// - [`workspace`]: The in-memory [`WorkspaceIndex`] the server ships with,
///   fed by a workspace walk on start-up and by open documents.
use std::path::PathBuf;

use thiserror::Error;

use crate::types::SymbolRecord;

pub mod scanner;
mod workspace;

pub use workspace::WorkspaceIndex;

/// Errors raised by a symbol index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },
    #[error("symbol index unavailable: {0}")]
    Unavailable(String),
}

/// A searchable collection of workspace symbols.
#[tower_lsp::async_trait]
pub trait SymbolIndex: Send + Sync {
    /// Return every symbol the index considers related to `query`.
    async fn search(&self, query: &str) -> Result<Vec<SymbolRecord>, IndexError>;
}
