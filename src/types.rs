//! Data types shared between the symbol index and the definition resolver.

use tower_lsp::lsp_types::{Location, SymbolInformation, SymbolKind};

/// One entry returned by a [`SymbolIndex`](crate::index::SymbolIndex) search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    /// The declared name (e.g. "toString").
    pub name: String,
    /// Symbol classification.  Only `SymbolKind::METHOD` is a definition
    /// target for the resolver.
    pub kind: SymbolKind,
    /// Where the symbol is declared.
    pub location: Location,
    /// Enclosing symbol, when the index knows it.  Reported through
    /// `workspace/symbol` only.
    pub container_name: Option<String>,
}

impl SymbolRecord {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: Location) -> Self {
        Self {
            name: name.into(),
            kind,
            location,
            container_name: None,
        }
    }

    pub fn is_method(&self) -> bool {
        self.kind == SymbolKind::METHOD
    }

    #[allow(deprecated)]
    pub fn to_symbol_information(&self) -> SymbolInformation {
        SymbolInformation {
            name: self.name.clone(),
            kind: self.kind,
            tags: None,
            deprecated: None,
            location: self.location.clone(),
            container_name: self.container_name.clone(),
        }
    }
}

/// A document the client currently has open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub text: String,
    /// The client's language id (e.g. "typescript").
    pub language_id: String,
    pub version: i32,
}

/// What the connected client told us it can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSupport {
    /// The client accepts `client/registerCapability` for
    /// `textDocument/definition`.
    pub dynamic_definition: bool,
    /// The client understands `LocationLink` definition results.
    pub link_support: bool,
}

impl Default for ClientSupport {
    /// Before `initialize` nothing is known; assume a modern client.
    fn default() -> Self {
        Self {
            dynamic_definition: false,
            link_support: true,
        }
    }
}
