//! In-memory workspace symbol index.
//!
//! Symbols are grouped per document URI.  Files on disk are scanned once
//! during start-up; open documents replace their on-disk entry while they
//! are open and fall back to the disk version when closed.
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use parking_lot::RwLock;
use tower_lsp::lsp_types::Url;

use super::{IndexError, SymbolIndex, scanner};
use crate::types::SymbolRecord;

#[derive(Default)]
struct Inner {
    /// Symbols per document.  A `BTreeMap` keeps search results in a stable
    /// order across identical requests.
    symbols: BTreeMap<Url, Vec<SymbolRecord>>,
    /// Documents currently owned by the client.  Disk scans never
    /// overwrite these.
    open: HashSet<Url>,
}

#[derive(Default)]
pub struct WorkspaceIndex {
    inner: RwLock<Inner>,
}

impl WorkspaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the text of an open document, replacing any previous entry.
    pub fn update_document(&self, uri: &Url, content: &str) {
        let symbols = scanner::scan(uri, content);
        let mut inner = self.inner.write();
        inner.open.insert(uri.clone());
        inner.symbols.insert(uri.clone(), symbols);
    }

    /// Forget the open version of a document.  The on-disk version is
    /// re-indexed when the URI maps to a readable file.
    pub fn close_document(&self, uri: &Url) {
        {
            let mut inner = self.inner.write();
            inner.open.remove(uri);
            inner.symbols.remove(uri);
        }
        if let Ok(path) = uri.to_file_path()
            && path.is_file()
            && let Err(e) = self.index_file(&path)
        {
            tracing::debug!("not re-indexing closed document: {e}");
        }
    }

    /// Scan one file from disk.  Returns the number of symbols found.
    ///
    /// Files currently open in the client are left untouched and report
    /// zero symbols.
    pub fn index_file(&self, path: &Path) -> Result<usize, IndexError> {
        let bytes = std::fs::read(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|_| IndexError::NotUtf8 {
            path: path.to_path_buf(),
        })?;
        let Ok(uri) = Url::from_file_path(path) else {
            return Ok(0);
        };
        let symbols = scanner::scan(&uri, &content);
        let count = symbols.len();

        let mut inner = self.inner.write();
        if inner.open.contains(&uri) {
            return Ok(0);
        }
        inner.symbols.insert(uri, symbols);
        Ok(count)
    }

    /// Walk `root` (honouring `.gitignore` and friends) and index every
    /// file no larger than `max_file_size` bytes.  Returns the number of
    /// files indexed.
    ///
    /// Unreadable and non-UTF-8 files are skipped.
    pub fn index_workspace(&self, root: &Path, max_file_size: u64) -> usize {
        let mut files = 0;
        for entry in ignore::WalkBuilder::new(root).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping walk entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if entry
                .metadata()
                .map(|m| m.len() > max_file_size)
                .unwrap_or(true)
            {
                continue;
            }
            match self.index_file(entry.path()) {
                Ok(_) => files += 1,
                Err(e) => tracing::debug!("skipping file: {e}"),
            }
        }
        files
    }

    /// Total number of indexed symbols.
    pub fn len(&self) -> usize {
        self.inner.read().symbols.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Case-insensitive substring search; an empty query matches all.
    fn matching(&self, query: &str) -> Vec<SymbolRecord> {
        let needle = query.to_lowercase();
        self.inner
            .read()
            .symbols
            .values()
            .flatten()
            .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[tower_lsp::async_trait]
impl SymbolIndex for WorkspaceIndex {
    async fn search(&self, query: &str) -> Result<Vec<SymbolRecord>, IndexError> {
        Ok(self.matching(query))
    }
}
