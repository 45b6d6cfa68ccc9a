//! Textual declaration scanner.
//!
//! Recognises declarations by their introducing keyword rather than by
//! parsing, which keeps the index language-agnostic:
//!
//!   - `fn`, `def`, `func`, `function`, `sub` → `SymbolKind::METHOD`
//!   - `class` → `CLASS`, `struct` → `STRUCT`, `interface` / `trait` →
//!     `INTERFACE`, `enum` → `ENUM`
//!
//! Go receivers (`func (s *Server) Serve(`) are skipped over so the method
//! name is reported, not the receiver.  Keywords inside comments or string
//! literals are picked up too; the resolver is built to tolerate noise.
use std::sync::LazyLock;

use regex::Regex;
use tower_lsp::lsp_types::{Location, Position, Range, SymbolKind, Url};

use crate::text::byte_to_utf16;
use crate::types::SymbolRecord;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<kw>fn|def|func|function|sub|class|struct|interface|trait|enum)[ \t]+(?:\([^)\n]*\)[ \t]*)?(?P<name>[A-Za-z_$][\w$]*)",
    )
    .expect("declaration pattern is valid")
});

fn kind_for_keyword(keyword: &str) -> SymbolKind {
    match keyword {
        "class" => SymbolKind::CLASS,
        "struct" => SymbolKind::STRUCT,
        "interface" | "trait" => SymbolKind::INTERFACE,
        "enum" => SymbolKind::ENUM,
        _ => SymbolKind::METHOD,
    }
}

/// Byte offsets of line starts, used to turn match offsets into positions.
struct LineStarts(Vec<usize>);

impl LineStarts {
    /// `\n`, `\r\n` and a lone `\r` each end a line.
    fn new(content: &str) -> Self {
        let bytes = content.as_bytes();
        let mut starts = vec![0];
        starts.extend(
            memchr::memchr2_iter(b'\n', b'\r', bytes)
                .filter(|&at| !bytes[at..].starts_with(b"\r\n"))
                .map(|at| at + 1),
        );
        Self(starts)
    }

    fn position(&self, content: &str, offset: usize) -> Position {
        let line = self.0.partition_point(|&start| start <= offset) - 1;
        let start = self.0[line];
        Position::new(line as u32, byte_to_utf16(&content[start..], offset - start))
    }
}

/// Extract every recognised declaration in `content`, in source order.
pub fn scan(uri: &Url, content: &str) -> Vec<SymbolRecord> {
    let lines = LineStarts::new(content);
    DECLARATION
        .captures_iter(content)
        .filter_map(|caps| {
            let keyword = caps.name("kw")?;
            let name = caps.name("name")?;
            let range = Range {
                start: lines.position(content, name.start()),
                end: lines.position(content, name.end()),
            };
            Some(SymbolRecord::new(
                name.as_str(),
                kind_for_keyword(keyword.as_str()),
                Location {
                    uri: uri.clone(),
                    range,
                },
            ))
        })
        .collect()
}
