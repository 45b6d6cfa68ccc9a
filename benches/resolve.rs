//! Benchmarks for the definition resolver.
//!
//! The interesting cost is filtering a large index answer, so the index
//! here returns thousands of records of mixed kinds for every query.
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use symdef_lsp::definition::{DefinitionQuery, ResolverVariant, resolve, select_candidates};
use symdef_lsp::index::{IndexError, SymbolIndex};
use symdef_lsp::types::SymbolRecord;
use tower_lsp::lsp_types::*;

struct FixedIndex(Vec<SymbolRecord>);

#[tower_lsp::async_trait]
impl SymbolIndex for FixedIndex {
    async fn search(&self, _query: &str) -> Result<Vec<SymbolRecord>, IndexError> {
        Ok(self.0.clone())
    }
}

fn workspace_symbols(count: usize) -> Vec<SymbolRecord> {
    let uri = Url::parse("file:///workspace/big.ts").unwrap();
    (0..count)
        .map(|i| {
            let kind = if i % 3 == 0 {
                SymbolKind::CLASS
            } else {
                SymbolKind::METHOD
            };
            let line = i as u32;
            SymbolRecord::new(
                format!("handler{i}"),
                kind,
                Location {
                    uri: uri.clone(),
                    range: Range::new(Position::new(line, 4), Position::new(line, 14)),
                },
            )
        })
        .collect()
}

fn bench_select_candidates(c: &mut Criterion) {
    let symbols = workspace_symbols(10_000);
    let query = DefinitionQuery {
        word: "handler42",
        line_text: "router.on('x', handler42);",
        position: Position::new(0, 18),
    };

    c.bench_function("select_candidates_10k", |b| {
        b.iter(|| select_candidates(black_box(&symbols), &query, ResolverVariant::Strict))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let index = FixedIndex(workspace_symbols(10_000));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let query = DefinitionQuery {
        word: "handler4",
        line_text: "router.on('x', handler4);",
        position: Position::new(0, 18),
    };

    c.bench_function("resolve_strict_10k", |b| {
        b.iter(|| runtime.block_on(resolve(black_box(&query), ResolverVariant::Strict, &index)))
    });
}

criterion_group!(benches, bench_select_candidates, bench_resolve);
criterion_main!(benches);
