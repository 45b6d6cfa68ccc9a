/// Goto definition support.
///
/// This module answers `textDocument/definition` for method calls by
/// matching the word under the cursor against workspace symbols.  It is a
/// textual heuristic: no parsing, no types, no scopes.
///
/// - [`resolve`]: The core filter-and-bound pass.  Pure apart from the one
///   call into the [`SymbolIndex`](crate::index::SymbolIndex), so it can be
///   tested without a client.
/// - [`handler`]: Request glue on `Backend`: document lookup, language
///   gating, word extraction, and mapping the result onto the response
///   shape the client understands.
mod handler;
pub mod resolve;

pub use resolve::{
    AMBIGUITY_THRESHOLD, DefinitionQuery, ResolverVariant, accepts_query, origin_range, resolve,
    select_candidates,
};
