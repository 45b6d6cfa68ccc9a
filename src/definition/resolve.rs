/// Symbol-index definition resolution.
///
/// Given the word under the cursor and the text of the cursor's line this
/// module:
///   1. Rejects queries that are too short to be meaningful.
///   2. Asks the [`SymbolIndex`] for every symbol related to the query.
///   3. Keeps only methods whose name contains the query (and, in the
///      strict variant, whose full name also appears on the cursor line).
///   4. Gives up when more than [`AMBIGUITY_THRESHOLD`] candidates remain.
///   5. Returns one `LocationLink` per surviving candidate, in index order.
///
/// There is no type information involved.  The filter trades recall for
/// precision: a wrong jump is worse than no jump.
use regex::Regex;
use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{LocationLink, Position, Range};

use crate::index::{IndexError, SymbolIndex};
use crate::text::word_at_with_pattern;
use crate::types::SymbolRecord;

/// More candidates than this and the resolver answers with nothing.
pub const AMBIGUITY_THRESHOLD: usize = 5;

/// Which flavour of the matching heuristic to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverVariant {
    /// Queries of two or more characters; the candidate's full name must
    /// appear on the cursor line; links carry an origin selection range.
    #[default]
    Strict,
    /// Any non-empty query; no line check; no origin range.
    Lenient,
}

impl ResolverVariant {
    /// Minimum query length, in UTF-16 code units.
    pub fn min_query_len(self) -> usize {
        match self {
            Self::Strict => 2,
            Self::Lenient => 1,
        }
    }

    fn corroborates_with_line(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// The text-level inputs of one definition request.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionQuery<'a> {
    /// Word under the cursor.
    pub word: &'a str,
    /// Full text of the cursor line.
    pub line_text: &'a str,
    /// Cursor position (UTF-16 column).
    pub position: Position,
}

/// Whether `word` passes the variant's minimum-length guard.
///
/// Length is measured in UTF-16 code units, like every column the client
/// sends, so a single astral-plane character counts as two.
pub fn accepts_query(word: &str, variant: ResolverVariant) -> bool {
    word.encode_utf16().count() >= variant.min_query_len()
}

/// Apply the plausibility filter and the ambiguity bound to `symbols`.
///
/// Returns `None` when too many candidates survive.  Order of `symbols`
/// is preserved.
pub fn select_candidates<'s>(
    symbols: &'s [SymbolRecord],
    query: &DefinitionQuery<'_>,
    variant: ResolverVariant,
) -> Option<Vec<&'s SymbolRecord>> {
    let candidates: Vec<&SymbolRecord> = symbols
        .iter()
        .filter(|s| s.is_method())
        .filter(|s| s.name.contains(query.word))
        .filter(|s| !variant.corroborates_with_line() || query.line_text.contains(s.name.as_str()))
        .collect();

    if candidates.len() > AMBIGUITY_THRESHOLD {
        tracing::debug!(
            query = query.word,
            candidates = candidates.len(),
            "too many definition candidates"
        );
        return None;
    }
    Some(candidates)
}

/// The span of `name` on the cursor line that contains the cursor.
///
/// `name` is matched literally, so characters such as `$`, `(` or `.` in a
/// symbol name carry no pattern meaning.
pub fn origin_range(line_text: &str, position: Position, name: &str) -> Option<Range> {
    let pattern = Regex::new(&regex::escape(name)).ok()?;
    word_at_with_pattern(line_text, position.character, &pattern)
        .map(|span| span.to_range(position.line))
}

fn link_for(
    symbol: &SymbolRecord,
    query: &DefinitionQuery<'_>,
    variant: ResolverVariant,
) -> LocationLink {
    let origin_selection_range = match variant {
        ResolverVariant::Strict => origin_range(query.line_text, query.position, &symbol.name),
        ResolverVariant::Lenient => None,
    };
    LocationLink {
        origin_selection_range,
        target_uri: symbol.location.uri.clone(),
        target_range: symbol.location.range,
        target_selection_range: symbol.location.range,
    }
}

/// Resolve definition candidates for `query`.
///
/// `Ok(None)` means "no result": the query was too short or the match was
/// too ambiguous.  `Ok(Some(links))` may be empty when nothing matched.
/// Index failures are returned as-is.
pub async fn resolve<I>(
    query: &DefinitionQuery<'_>,
    variant: ResolverVariant,
    index: &I,
) -> Result<Option<Vec<LocationLink>>, IndexError>
where
    I: SymbolIndex + ?Sized,
{
    if !accepts_query(query.word, variant) {
        return Ok(None);
    }

    let symbols = index.search(query.word).await?;

    Ok(select_candidates(&symbols, query, variant).map(|candidates| {
        candidates
            .into_iter()
            .map(|symbol| link_for(symbol, query, variant))
            .collect()
    }))
}
