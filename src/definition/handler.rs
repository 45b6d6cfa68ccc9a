use tower_lsp::lsp_types::*;

use super::resolve::{DefinitionQuery, resolve};
use crate::Backend;
use crate::index::IndexError;
use crate::text;

impl Backend {
    /// Handle a "go to definition" request.
    ///
    /// Returns `Ok(None)` when the document is unknown, its language is not
    /// enabled, there is no word under the cursor, or the resolver has no
    /// answer.  Index failures are passed through untouched.
    pub(crate) async fn resolve_definition(
        &self,
        uri: &Url,
        position: Position,
    ) -> Result<Option<GotoDefinitionResponse>, IndexError> {
        let Some(doc) = self.document(uri) else {
            return Ok(None);
        };

        let settings = self.settings();
        if !settings.is_language_enabled(&doc.language_id) {
            tracing::debug!(
                language = doc.language_id.as_str(),
                "definition requested for a language that is not enabled"
            );
            return Ok(None);
        }

        let Some(line_text) = text::line_at(&doc.text, position.line) else {
            return Ok(None);
        };
        let Some(word) = text::word_at(line_text, position.character) else {
            return Ok(None);
        };

        let query = DefinitionQuery {
            word: word.text,
            line_text,
            position,
        };
        let links = resolve(&query, settings.variant, self.index.as_ref()).await?;

        Ok(links
            .filter(|links| !links.is_empty())
            .map(|links| self.definition_response(links)))
    }

    /// Shape the links for the client: `LocationLink`s when it supports
    /// them, plain locations otherwise.
    fn definition_response(&self, links: Vec<LocationLink>) -> GotoDefinitionResponse {
        if self.client_support().link_support {
            return GotoDefinitionResponse::Link(links);
        }
        GotoDefinitionResponse::Array(
            links
                .into_iter()
                .map(|link| Location {
                    uri: link.target_uri,
                    range: link.target_range,
                })
                .collect(),
        )
    }
}
