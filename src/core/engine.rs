use crate::core::index::SearchBackend;
use crate::core::types::Pictogram;

/// Stateless query front-end over a search backend. Owns nothing; a new
/// executor per request costs nothing.
///
/// "No results" is a valid, silent outcome for every operation here;
/// callers decide what an empty board means.
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor<'a, B: SearchBackend> {
    backend: &'a B,
}

impl<'a, B: SearchBackend> QueryExecutor<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// The single best-matching pictogram for `query`, if any.
    pub fn best_match(&self, query: &str) -> Option<&'a Pictogram> {
        let hits = self.backend.search(query);
        hits.first().and_then(|hit| self.backend.pictogram(hit.pictogram_id))
    }

    /// Up to `limit` pictograms for `query`, ranked by relevance and
    /// already deduplicated by pictogram id.
    pub fn top_matches(&self, query: &str, limit: usize) -> Vec<&'a Pictogram> {
        self.backend
            .search(query)
            .into_iter()
            .take(limit)
            .filter_map(|hit| self.backend.pictogram(hit.pictogram_id))
            .collect()
    }
}
