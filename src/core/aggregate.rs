use crate::core::engine::QueryExecutor;
use crate::core::index::SearchBackend;
use crate::core::types::{pictogram_image_url, Pictogram, PictogramId, Symbol};
use crate::error::SuggestError;
use log::debug;
use std::collections::HashSet;

/// How many candidate queries the external suggestion generator is asked
/// for per request.
pub const SUGGESTED_QUERY_COUNT: usize = 16;

/// Default per-query result cap during aggregation.
pub const DEFAULT_PER_QUERY_CAP: usize = 5;

/// The fixed conversation-starter concepts shown before anything has been
/// tapped. French, like the corpus.
pub const STARTER_WORDS: [&str; 16] = [
    "moi",
    "toi",
    "oui",
    "non",
    "vouloir",
    "aider",
    "finir",
    "aller",
    "manger",
    "boire",
    "quoi",
    "maison",
    "maintenant",
    "mal",
    "salut",
    "au revoir",
];

/// External query generator (predictive language service). Interface only:
/// the engine consumes its output and surfaces its failures, never
/// substituting fabricated queries.
pub trait SuggestionSource {
    fn suggest_queries(&self, selected_words: &[String]) -> Result<Vec<String>, SuggestError>;
}

/// Merges per-query search results into one deduplicated symbol sequence.
///
/// Queries are processed in the given order: the suggestion generator ranks
/// its own list, so earlier queries are higher priority and the merge
/// preserves that priority instead of re-sorting. One dedup set spans the
/// whole batch: the first query to surface a pictogram fixes its position.
#[derive(Debug, Clone, Copy)]
pub struct CandidateAggregator<'a, B: SearchBackend> {
    backend: &'a B,
    per_query_cap: usize,
}

impl<'a, B: SearchBackend> CandidateAggregator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self::with_cap(backend, DEFAULT_PER_QUERY_CAP)
    }

    pub fn with_cap(backend: &'a B, per_query_cap: usize) -> Self {
        Self { backend, per_query_cap }
    }

    /// Runs every query and merges the results. Tolerates any mix of
    /// empty, zero-hit and duplicate queries without failing the batch.
    pub fn aggregate<S: AsRef<str>>(&self, queries: &[S]) -> Vec<Symbol> {
        let executor = QueryExecutor::new(self.backend);
        let mut seen: HashSet<PictogramId> = HashSet::new();
        let mut symbols = Vec::new();

        for query in queries {
            let query = query.as_ref();
            for pictogram in executor.top_matches(query, self.per_query_cap) {
                if seen.insert(pictogram.id) {
                    symbols.push(symbol_for(pictogram, query));
                }
            }
        }

        debug!("aggregated {} queries into {} symbols", queries.len(), symbols.len());
        symbols
    }

    /// Full predictive round-trip: ask the external generator for queries,
    /// then aggregate. Generator failures surface as-is.
    pub fn suggest<S: SuggestionSource>(
        &self,
        source: &S,
        selected_words: &[String],
    ) -> Result<Vec<Symbol>, SuggestError> {
        let queries = source.suggest_queries(selected_words)?;
        Ok(self.aggregate(&queries))
    }
}

/// Best-match symbol per word, misses skipped. Used for the starter board
/// and any other fixed concept list.
pub fn words_to_symbols<B: SearchBackend, S: AsRef<str>>(backend: &B, words: &[S]) -> Vec<Symbol> {
    let executor = QueryExecutor::new(backend);
    let mut seen: HashSet<PictogramId> = HashSet::new();
    let mut symbols = Vec::new();

    for word in words {
        let word = word.as_ref();
        match executor.best_match(word) {
            Some(pictogram) => {
                if seen.insert(pictogram.id) {
                    symbols.push(symbol_for(pictogram, word));
                }
            }
            None => debug!("no pictogram found for word \"{word}\""),
        }
    }
    symbols
}

/// The starter board: best matches for the fixed starter list.
pub fn starter_symbols<B: SearchBackend>(backend: &B) -> Vec<Symbol> {
    words_to_symbols(backend, &STARTER_WORDS)
}

fn symbol_for(pictogram: &Pictogram, query: &str) -> Symbol {
    Symbol {
        key: format!("{}-{}", pictogram.id, query),
        label: pictogram.primary_keyword().to_string(),
        image_url: pictogram_image_url(pictogram.id),
        pictogram_id: pictogram.id,
        probability: None,
    }
}
