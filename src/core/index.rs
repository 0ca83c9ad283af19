use crate::core::normalize::{normalize, tokenize};
use crate::core::trie::{TermId, TermTrie};
use crate::core::types::{Pictogram, PictogramId};
use crate::corpus::Corpus;
use crate::fuzzy::symspell::DeleteVariantIndex;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const DEFAULT_EXACT_BOOST: f64 = 10.0;
const DEFAULT_PRIMARY_BOOST: f64 = 1.5;
const DEFAULT_PLURAL_WEIGHT: f64 = 0.5;
const DEFAULT_PREFIX_WEIGHT: f64 = 0.9;
const DEFAULT_FUZZY_WEIGHT: f64 = 0.45;
const DEFAULT_SHORT_TERM_LEN: usize = 3;
const DEFAULT_SHORT_FUZZY: f64 = 0.1;
const DEFAULT_LONG_FUZZY: f64 = 0.2;
const DEFAULT_MAX_FUZZY_EDITS: usize = 2;

/// Scoring knobs. The numeric values are tuned, not derived; the contract
/// is only their ordering: exact > primary > other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Boost for a document whose full normalized text equals the full
    /// normalized query.
    pub exact_boost: f64,
    /// Boost for a match against a pictogram's primary keyword.
    pub primary_boost: f64,
    /// Down-weight for plural variants relative to their base keyword.
    pub plural_weight: f64,
    /// Base weight of a prefix match, further scaled by length ratio.
    pub prefix_weight: f64,
    /// Base weight of a fuzzy match, further scaled by closeness.
    pub fuzzy_weight: f64,
    /// Query terms up to this many characters use `short_fuzzy`.
    pub short_term_len: usize,
    /// Edit tolerance per character for short query terms.
    pub short_fuzzy: f64,
    /// Edit tolerance per character for longer query terms.
    pub long_fuzzy: f64,
    /// Hard cap on fuzzy edits; the delete dictionary is precomputed to it.
    pub max_fuzzy_edits: usize,
    /// Optional score floor applied after ranking. A ranking policy, not a
    /// probability filter.
    pub min_score: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exact_boost: DEFAULT_EXACT_BOOST,
            primary_boost: DEFAULT_PRIMARY_BOOST,
            plural_weight: DEFAULT_PLURAL_WEIGHT,
            prefix_weight: DEFAULT_PREFIX_WEIGHT,
            fuzzy_weight: DEFAULT_FUZZY_WEIGHT,
            short_term_len: DEFAULT_SHORT_TERM_LEN,
            short_fuzzy: DEFAULT_SHORT_FUZZY,
            long_fuzzy: DEFAULT_LONG_FUZZY,
            max_fuzzy_edits: DEFAULT_MAX_FUZZY_EDITS,
            min_score: None,
        }
    }
}

/// One indexed text variant of a keyword entry. Many documents reference
/// one pictogram; plural variants inherit `is_primary` from their entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchDocument {
    pictogram_slot: usize,
    text: String,
    is_primary: bool,
    is_plural: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TermEntry {
    text: String,
    postings: Vec<usize>,
}

/// A scored, pictogram-deduplicated search match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub pictogram_id: PictogramId,
    pub score: f64,
}

/// Narrow boundary over the search implementation, so the inverted index
/// can be swapped (trigram index, external service) without touching
/// aggregation or ranking.
pub trait SearchBackend {
    /// Ranked, pictogram-deduplicated matches for one query. Empty or
    /// whitespace queries yield an empty result, never an error.
    fn search(&self, query: &str) -> Vec<SearchHit>;

    /// Resolves a hit back to its pictogram.
    fn pictogram(&self, id: PictogramId) -> Option<&Pictogram>;
}

/// Inverted term index over a pictogram corpus. Built once at startup,
/// immutable afterwards; shareable read-only across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictogramIndex {
    corpus: Corpus,
    config: SearchConfig,
    docs: Vec<SearchDocument>,
    terms: Vec<TermEntry>,
    trie: TermTrie,
    deletes: DeleteVariantIndex,
}

impl PictogramIndex {
    pub fn build(corpus: Corpus) -> Self {
        Self::with_config(corpus, SearchConfig::default())
    }

    /// Flattens every keyword entry (and its plural) into search documents
    /// and interns their terms. The corpus has already been validated, so
    /// construction cannot fail.
    pub fn with_config(corpus: Corpus, config: SearchConfig) -> Self {
        let mut index = Self {
            corpus,
            docs: Vec::new(),
            terms: Vec::new(),
            trie: TermTrie::new(),
            deletes: DeleteVariantIndex::new(config.max_fuzzy_edits),
            config,
        };

        let mut term_ids: HashMap<String, TermId> = HashMap::new();
        for slot in 0..index.corpus.len() {
            let pictogram = index.corpus.by_slot(slot).clone();
            for (entry_idx, entry) in pictogram.keywords.iter().enumerate() {
                let is_primary = entry_idx == 0;
                index.add_document(slot, &entry.text, is_primary, false, &mut term_ids);
                if let Some(plural) = &entry.plural {
                    index.add_document(slot, plural, is_primary, true, &mut term_ids);
                }
            }
        }

        debug!(
            "index built: {} documents, {} terms over {} pictograms",
            index.docs.len(),
            index.terms.len(),
            index.corpus.len()
        );
        index
    }

    fn add_document(
        &mut self,
        pictogram_slot: usize,
        raw_text: &str,
        is_primary: bool,
        is_plural: bool,
        term_ids: &mut HashMap<String, TermId>,
    ) {
        let text = normalize(raw_text);
        if text.is_empty() {
            return;
        }
        let doc_id = self.docs.len();

        for term in tokenize(&text) {
            let term_id = match term_ids.get(term) {
                Some(&id) => id,
                None => {
                    let id = self.terms.len();
                    term_ids.insert(term.to_string(), id);
                    self.terms.push(TermEntry { text: term.to_string(), postings: Vec::new() });
                    self.trie.insert(term, id);
                    self.deletes.add_term(term, id);
                    id
                }
            };
            let postings = &mut self.terms[term_id].postings;
            if postings.last() != Some(&doc_id) {
                postings.push(doc_id);
            }
        }

        self.docs.push(SearchDocument { pictogram_slot, text, is_primary, is_plural });
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Edit budget for a query term: ~10% of its characters when short,
    /// ~20% when longer, capped by the precomputed delete distance.
    fn fuzzy_budget(&self, term_chars: usize) -> usize {
        let factor = if term_chars <= self.config.short_term_len {
            self.config.short_fuzzy
        } else {
            self.config.long_fuzzy
        };
        ((term_chars as f64 * factor).round() as usize).min(self.config.max_fuzzy_edits)
    }

    /// Term matches for one query term: exact, prefix, and verified fuzzy.
    /// Keyed by term id so downstream accumulation is deterministic; each
    /// term keeps its best weight across match kinds.
    fn match_term(&self, query_term: &str) -> BTreeMap<TermId, f64> {
        let mut matched: BTreeMap<TermId, f64> = BTreeMap::new();
        let raise = |matched: &mut BTreeMap<TermId, f64>, id: TermId, weight: f64| {
            let entry = matched.entry(id).or_insert(0.0);
            if weight > *entry {
                *entry = weight;
            }
        };

        let query_chars = query_term.chars().count();

        if let Some(term_id) = self.trie.lookup(query_term) {
            raise(&mut matched, term_id, 1.0);
        }

        for term_id in self.trie.collect_prefix(query_term) {
            let term_chars = self.terms[term_id].text.chars().count();
            if term_chars > query_chars {
                let ratio = query_chars as f64 / term_chars as f64;
                raise(&mut matched, term_id, self.config.prefix_weight * ratio);
            }
        }

        let budget = self.fuzzy_budget(query_chars);
        if budget > 0 {
            for term_id in self.deletes.candidates(query_term, budget) {
                let term = &self.terms[term_id].text;
                let distance = strsim::levenshtein(query_term, term);
                if distance == 0 || distance > budget {
                    continue;
                }
                let term_chars = term.chars().count();
                let closeness = 1.0 - distance as f64 / term_chars.max(query_chars) as f64;
                raise(&mut matched, term_id, self.config.fuzzy_weight * closeness);
            }
        }

        matched
    }
}

impl SearchBackend for PictogramIndex {
    fn search(&self, query: &str) -> Vec<SearchHit> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Vec::new();
        }

        // Accumulate per-document raw weights across all query terms.
        let mut doc_raw: BTreeMap<usize, f64> = BTreeMap::new();
        for query_term in tokenize(&normalized) {
            for (term_id, weight) in self.match_term(query_term) {
                for &doc_id in &self.terms[term_id].postings {
                    *doc_raw.entry(doc_id).or_insert(0.0) += weight;
                }
            }
        }

        // Apply boosts and keep the best-scoring document per pictogram.
        // Boosts do not stack: exact wins outright, else primary, else 1.
        let mut best_by_slot: BTreeMap<usize, f64> = BTreeMap::new();
        for (doc_id, raw) in doc_raw {
            let doc = &self.docs[doc_id];
            let variant_weight = if doc.is_plural { self.config.plural_weight } else { 1.0 };
            let boost = if doc.text == normalized {
                self.config.exact_boost
            } else if doc.is_primary {
                self.config.primary_boost
            } else {
                1.0
            };
            let score = raw * variant_weight * boost;
            let entry = best_by_slot.entry(doc.pictogram_slot).or_insert(0.0);
            if score > *entry {
                *entry = score;
            }
        }

        // Stable sort: equal scores keep corpus insertion order.
        let mut hits: Vec<(usize, f64)> = best_by_slot.into_iter().collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        if let Some(floor) = self.config.min_score {
            hits.retain(|&(_, score)| score >= floor);
        }

        debug!("search \"{query}\": {} pictograms matched", hits.len());
        hits.into_iter()
            .map(|(slot, score)| SearchHit { pictogram_id: self.corpus.by_slot(slot).id, score })
            .collect()
    }

    fn pictogram(&self, id: PictogramId) -> Option<&Pictogram> {
        self.corpus.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::KeywordEntry;

    fn entry(text: &str, plural: Option<&str>) -> KeywordEntry {
        KeywordEntry {
            text: text.to_string(),
            word_type: None,
            plural: plural.map(str::to_string),
        }
    }

    fn pictogram(id: PictogramId, keywords: Vec<KeywordEntry>) -> Pictogram {
        Pictogram { id, keywords, categories: Vec::new(), tags: Vec::new() }
    }

    fn sample_index() -> PictogramIndex {
        let corpus = Corpus::from_records(vec![
            pictogram(100, vec![entry("manger", Some("mangent"))]),
            pictogram(101, vec![entry("mangue", None)]),
            pictogram(102, vec![entry("boire", Some("boivent"))]),
            pictogram(103, vec![entry("éléphant", None)]),
        ])
        .unwrap();
        PictogramIndex::build(corpus)
    }

    #[test]
    fn exact_primary_keyword_is_top_ranked_with_exact_boost() {
        let index = sample_index();
        let hits = index.search("manger");
        assert_eq!(hits[0].pictogram_id, 100);
        // One exact term match boosted by the exact factor.
        assert!((hits[0].score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_and_whitespace_queries_return_nothing() {
        let index = sample_index();
        assert!(index.search("").is_empty());
        assert!(index.search("   \t ").is_empty());
    }

    #[test]
    fn prefix_match_scores_strictly_below_exact() {
        let index = sample_index();
        let prefix_hits = index.search("mang");
        let exact_hits = index.search("manger");
        let prefix_100 = prefix_hits.iter().find(|h| h.pictogram_id == 100).unwrap();
        assert!(prefix_100.score < exact_hits[0].score);
    }

    #[test]
    fn unrelated_long_query_returns_nothing() {
        let index = sample_index();
        assert!(index.search("xyz123").is_empty());
    }

    #[test]
    fn diacritics_are_ignored_both_ways() {
        let index = sample_index();
        assert_eq!(index.search("elephant")[0].pictogram_id, 103);
        assert_eq!(index.search("ÉLÉPHANT")[0].pictogram_id, 103);
    }

    #[test]
    fn typo_within_budget_still_matches() {
        let index = sample_index();
        // One deletion away from "manger"; length 5 allows one edit.
        let hits = index.search("mangr");
        assert!(hits.iter().any(|h| h.pictogram_id == 100));
    }

    #[test]
    fn plural_form_resolves_to_its_pictogram() {
        let index = sample_index();
        assert_eq!(index.search("boivent")[0].pictogram_id, 102);
    }

    #[test]
    fn multiple_keyword_hits_collapse_to_one_pictogram() {
        let corpus = Corpus::from_records(vec![pictogram(
            100,
            vec![entry("manger", None), entry("mange", None)],
        )])
        .unwrap();
        let index = PictogramIndex::build(corpus);
        // "mang" prefix-matches both documents of pictogram 100.
        let hits = index.search("mang");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].pictogram_id, 100);
    }

    #[test]
    fn equal_scores_keep_corpus_insertion_order() {
        let corpus = Corpus::from_records(vec![
            pictogram(200, vec![entry("chat", None)]),
            pictogram(201, vec![entry("chat", None)]),
        ])
        .unwrap();
        let index = PictogramIndex::build(corpus);
        let hits = index.search("chat");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].pictogram_id, 200);
        assert_eq!(hits[1].pictogram_id, 201);
        assert!((hits[0].score - hits[1].score).abs() < 1e-12);
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let index = sample_index();
        let first = index.search("mang");
        for _ in 0..5 {
            assert_eq!(index.search("mang"), first);
        }
    }

    #[test]
    fn score_floor_filters_weak_matches() {
        let corpus = Corpus::from_records(vec![
            pictogram(100, vec![entry("manger", None)]),
            pictogram(101, vec![entry("mangue", None)]),
        ])
        .unwrap();
        let config = SearchConfig { min_score: Some(1.0), ..SearchConfig::default() };
        let index = PictogramIndex::with_config(corpus, config);
        // Prefix-only matches score below the floor and are dropped...
        assert!(index.search("mang").is_empty());
        // ...while the exact match clears it.
        let hits = index.search("manger");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].pictogram_id, 100);
    }

    #[test]
    fn multi_word_keyword_matches_its_full_phrase() {
        let corpus = Corpus::from_records(vec![
            pictogram(300, vec![entry("au revoir", None)]),
            pictogram(301, vec![entry("revoir", None)]),
        ])
        .unwrap();
        let index = PictogramIndex::build(corpus);
        let hits = index.search("au revoir");
        // Both query terms hit the phrase document, and it carries the
        // exact boost; the single-term document ranks below.
        assert_eq!(hits[0].pictogram_id, 300);
        assert!(hits.iter().any(|h| h.pictogram_id == 301));
    }
}
