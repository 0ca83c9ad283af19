use crate::core::trie::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Fuzzy candidate lookup over the index's term table, based on the
/// Symmetric Delete (SymSpell) algorithm: every term's delete variants are
/// precomputed once, so query-time lookup cost is independent of the term
/// table size.
///
/// Lookup returns *candidates*, not matches: delete-variant overlap admits
/// pairs beyond the requested distance, so callers must verify candidates
/// against a true edit distance before scoring them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVariantIndex {
    /// Maps a delete variant (e.g. "mnger") to the terms it could have come
    /// from (e.g. the id of "manger").
    deletes: HashMap<String, Vec<TermId>>,
    max_edit_distance: usize,
}

impl DeleteVariantIndex {
    pub fn new(max_edit_distance: usize) -> Self {
        Self { deletes: HashMap::new(), max_edit_distance }
    }

    /// Upper bound on the edit distance this index can answer for.
    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    /// Registers a term by generating all its delete variants up to the
    /// configured edit distance. Amortized O(k^2) in the term length.
    pub fn add_term(&mut self, term: &str, term_id: TermId) {
        for edit in generate_deletes(term, self.max_edit_distance) {
            let entry = self.deletes.entry(edit).or_default();
            if entry.last() != Some(&term_id) {
                entry.push(term_id);
            }
        }
    }

    /// Candidate terms within `distance` deletes of `input`. The budget is
    /// clamped to the precomputed maximum. Returned in term-id order so
    /// downstream scoring is deterministic.
    pub fn candidates(&self, input: &str, distance: usize) -> Vec<TermId> {
        let distance = distance.min(self.max_edit_distance);
        let mut found: BTreeSet<TermId> = BTreeSet::new();
        for edit in generate_deletes(input, distance) {
            if let Some(term_ids) = self.deletes.get(&edit) {
                found.extend(term_ids.iter().copied());
            }
        }
        found.into_iter().collect()
    }
}

/// All unique variants of `word` reachable by up to `distance` character
/// deletions, the original included.
fn generate_deletes(word: &str, distance: usize) -> HashSet<String> {
    let mut edits = HashSet::new();
    edits.insert(word.to_string());

    let mut current: Vec<String> = vec![word.to_string()];
    for _ in 0..distance {
        let mut next = Vec::new();
        for edit in &current {
            let chars: Vec<char> = edit.chars().collect();
            for skip in 0..chars.len() {
                let variant: String = chars
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, c)| c)
                    .collect();
                if edits.insert(variant.clone()) {
                    next.push(variant);
                }
            }
        }
        current = next;
    }
    edits
}
