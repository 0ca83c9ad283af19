use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a term in the index's interned term table.
pub type TermId = usize;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrieNode {
    /// BTreeMap so subtree traversal is byte-ordered, never hash-ordered.
    children: BTreeMap<u8, usize>,
    term_id: Option<TermId>,
}

impl TrieNode {
    fn new() -> Self {
        Self { children: BTreeMap::new(), term_id: None }
    }
}

/// Byte trie over normalized index terms, backed by a node arena.
/// Built once at index construction; read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermTrie {
    nodes: Vec<TrieNode>,
}

impl TermTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()] }
    }

    /// Inserts a term. O(k) where k is the term length in bytes.
    pub fn insert(&mut self, term: &str, term_id: TermId) {
        let mut node_idx = 0;
        for &byte in term.as_bytes() {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(&byte) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node_idx].children.insert(byte, new_node_id);
                new_node_id
            };
            node_idx = next_idx;
        }
        self.nodes[node_idx].term_id = Some(term_id);
    }

    fn descend(&self, term: &str) -> Option<usize> {
        let mut node_idx = 0;
        for &byte in term.as_bytes() {
            node_idx = *self.nodes[node_idx].children.get(&byte)?;
        }
        Some(node_idx)
    }

    /// Exact-term lookup.
    pub fn lookup(&self, term: &str) -> Option<TermId> {
        self.nodes[self.descend(term)?].term_id
    }

    /// All terms that share `prefix` as a prefix, the prefix itself
    /// included, in byte order.
    pub fn collect_prefix(&self, prefix: &str) -> Vec<TermId> {
        let mut out = Vec::new();
        if let Some(node_idx) = self.descend(prefix) {
            self.collect_subtree(node_idx, &mut out);
        }
        out
    }

    fn collect_subtree(&self, node_idx: usize, out: &mut Vec<TermId>) {
        let node = &self.nodes[node_idx];
        if let Some(id) = node.term_id {
            out.push(id);
        }
        for &child_idx in node.children.values() {
            self.collect_subtree(child_idx, out);
        }
    }
}

impl Default for TermTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TermTrie {
        let mut trie = TermTrie::new();
        for (id, term) in ["manger", "mangue", "mange", "boire"].iter().enumerate() {
            trie.insert(term, id);
        }
        trie
    }

    #[test]
    fn exact_lookup_finds_only_whole_terms() {
        let trie = sample();
        assert_eq!(trie.lookup("manger"), Some(0));
        assert_eq!(trie.lookup("boire"), Some(3));
        assert_eq!(trie.lookup("mang"), None);
        assert_eq!(trie.lookup("mangerait"), None);
    }

    #[test]
    fn prefix_collects_whole_subtree_in_byte_order() {
        let trie = sample();
        assert_eq!(trie.collect_prefix("mang"), vec![2, 0, 1]);
        assert_eq!(trie.collect_prefix("manger"), vec![0]);
        assert_eq!(trie.collect_prefix("z"), Vec::<TermId>::new());
    }
}
