use crate::core::types::{Pictogram, PictogramId};
use crate::error::CorpusError;
use log::info;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The immutable pictogram collection, loaded once per session.
///
/// Pictograms live in a dense array; the id map only stores positions, so
/// index entries can reference pictograms by slot without duplicating
/// payloads.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Corpus {
    pictograms: Vec<Pictogram>,
    by_id: HashMap<PictogramId, usize>,
}

impl Corpus {
    /// Validates and adopts a record set. Empty corpora, duplicate ids and
    /// keyword-less pictograms abort initialization.
    pub fn from_records(pictograms: Vec<Pictogram>) -> Result<Self, CorpusError> {
        if pictograms.is_empty() {
            return Err(CorpusError::Empty);
        }

        let mut by_id = HashMap::with_capacity(pictograms.len());
        for (slot, pictogram) in pictograms.iter().enumerate() {
            if pictogram.keywords.is_empty() {
                return Err(CorpusError::MissingKeywords { id: pictogram.id });
            }
            if by_id.insert(pictogram.id, slot).is_some() {
                return Err(CorpusError::DuplicateId { id: pictogram.id });
            }
        }

        info!("corpus loaded: {} pictograms", pictograms.len());
        Ok(Self { pictograms, by_id })
    }

    /// Parses a JSON array of pictogram records.
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        Self::from_records(serde_json::from_str(json)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CorpusError> {
        Self::from_records(serde_json::from_reader(reader)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        Self::from_json_reader(BufReader::new(File::open(path)?))
    }

    pub fn len(&self) -> usize {
        self.pictograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictograms.is_empty()
    }

    /// Lookup by external id. O(1).
    pub fn get(&self, id: PictogramId) -> Option<&Pictogram> {
        self.by_id.get(&id).map(|&slot| &self.pictograms[slot])
    }

    /// Lookup by dense slot (corpus insertion order).
    pub fn by_slot(&self, slot: usize) -> &Pictogram {
        &self.pictograms[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pictogram> {
        self.pictograms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::KeywordEntry;

    fn keyword(text: &str) -> KeywordEntry {
        KeywordEntry { text: text.to_string(), word_type: None, plural: None }
    }

    fn pictogram(id: PictogramId, words: &[&str]) -> Pictogram {
        Pictogram {
            id,
            keywords: words.iter().map(|w| keyword(w)).collect(),
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn empty_corpus_is_a_fatal_configuration_error() {
        assert!(matches!(Corpus::from_records(Vec::new()), Err(CorpusError::Empty)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let records = vec![pictogram(100, &["manger"]), pictogram(100, &["boire"])];
        assert!(matches!(
            Corpus::from_records(records),
            Err(CorpusError::DuplicateId { id: 100 })
        ));
    }

    #[test]
    fn keywordless_pictograms_are_rejected() {
        let records = vec![pictogram(100, &[])];
        assert!(matches!(
            Corpus::from_records(records),
            Err(CorpusError::MissingKeywords { id: 100 })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(Corpus::from_json_str("{not json"), Err(CorpusError::Parse(_))));
    }

    #[test]
    fn loads_arasaac_shaped_json() {
        let corpus = Corpus::from_json_str(
            r#"[{ "_id": 100, "keywords": [{ "keyword": "manger" }] }]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(100).unwrap().primary_keyword(), "manger");
        assert!(corpus.get(999).is_none());
    }
}
