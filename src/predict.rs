use crate::core::index::SearchBackend;
use crate::core::types::{pictogram_image_url, PictogramId, Symbol};
use crate::error::SuggestError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How many predictions to request from the model by default.
pub const DEFAULT_TOP_K: usize = 40;

/// One next-concept prediction from the external predictive model. When
/// `pictogram_id` is present, text search is bypassed entirely for this
/// entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPrediction {
    /// Disambiguated lexical identifier, e.g. `"manger%2:34:00::"`.
    pub word_sense: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    pub probability: f64,
    #[serde(default)]
    pub pictogram_id: Option<PictogramId>,
}

/// External next-pictogram predictor. Interface only: the engine consumes
/// its output and surfaces its failures.
pub trait PredictionSource {
    fn predict_next(
        &self,
        selected_word_senses: &[String],
        top_k: usize,
    ) -> Result<Vec<WordPrediction>, SuggestError>;
}

/// Display label for a word-sense key: the lemma before the sense marker,
/// underscores read as spaces. `"ice_cream%1:13:00::"` → `"ice cream"`.
pub fn word_sense_label(word_sense: &str) -> String {
    word_sense
        .split('%')
        .next()
        .unwrap_or(word_sense)
        .replace('_', " ")
}

/// Converts model predictions to symbols, in prediction order. Entries
/// without a pictogram id, or whose id is unknown to the corpus, are
/// skipped; duplicates collapse to their first (highest-probability)
/// occurrence.
pub fn predictions_to_symbols<B: SearchBackend>(
    backend: &B,
    predictions: &[WordPrediction],
) -> Vec<Symbol> {
    let mut seen: HashSet<PictogramId> = HashSet::new();
    let mut symbols = Vec::new();

    for prediction in predictions {
        let Some(id) = prediction.pictogram_id else {
            continue;
        };
        if backend.pictogram(id).is_none() {
            warn!("prediction \"{}\" references unknown pictogram {id}", prediction.word_sense);
            continue;
        }
        if !seen.insert(id) {
            continue;
        }
        symbols.push(Symbol {
            key: prediction.word_sense.clone(),
            label: word_sense_label(&prediction.word_sense),
            image_url: pictogram_image_url(id),
            pictogram_id: id,
            probability: Some(prediction.probability),
        });
    }
    symbols
}

/// Full continuation round-trip: ask the predictor what comes next after
/// the selected word-senses, then map predictions onto corpus symbols.
/// Predictor failures surface as-is.
pub fn suggest_continuations<B: SearchBackend, P: PredictionSource>(
    backend: &B,
    source: &P,
    selected_word_senses: &[String],
    top_k: usize,
) -> Result<Vec<Symbol>, SuggestError> {
    let predictions = source.predict_next(selected_word_senses, top_k)?;
    Ok(predictions_to_symbols(backend, &predictions))
}
