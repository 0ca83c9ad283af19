pub mod core;
pub mod corpus;
pub mod error;
pub mod fuzzy;
pub mod predict;
pub mod snapshot;

pub use crate::core::aggregate::{
    starter_symbols, words_to_symbols, CandidateAggregator, SuggestionSource, STARTER_WORDS,
};
pub use crate::core::engine::QueryExecutor;
pub use crate::core::index::{PictogramIndex, SearchBackend, SearchConfig, SearchHit};
pub use crate::core::rank::{group_by_tag, tag_icon_mapping, CategoryGroup, UNCATEGORIZED};
pub use crate::core::types::{pictogram_image_url, KeywordEntry, Pictogram, PictogramId, Symbol};
pub use crate::corpus::Corpus;
pub use crate::error::{CorpusError, SnapshotError, SuggestError};
pub use crate::predict::{predictions_to_symbols, PredictionSource, WordPrediction};
