use crate::core::index::SearchBackend;
use crate::core::types::{Pictogram, PictogramId, Symbol};
use crate::corpus::Corpus;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Fallback bucket for symbols whose pictogram carries no tags.
pub const UNCATEGORIZED: &str = "uncategorized";

// Tag-icon match weights: pictogram tags count most, then keywords and
// plurals, then categories. Exact matches outweigh containment.
const TAG_EXACT: u32 = 100;
const TAG_PARTIAL: u32 = 50;
const KEYWORD_EXACT: u32 = 80;
const KEYWORD_PARTIAL: u32 = 40;
const CATEGORY_EXACT: u32 = 30;
const CATEGORY_PARTIAL: u32 = 15;
const MIN_ICON_SCORE: u32 = 10;

/// One ranked display bucket.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

fn norm_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

fn probability(symbol: &Symbol) -> f64 {
    symbol.probability.unwrap_or(0.0)
}

/// Buckets a symbol batch by the owning pictogram's tags and ranks the
/// buckets for grouped display.
///
/// Membership is shared: a symbol tagged `{t1, t2}` lands in both buckets.
/// Tag-less symbols land in the single [`UNCATEGORIZED`] bucket, which
/// always sorts last. Other buckets order by lexicographic comparison of
/// their descending member-probability vectors (absent probability is 0,
/// missing positions are 0), then case-insensitively by name. Members
/// within a bucket sort by descending probability, stable for ties.
pub fn group_by_tag<B: SearchBackend>(backend: &B, symbols: &[Symbol]) -> Vec<CategoryGroup> {
    let mut buckets: BTreeMap<String, Vec<Symbol>> = BTreeMap::new();

    for symbol in symbols {
        let tags: BTreeSet<String> = backend
            .pictogram(symbol.pictogram_id)
            .map(|p| p.tags.iter().map(|t| norm_tag(t)).filter(|t| !t.is_empty()).collect())
            .unwrap_or_default();

        if tags.is_empty() {
            buckets.entry(UNCATEGORIZED.to_string()).or_default().push(symbol.clone());
        } else {
            for tag in tags {
                buckets.entry(tag).or_default().push(symbol.clone());
            }
        }
    }

    let mut groups: Vec<(Vec<f64>, CategoryGroup)> = buckets
        .into_iter()
        .map(|(name, mut symbols)| {
            symbols.sort_by(|a, b| probability(b).total_cmp(&probability(a)));
            let mut probs: Vec<f64> = symbols.iter().map(probability).collect();
            probs.sort_by(|a, b| b.total_cmp(a));
            (probs, CategoryGroup { name, symbols })
        })
        .collect();

    groups.sort_by(|(probs_a, group_a), (probs_b, group_b)| {
        match (group_a.name == UNCATEGORIZED, group_b.name == UNCATEGORIZED) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        compare_probability_vectors(probs_a, probs_b)
            .then_with(|| group_a.name.cmp(&group_b.name))
    });

    groups.into_iter().map(|(_, group)| group).collect()
}

/// Position-by-position comparison of two descending probability vectors;
/// the first differing position decides, higher value first. Positions
/// past a vector's end compare as 0.
fn compare_probability_vectors(a: &[f64], b: &[f64]) -> Ordering {
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0.0);
        let y = b.get(i).copied().unwrap_or(0.0);
        match y.total_cmp(&x) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }
    Ordering::Equal
}

fn contains_either_way(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Weighted match score of a pictogram against a tag name. Zero means no
/// relation.
fn icon_match_score(pictogram: &Pictogram, tag: &str) -> u32 {
    let mut score = 0;

    for picto_tag in &pictogram.tags {
        let picto_tag = norm_tag(picto_tag);
        if picto_tag == tag {
            score += TAG_EXACT;
        } else if contains_either_way(&picto_tag, tag) {
            score += TAG_PARTIAL;
        }
    }

    for entry in &pictogram.keywords {
        let keyword = norm_tag(&entry.text);
        if keyword == tag {
            score += KEYWORD_EXACT;
        } else if contains_either_way(&keyword, tag) {
            score += KEYWORD_PARTIAL;
        }
        if let Some(plural) = &entry.plural {
            let plural = norm_tag(plural);
            if plural == tag {
                score += KEYWORD_EXACT;
            } else if contains_either_way(&plural, tag) {
                score += KEYWORD_PARTIAL;
            }
        }
    }

    for category in &pictogram.categories {
        let category = norm_tag(category);
        if category == tag {
            score += CATEGORY_EXACT;
        } else if contains_either_way(&category, tag) {
            score += CATEGORY_PARTIAL;
        }
    }

    score
}

/// The pictogram whose artwork best represents a tag, for bucket headers.
/// Returns nothing when no pictogram relates strongly enough.
pub fn tag_icon(corpus: &Corpus, tag_name: &str) -> Option<PictogramId> {
    let tag = norm_tag(tag_name);
    if tag.is_empty() {
        return None;
    }
    let mut best_score = 0;
    let mut best_id = None;

    for pictogram in corpus.iter() {
        let score = icon_match_score(pictogram, &tag);
        if score > best_score {
            best_score = score;
            best_id = Some(pictogram.id);
        }
    }

    if best_score > MIN_ICON_SCORE {
        best_id
    } else {
        None
    }
}

/// Icon resolution for every distinct tag in the corpus. Tags with no
/// strong-enough pictogram are omitted.
pub fn tag_icon_mapping(corpus: &Corpus) -> BTreeMap<String, PictogramId> {
    let mut tags: BTreeSet<String> = BTreeSet::new();
    for pictogram in corpus.iter() {
        tags.extend(pictogram.tags.iter().map(|t| norm_tag(t)).filter(|t| !t.is_empty()));
    }

    tags.into_iter()
        .filter_map(|tag| tag_icon(corpus, &tag).map(|id| (tag, id)))
        .collect()
}
