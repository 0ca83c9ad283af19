use serde::{Deserialize, Serialize};

/// A unique identifier for a pictogram, assigned by the corpus publisher.
pub type PictogramId = u32;

const IMAGE_BASE_URL: &str = "https://static.arasaac.org/pictograms";
const IMAGE_RESOLUTION: u32 = 500;

/// One keyword attached to a pictogram. Entry 0 of a pictogram's keyword
/// list is its *primary* keyword (the canonical display label).
///
/// Serde aliases accept the upstream ARASAAC field names (`keyword`,
/// `type`), so raw dataset dumps load without a conversion pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    #[serde(alias = "keyword")]
    pub text: String,
    /// Grammatical type code carried by the dataset; opaque to the engine.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub word_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
}

/// A single AAC visual symbol with its keyword labels and classification
/// labels. Immutable after corpus load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pictogram {
    #[serde(alias = "_id")]
    pub id: PictogramId,
    pub keywords: Vec<KeywordEntry>,
    /// Free-form classification strings.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Free-form labels used for grouped display.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Pictogram {
    /// The canonical display label: the text of the primary keyword.
    pub fn primary_keyword(&self) -> &str {
        &self.keywords[0].text
    }
}

/// A displayable symbol produced for one request. `key` is unique within a
/// result batch; exactly one symbol per pictogram id is emitted per batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub key: String,
    pub label: String,
    pub image_url: String,
    pub pictogram_id: PictogramId,
    /// Ranking/highlight signal in [0, 1]. Never used to drop a candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

/// Image location for a pictogram id: a pure function of the id, resolved
/// by template substitution against the ARASAAC static host.
pub fn pictogram_image_url(id: PictogramId) -> String {
    format!("{IMAGE_BASE_URL}/{id}/{id}_{IMAGE_RESOLUTION}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_is_a_pure_function_of_the_id() {
        assert_eq!(
            pictogram_image_url(6456),
            "https://static.arasaac.org/pictograms/6456/6456_500.png"
        );
        assert_eq!(pictogram_image_url(6456), pictogram_image_url(6456));
    }

    #[test]
    fn accepts_upstream_arasaac_field_names() {
        let json = r#"{
            "_id": 6456,
            "keywords": [{ "keyword": "manger", "type": 3, "plural": "mangent" }],
            "tags": ["nourriture"]
        }"#;
        let p: Pictogram = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, 6456);
        assert_eq!(p.primary_keyword(), "manger");
        assert_eq!(p.keywords[0].plural.as_deref(), Some("mangent"));
        assert_eq!(p.tags, vec!["nourriture".to_string()]);
    }
}
