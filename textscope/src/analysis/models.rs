use serde::{Deserialize, Serialize};

/// One entry in the `documents` array sent to the service. The service
/// echoes the id back, so a single-document batch always uses id "1".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDocumentInput {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TextDocumentInput {
    pub fn new(text: &str) -> Self {
        Self {
            id: "1".to_string(),
            text: text.to_string(),
            language: None,
        }
    }

    /// Same as [`TextDocumentInput::new`] with an ISO 639-1 language hint,
    /// required by the summarization task.
    pub fn with_language(text: &str, language: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            ..Self::new(text)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentBatch {
    pub documents: Vec<TextDocumentInput>,
}

impl DocumentBatch {
    pub fn single(document: TextDocumentInput) -> Self {
        Self {
            documents: vec![document],
        }
    }
}

/// Response wrapper shared by all single-shot analysis routes.
#[derive(Debug, Deserialize)]
pub struct DocumentsEnvelope<T> {
    pub documents: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    pub name: String,
    pub iso6391_name: String,
    #[serde(default)]
    pub confidence_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct LanguageDocument {
    #[serde(rename = "detectedLanguage")]
    pub detected_language: DetectedLanguage,
}

/// Polarity label reported by the sentiment route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

#[derive(Debug, Deserialize)]
pub struct SentimentDocument {
    pub sentiment: Sentiment,
}

#[derive(Debug, Deserialize)]
pub struct KeyPhrasesDocument {
    #[serde(rename = "keyPhrases")]
    pub key_phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct EntitiesDocument {
    pub entities: Vec<NamedEntity>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySentence {
    pub text: String,
    #[serde(default)]
    pub rank_score: f64,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
}
