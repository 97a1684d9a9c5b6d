use super::client::TextAnalytics;
use super::models::NamedEntity;
use crate::console::prelude::InputHandler;
use async_trait::async_trait;
use colored::Colorize;
use itertools::Itertools;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Label reported when a lookup fails. Indistinguishable from the service
/// genuinely answering "unknown"; the typed error is logged before this is
/// returned.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The full analysis suite over one transport client. Each method is a
/// single attempt: build the request, call the service, take the first
/// document's result. Failures are logged and collapsed to a sentinel so a
/// bad call never ends the session.
pub struct TextAnalyzer {
    client: Arc<dyn TextAnalytics>,
}

impl TextAnalyzer {
    pub fn new(client: Arc<dyn TextAnalytics>) -> Self {
        Self { client }
    }

    /// Human-readable name of the dominant language, [`UNKNOWN_LABEL`] when
    /// the lookup fails.
    pub async fn get_language(&self, text: &str) -> String {
        match self.client.detect_language(text).await {
            Ok(language) => {
                debug!(
                    "Detected {} with confidence {}",
                    language.name, language.confidence_score
                );
                language.name
            }
            Err(e) => {
                error!(target: "user", "Error detecting language: {}", e);
                UNKNOWN_LABEL.to_string()
            }
        }
    }

    /// ISO 639-1 code of the dominant language.
    pub async fn get_language_iso(&self, text: &str) -> Option<String> {
        match self.client.detect_language(text).await {
            Ok(language) => Some(language.iso6391_name),
            Err(e) => {
                error!(target: "user", "Error detecting language code: {}", e);
                None
            }
        }
    }

    pub async fn get_sentiment(&self, text: &str) -> String {
        match self.client.analyze_sentiment(text).await {
            Ok(sentiment) => sentiment.to_string(),
            Err(e) => {
                error!(target: "user", "Error analyzing sentiment: {}", e);
                UNKNOWN_LABEL.to_string()
            }
        }
    }

    pub async fn get_key_phrases(&self, text: &str) -> Vec<String> {
        match self.client.extract_key_phrases(text).await {
            Ok(phrases) => phrases,
            Err(e) => {
                error!(target: "user", "Error extracting key phrases: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_named_entities(&self, text: &str) -> Vec<NamedEntity> {
        match self.client.recognize_entities(text).await {
            Ok(entities) => entities,
            Err(e) => {
                error!(target: "user", "Error recognizing entities: {}", e);
                Vec::new()
            }
        }
    }

    /// Extractive summary with sentences joined by single spaces. Resolving
    /// the ISO language code is a prerequisite; when that fails, the summary
    /// request is not attempted.
    pub async fn get_extracted_summary(&self, text: &str) -> Option<String> {
        let language = self.get_language_iso(text).await?;
        debug!("Summarizing with language hint '{}'", language);

        match self.client.extract_summary(text, &language).await {
            Ok(sentences) => Some(
                sentences
                    .iter()
                    .map(|sentence| sentence.text.as_str())
                    .join(" "),
            ),
            Err(e) => {
                error!(target: "user", "Error summarizing text: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl InputHandler for TextAnalyzer {
    async fn handle(&self, text: &str) {
        let language = self.get_language(text).await;
        let sentiment = self.get_sentiment(text).await;
        let key_phrases = self.get_key_phrases(text).await;
        let entities = self.get_named_entities(text).await;
        let summary = self.get_extracted_summary(text).await;

        info!(target: "user", "{} {}", "Detected language:".white().bold(), language);
        info!(target: "user", "{} {}", "Sentiment:".white().bold(), sentiment);
        info!(target: "user", "{} {}", "Key phrases:".white().bold(), format_list(&key_phrases));
        info!(target: "user", "{} {}", "Named entities:".white().bold(), format_entities(&entities));
        info!(target: "user", "{} {}", "Extractive summary:".white().bold(), summary.as_deref().unwrap_or("(none)"));
    }
}

fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn format_entities(entities: &[NamedEntity]) -> String {
    if entities.is_empty() {
        "(none)".to_string()
    } else {
        entities
            .iter()
            .map(|entity| format!("{} ({})", entity.text, entity.category))
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::client::MockTextAnalytics;
    use crate::analysis::error::TransportError;
    use crate::analysis::models::{DetectedLanguage, Sentiment, SummarySentence};
    use reqwest::StatusCode;

    fn spanish() -> DetectedLanguage {
        DetectedLanguage {
            name: "Spanish".to_string(),
            iso6391_name: "es".to_string(),
            confidence_score: 1.0,
        }
    }

    fn transport_error() -> TransportError {
        TransportError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        }
    }

    fn sentence(text: &str) -> SummarySentence {
        SummarySentence {
            text: text.to_string(),
            rank_score: 0.5,
            offset: 0,
            length: text.len(),
        }
    }

    fn analyzer(client: MockTextAnalytics) -> TextAnalyzer {
        TextAnalyzer::new(Arc::new(client))
    }

    #[tokio::test]
    async fn language_returns_primary_name() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_detect_language()
            .withf(|text| text == "Hola mundo")
            .times(1)
            .returning(|_| Ok(spanish()));

        assert_eq!("Spanish", analyzer(client).get_language("Hola mundo").await);
    }

    #[tokio::test]
    async fn language_failure_returns_unknown() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_detect_language()
            .times(1)
            .returning(|_| Err(transport_error()));

        assert_eq!(UNKNOWN_LABEL, analyzer(client).get_language("Hola mundo").await);
    }

    #[tokio::test]
    async fn sentiment_returns_polarity_label() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_analyze_sentiment()
            .times(1)
            .returning(|_| Ok(Sentiment::Positive));

        assert_eq!("positive", analyzer(client).get_sentiment("Me encanta").await);
    }

    #[tokio::test]
    async fn sentiment_failure_returns_unknown() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_analyze_sentiment()
            .times(1)
            .returning(|_| Err(transport_error()));

        assert_eq!(UNKNOWN_LABEL, analyzer(client).get_sentiment("Me encanta").await);
    }

    #[tokio::test]
    async fn key_phrases_keep_order() {
        let mut client = MockTextAnalytics::new();
        client.expect_extract_key_phrases().times(1).returning(|_| {
            Ok(vec![
                "viaje".to_string(),
                "servicio".to_string(),
                "rutas".to_string(),
            ])
        });

        assert_eq!(
            vec!["viaje", "servicio", "rutas"],
            analyzer(client).get_key_phrases("el viaje").await
        );
    }

    #[tokio::test]
    async fn key_phrases_failure_returns_empty() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_extract_key_phrases()
            .times(1)
            .returning(|_| Err(transport_error()));

        assert!(analyzer(client).get_key_phrases("el viaje").await.is_empty());
    }

    #[tokio::test]
    async fn entities_keep_source_order() {
        let mut client = MockTextAnalytics::new();
        client.expect_recognize_entities().times(1).returning(|_| {
            Ok(vec![
                NamedEntity {
                    text: "Azure".to_string(),
                    category: "Product".to_string(),
                },
                NamedEntity {
                    text: "Madrid".to_string(),
                    category: "Location".to_string(),
                },
            ])
        });

        let entities = analyzer(client).get_named_entities("Azure en Madrid").await;
        assert_eq!(
            vec![("Azure", "Product"), ("Madrid", "Location")],
            entities
                .iter()
                .map(|e| (e.text.as_str(), e.category.as_str()))
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn entities_failure_returns_empty() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_recognize_entities()
            .times(1)
            .returning(|_| Err(transport_error()));

        assert!(
            analyzer(client)
                .get_named_entities("Azure en Madrid")
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn summary_joins_sentences_with_spaces() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_detect_language()
            .times(1)
            .returning(|_| Ok(spanish()));
        client
            .expect_extract_summary()
            .withf(|_, language| language == "es")
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    sentence("Azure es una plataforma cloud."),
                    sentence("Ofrece más de 200 servicios."),
                ])
            });

        let summary = analyzer(client)
            .get_extracted_summary("Azure es una plataforma cloud. Ofrece más de 200 servicios.")
            .await;

        assert_eq!(
            Some("Azure es una plataforma cloud. Ofrece más de 200 servicios.".to_string()),
            summary
        );
    }

    #[tokio::test]
    async fn summary_skipped_when_language_lookup_fails() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_detect_language()
            .times(1)
            .returning(|_| Err(transport_error()));
        client.expect_extract_summary().never();

        assert_eq!(None, analyzer(client).get_extracted_summary("texto").await);
    }

    #[tokio::test]
    async fn summary_failure_returns_none() {
        let mut client = MockTextAnalytics::new();
        client
            .expect_detect_language()
            .times(1)
            .returning(|_| Ok(spanish()));
        client
            .expect_extract_summary()
            .times(1)
            .returning(|_, _| Err(transport_error()));

        assert_eq!(None, analyzer(client).get_extracted_summary("texto").await);
    }
}
