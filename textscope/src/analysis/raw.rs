use super::client::{LANGUAGES_ROUTE, SUBSCRIPTION_KEY_HEADER};
use super::error::TransportError;
use crate::console::prelude::InputHandler;
use crate::shared::prelude::ServiceConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

/// Language detection the low-level way: a hand-built JSON body, one POST,
/// and a hand-parsed response. The typed client covers the same route; this
/// path exposes the wire contract end to end for the `textscope-detect`
/// binary.
#[derive(Debug, Clone)]
pub struct RawLanguageDetection {
    config: ServiceConfig,
}

#[derive(Debug, Deserialize)]
struct RawLanguagesResponse {
    documents: Vec<RawLanguageDocument>,
}

#[derive(Debug, Deserialize)]
struct RawLanguageDocument {
    #[serde(rename = "detectedLanguage")]
    detected_language: RawDetectedLanguage,
}

#[derive(Debug, Deserialize)]
struct RawDetectedLanguage {
    name: String,
}

impl RawLanguageDetection {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// One attempt, no retry. HTTP 200 is the only success status; any other
    /// response is returned with the status code and body intact.
    pub async fn detect_languages(&self, text: &str) -> Result<Vec<String>, TransportError> {
        let body = json!({"documents": [{"id": 1, "text": text}]});
        debug!(target: "user", "Request JSON: {}", body);

        let client = reqwest::Client::new();
        let response = client
            .post(self.config.route(LANGUAGES_ROUTE))
            .header(CONTENT_TYPE, "application/json")
            .header(SUBSCRIPTION_KEY_HEADER, self.config.api_key())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let data = response.text().await?;
        if status != StatusCode::OK {
            return Err(TransportError::Status { status, body: data });
        }

        debug!(target: "user", "Response JSON: {}", data);
        let results: RawLanguagesResponse = serde_json::from_str(&data)?;

        Ok(results
            .documents
            .into_iter()
            .map(|document| document.detected_language.name)
            .collect())
    }
}

#[async_trait]
impl InputHandler for RawLanguageDetection {
    async fn handle(&self, text: &str) {
        match self.detect_languages(text).await {
            Ok(names) => {
                for name in names {
                    info!(target: "user", "Language: {}", name);
                }
            }
            Err(e) => error!(target: "user", "Error detecting language: {}", e),
        }
    }
}
