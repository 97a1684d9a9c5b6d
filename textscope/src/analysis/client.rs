use super::error::TransportError;
use super::models::{
    DetectedLanguage, DocumentBatch, DocumentsEnvelope, EntitiesDocument, KeyPhrasesDocument,
    LanguageDocument, NamedEntity, Sentiment, SentimentDocument, SummarySentence,
    TextDocumentInput,
};
use crate::shared::prelude::ServiceConfig;
use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "operation-location";

pub const LANGUAGES_ROUTE: &str = "text/analytics/v3.1/languages";
const SENTIMENT_ROUTE: &str = "text/analytics/v3.1/sentiment";
const KEY_PHRASES_ROUTE: &str = "text/analytics/v3.1/keyPhrases";
const ENTITIES_ROUTE: &str = "text/analytics/v3.1/entities/recognition/general";
const ANALYZE_ROUTE: &str = "text/analytics/v3.1/analyze";

const MAX_SUMMARY_SENTENCES: u32 = 10;
const JOB_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// One capability per method: submit one document, get one annotated result.
#[automock]
#[async_trait]
pub trait TextAnalytics: Send + Sync {
    async fn detect_language(&self, text: &str) -> Result<DetectedLanguage, TransportError>;
    async fn analyze_sentiment(&self, text: &str) -> Result<Sentiment, TransportError>;
    async fn extract_key_phrases(&self, text: &str) -> Result<Vec<String>, TransportError>;
    async fn recognize_entities(&self, text: &str) -> Result<Vec<NamedEntity>, TransportError>;

    /// Summarization runs as a long-running job: submit, poll until the job
    /// completes, then drain every result page into one ordered sequence.
    async fn extract_summary(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<SummarySentence>, TransportError>;
}

/// [`TextAnalytics`] over the hosted REST routes. Every call builds its own
/// connection, scoped to that call; there is no pooling across calls.
#[derive(Debug, Clone)]
pub struct HttpTextAnalytics {
    config: ServiceConfig,
}

impl HttpTextAnalytics {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    async fn submit_single<T: DeserializeOwned>(
        &self,
        route: &str,
        text: &str,
    ) -> Result<T, TransportError> {
        let batch = DocumentBatch::single(TextDocumentInput::new(text));

        let client = reqwest::Client::new();
        let response = client
            .post(self.config.route(route))
            .header(CONTENT_TYPE, "application/json")
            .header(SUBSCRIPTION_KEY_HEADER, self.config.api_key())
            .json(&batch)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status { status, body });
        }

        debug!("Response from {}: {}", route, body);

        let envelope: DocumentsEnvelope<T> = serde_json::from_str(&body)?;
        envelope
            .documents
            .into_iter()
            .next()
            .ok_or(TransportError::EmptyResponse)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        client: &reqwest::Client,
        url: &str,
    ) -> Result<T, TransportError> {
        let response = client
            .get(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.config.api_key())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn wait_for_job(
        &self,
        client: &reqwest::Client,
        operation_url: &str,
    ) -> Result<SummaryJobState, TransportError> {
        loop {
            let state: SummaryJobState = self.get_json(client, operation_url).await?;
            match state.status {
                JobStatus::Succeeded => return Ok(state),
                JobStatus::Failed | JobStatus::Cancelled => {
                    return Err(TransportError::Operation {
                        status: state.status.to_string(),
                    });
                }
                JobStatus::NotStarted | JobStatus::Running => {
                    debug!("Summarization job still {}", state.status);
                    tokio::time::sleep(JOB_POLL_INTERVAL).await;
                }
            }
        }
    }

    async fn drain_summary_pages(
        &self,
        client: &reqwest::Client,
        state: SummaryJobState,
    ) -> Result<Vec<SummarySentence>, TransportError> {
        let mut page = state.into_first_page()?;
        let mut sentences = Vec::new();

        loop {
            let next_link = page.next_link.take();
            for document in page.documents {
                sentences.extend(document.sentences);
            }
            match next_link {
                Some(url) => page = self.get_json(client, &url).await?,
                None => break,
            }
        }

        Ok(sentences)
    }
}

#[async_trait]
impl TextAnalytics for HttpTextAnalytics {
    async fn detect_language(&self, text: &str) -> Result<DetectedLanguage, TransportError> {
        let document: LanguageDocument = self.submit_single(LANGUAGES_ROUTE, text).await?;
        Ok(document.detected_language)
    }

    async fn analyze_sentiment(&self, text: &str) -> Result<Sentiment, TransportError> {
        let document: SentimentDocument = self.submit_single(SENTIMENT_ROUTE, text).await?;
        Ok(document.sentiment)
    }

    async fn extract_key_phrases(&self, text: &str) -> Result<Vec<String>, TransportError> {
        let document: KeyPhrasesDocument = self.submit_single(KEY_PHRASES_ROUTE, text).await?;
        Ok(document.key_phrases)
    }

    async fn recognize_entities(&self, text: &str) -> Result<Vec<NamedEntity>, TransportError> {
        let document: EntitiesDocument = self.submit_single(ENTITIES_ROUTE, text).await?;
        Ok(document.entities)
    }

    #[instrument(skip_all)]
    async fn extract_summary(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<SummarySentence>, TransportError> {
        let job = SummaryJobRequest::new(text, language);

        let client = reqwest::Client::new();
        let response = client
            .post(self.config.route(ANALYZE_ROUTE))
            .header(CONTENT_TYPE, "application/json")
            .header(SUBSCRIPTION_KEY_HEADER, self.config.api_key())
            .json(&job)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            let body = response.text().await?;
            return Err(TransportError::Status { status, body });
        }

        let operation_url = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .ok_or(TransportError::MissingOperationLocation)?;

        debug!("Summarization job accepted at {}", operation_url);

        let state = self.wait_for_job(&client, &operation_url).await?;
        self.drain_summary_pages(&client, state).await
    }
}

#[derive(Debug, serde::Serialize)]
struct SummaryJobRequest {
    #[serde(rename = "analysisInput")]
    analysis_input: DocumentBatch,
    tasks: SummaryJobTasks,
}

#[derive(Debug, serde::Serialize)]
struct SummaryJobTasks {
    #[serde(rename = "extractiveSummarizationTasks")]
    extractive_summarization_tasks: Vec<SummaryTask>,
}

#[derive(Debug, serde::Serialize)]
struct SummaryTask {
    parameters: SummaryTaskParameters,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryTaskParameters {
    sentence_count: u32,
    sort_by: &'static str,
}

impl SummaryJobRequest {
    fn new(text: &str, language: &str) -> Self {
        Self {
            analysis_input: DocumentBatch::single(TextDocumentInput::with_language(
                text, language,
            )),
            tasks: SummaryJobTasks {
                extractive_summarization_tasks: vec![SummaryTask {
                    parameters: SummaryTaskParameters {
                        sentence_count: MAX_SUMMARY_SENTENCES,
                        sort_by: "Offset",
                    },
                }],
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
enum JobStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Debug, Deserialize)]
struct SummaryJobState {
    status: JobStatus,
    #[serde(default)]
    tasks: Option<CompletedTasks>,
}

#[derive(Debug, Deserialize)]
struct CompletedTasks {
    #[serde(rename = "extractiveSummarizationTasks", default)]
    extractive_summarization_tasks: Vec<CompletedSummaryTask>,
}

#[derive(Debug, Deserialize)]
struct CompletedSummaryTask {
    results: SummaryResultPage,
}

#[derive(Debug, Deserialize)]
struct SummaryResultPage {
    documents: Vec<SummaryDocument>,
    #[serde(rename = "@nextLink", default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryDocument {
    sentences: Vec<SummarySentence>,
}

impl SummaryJobState {
    fn into_first_page(self) -> Result<SummaryResultPage, TransportError> {
        self.tasks
            .and_then(|tasks| tasks.extractive_summarization_tasks.into_iter().next())
            .map(|task| task.results)
            .ok_or(TransportError::EmptyResponse)
    }
}
