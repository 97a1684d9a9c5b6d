mod analyzer;
mod client;
mod error;
mod models;
mod raw;

pub mod prelude {
    pub use super::analyzer::{TextAnalyzer, UNKNOWN_LABEL};
    pub use super::client::{
        HttpTextAnalytics, MockTextAnalytics, SUBSCRIPTION_KEY_HEADER, TextAnalytics,
    };
    pub use super::error::TransportError;
    pub use super::models::{
        DetectedLanguage, NamedEntity, Sentiment, SummarySentence, TextDocumentInput,
    };
    pub use super::raw::RawLanguageDetection;
}
