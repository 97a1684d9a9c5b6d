use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between building a request and handing back
/// a typed result. Callers map these to display sentinels; nothing retries.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Unable to reach the service. {error:?}")]
    Request {
        #[from]
        error: reqwest::Error,
    },
    #[error("Service responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Unable to parse service response. {error:?}")]
    Malformed {
        #[from]
        error: serde_json::Error,
    },
    #[error("Service response contained no documents")]
    EmptyResponse,
    #[error("Summarization job ended as '{status}' before producing results")]
    Operation { status: String },
    #[error("Service accepted the job but sent no operation-location header")]
    MissingOperationLocation,
}
