use http::StatusCode;
use thiserror::Error;

/// Errors from calls to the Up API. None of these are retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error("Unexpected status {status} from {path}")]
    UnexpectedStatus { path: String, status: u16 },

    #[error("Failed to decode response from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Invalid pagination cursor {cursor:?}: {source}")]
    InvalidCursor {
        cursor: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Terminal failures of a single webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Failed to read request body: {0}")]
    ReadBody(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to parse webhook event: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("X-Up-Authenticity-Signature header missing or invalid")]
    MissingSignature,

    #[error("Signature verification failed")]
    SignatureMismatch,

    #[error("Failed to resolve transaction {id}: {source}")]
    TransactionFetch {
        id: String,
        #[source]
        source: ApiError,
    },

    #[error("Webhook processing exceeded {timeout_secs}s deadline")]
    DeadlineExceeded { timeout_secs: u64 },
}

impl WebhookError {
    /// HTTP status reported back to the webhook sender.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::ReadBody(_) | WebhookError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::MissingSignature | WebhookError::SignatureMismatch => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::TransactionFetch { .. } | WebhookError::DeadlineExceeded { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Errors building the exporter from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--up-bank-bearer-token-path is required but not set")]
    MissingBearerTokenPath,

    #[error("Bearer token must not be empty")]
    EmptyBearerToken,

    #[error("Webhook secret key file is empty")]
    EmptyWebhookSecret,

    #[error("Bearer token contains characters not allowed in an HTTP header")]
    InvalidBearerToken,

    #[error("Invalid Up API base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to read {what} at {path}: {source}")]
    ReadKeyFile {
        what: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register metric: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
