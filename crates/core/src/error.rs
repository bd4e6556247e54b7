use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when every transcript strategy came back empty.
pub const TRANSCRIPT_UNAVAILABLE_MESSAGE: &str =
    "Transcript not accessible. Try toggling captions and reload.";

#[derive(Error, Debug)]
pub enum ScholarSyncError {
    #[error("{}", TRANSCRIPT_UNAVAILABLE_MESSAGE)]
    TranscriptUnavailable,

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("{reason}")]
    UpstreamInvalid { reason: String, raw: String },

    #[error("Upstream returned {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Model backend failed: {0}")]
    Model(#[source] Box<ScholarSyncError>),
}

impl ScholarSyncError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn upstream_invalid(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::UpstreamInvalid {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Attribute a transport failure to the model backend. Other errors are
    /// returned unchanged.
    pub fn from_model(self) -> Self {
        match self {
            err @ (Self::HttpStatus { .. } | Self::ApiError(_)) => Self::Model(Box::new(err)),
            other => other,
        }
    }

    /// HTTP status class a server front end would answer with.
    ///
    /// Transport failures are a bad gateway only when the model backend
    /// produced them; any other transport failure is a 500.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::TranscriptUnavailable => StatusCode::NOT_FOUND,
            Self::UpstreamInvalid { .. } | Self::Model(_) => StatusCode::BAD_GATEWAY,
            Self::HttpStatus { .. }
            | Self::ApiError(_)
            | Self::MissingApiKey { .. }
            | Self::Config { .. }
            | Self::IoError(_)
            | Self::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScholarSyncError>;
