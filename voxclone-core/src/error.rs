use anyhow::anyhow;
use thiserror::Error;

use crate::types::Mode;

/// Problems caught locally, before anything is sent to the service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter the text to convert to speech.")]
    EmptyText,

    #[error("Select a voice sample to clone.")]
    MissingVoiceSample,

    #[error("Only audio files can be uploaded.")]
    NotAudio { media_type: String },

    #[error("A {0} request is already in progress.")]
    Busy(Mode),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Connection refused, DNS failure, reset mid-body and so on.
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),

    #[error("Service returned HTTP status {status}")]
    Status { status: u16 },

    #[error("Service returned unexpected content type {0:?}")]
    UnexpectedContentType(String),

    #[error("Service returned an empty audio payload")]
    EmptyPayload,

    #[error("Malformed response: {0}")]
    Malformed(anyhow::Error),

    #[error("Could not build request: {0}")]
    InvalidRequest(anyhow::Error),
}

impl ServiceError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_decode() {
            Self::Malformed(anyhow!(source))
        } else if source.is_builder() {
            Self::InvalidRequest(anyhow!(source))
        } else {
            Self::Transport(anyhow!(source))
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(source: serde_json::Error) -> Self {
        Self::Malformed(anyhow!(source))
    }
}
