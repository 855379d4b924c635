use thiserror::Error;

/// Failures raised by the project directory collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Backend could not be reached or timed out.
    #[error("project directory unavailable: {0}")]
    Unavailable(String),
    /// Backing file could not be read.
    #[error("project directory io: {0}")]
    Io(String),
    /// Backing data was malformed.
    #[error("project directory parse: {0}")]
    Parse(String),
}

/// Failures raised by the record store collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Storage I/O failed.
    #[error("store io: {0}")]
    Io(String),
    /// Payload could not be encoded.
    #[error("store serialization: {0}")]
    Serialization(String),
    /// Backend refused the insert.
    #[error("store rejected insert into {table}: {reason}")]
    Rejected {
        /// Destination table.
        table: String,
        /// Backend reason.
        reason: String,
    },
}

/// Errors surfaced by the voice command runtime.
///
/// Classification itself never fails; these cover the edges around it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoiceError {
    /// Transcript was empty or whitespace only.
    #[error("transcript is empty")]
    EmptyTranscript,
    /// Persisting the request failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Request could not be encoded for persistence.
    #[error("serialization: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for VoiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
