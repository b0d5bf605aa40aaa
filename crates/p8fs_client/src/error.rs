use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the bootstrap and streaming client.
///
/// Everything here is fatal for the operation that produced it; the one
/// tolerated condition, a malformed stream event, is recovered inside the
/// decoder and never reaches callers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The OS secure random source could not be obtained.
    #[error("secure random source unavailable: {0}")]
    CryptoUnavailable(#[source] rand::Error),

    /// Serializing key material to PKCS#8 / SPKI PEM failed.
    #[error("key encoding failed: {0}")]
    KeyEncoding(String),

    /// Network-level failure, including a bounded wait that expired.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The bootstrap secret was empty; no request was sent.
    #[error("bootstrap secret is empty (set P8FS_DEV_TOKEN_SECRET)")]
    MissingBootstrapSecret,

    /// The registration endpoint answered with a non-200 status.
    #[error("registration rejected with status {status}: {body}")]
    AuthRejected { status: StatusCode, body: String },

    /// A well-formed response or persisted record carried no access token.
    #[error("no access token present")]
    MissingToken,

    /// The completion endpoint answered with a non-success status before
    /// any streaming began.
    #[error("chat completion request failed with status {status}: {body}")]
    CompletionRejected { status: StatusCode, body: String },

    /// I/O failure while saving or loading a session record.
    #[error("failed to access session record at {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No session record exists at the given path.
    #[error("no session record at {0}")]
    NotFound(PathBuf),

    /// The session record file did not parse as a record.
    #[error("session record at {path} is corrupt: {source}")]
    CorruptRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
