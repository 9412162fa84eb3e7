use thiserror::Error;

/// Failures talking to the remote store. Every variant is recovered inside
/// the orchestrator by falling back to cached or seed data; callers of the
/// read path never see these as errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network-level failure (DNS, connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with an error payload.
    #[error("remote store error (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// The bounded per-request timeout elapsed. Treated like a transport
    /// failure by the orchestrator.
    #[error("remote request timed out")]
    Timeout,

    /// No remote store was configured. Callers branch on this instead of a
    /// silently-no-op client.
    #[error("remote store is not configured")]
    Unconfigured,
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

/// A storage key could not be turned into a public URL. The resolver
/// degrades to the unresolved reference, so this only surfaces in logs.
#[derive(Debug, Error)]
#[error("could not resolve storage key {key:?}: {reason}")]
pub struct ResolutionError {
    pub key: String,
    pub reason: String,
}

/// A remote row that could not be coerced into a `ContentRecord`.
/// The offending row is dropped with a diagnostic; its siblings survive.
#[derive(Debug, Error)]
#[error("malformed record (id {id:?}): {reason}")]
pub struct MalformedRecord {
    pub id: Option<String>,
    pub reason: String,
}
