use thiserror::Error;

/// Top-level error type for the `stman-api` crate.
///
/// Covers every failure mode of a single request/response exchange with
/// the daemon: transport, HTTP status, response decoding, and the local
/// consistency checks made before a write. `stman` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The daemon could not be reached (refused, DNS failure, timeout).
    #[error("Could not connect to Syncthing at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other HTTP transport error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The API key cannot be sent as an HTTP header value.
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response from the daemon.
    #[error("Syncthing API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The daemon rejected a device ID as malformed.
    #[error("Invalid device ID '{id}': {reason}")]
    InvalidDeviceId { id: String, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body did not match the expected schema.
    #[error("Unexpected response from Syncthing: {message}")]
    Protocol { message: String, body: String },

    // ── Local checks ────────────────────────────────────────────────
    /// The object being added already exists in the daemon config.
    #[error("{kind} '{id}' is already configured")]
    Conflict { kind: &'static str, id: String },

    /// The device is already in the folder's share list.
    #[error("Folder '{folder}' is already shared with {device}")]
    AlreadyShared { folder: String, device: String },

    /// The device is not in the folder's share list.
    #[error("Folder '{folder}' is not shared with {device}")]
    NotShared { folder: String, device: String },
}

impl Error {
    /// HTTP status returned by the daemon, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the daemon answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the daemon rejected the API key.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
