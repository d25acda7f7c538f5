use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `unireap-api` crate.
///
/// Covers every failure mode of a controller session: transport, login
/// contract, envelope validation, session state, and transcript capture.
/// `unireap-core` attaches the site and phase before surfacing these.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected at the HTTP level (wrong credentials, locked account).
    #[error("Authentication failed (HTTP {status}): {body}")]
    Authentication { status: u16, body: String },

    /// Login returned 2xx but the body had no `unique_id`.
    #[error("Login response did not contain a unique ID")]
    MissingIdentifier,

    /// Login returned 2xx but without an `X-Csrf-Token` header.
    #[error("Login response did not contain a CSRF token")]
    MissingCsrfToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS handshake).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the TLS-configured HTTP client failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-2xx response whose body is not a controller envelope.
    #[error("Unexpected HTTP {status} from UniFi {identifier}: {body}")]
    HttpStatus {
        identifier: String,
        status: u16,
        body: String,
    },

    // ── Envelope ────────────────────────────────────────────────────
    /// Response body is not valid JSON for the expected shape.
    #[error("Error decoding UniFi {identifier} response: {message}")]
    Decode {
        identifier: String,
        message: String,
        body: String,
    },

    /// Envelope carried `meta.rc == "error"`.
    #[error("Error in UniFi {identifier} response: {message}")]
    ControllerReported { identifier: String, message: String },

    /// Envelope carried any `meta.rc` other than `"ok"` or `"error"`, or none.
    #[error("Error with unexpected UniFi {identifier} response: {body}")]
    UnexpectedResponse { identifier: String, body: String },

    // ── Session ─────────────────────────────────────────────────────
    /// Operation attempted in the wrong session state.
    #[error("Cannot {operation}: session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// A forget call was requested with no MAC addresses.
    #[error("Refusing to send an empty forget batch")]
    EmptyBatch,

    // ── Transcript ──────────────────────────────────────────────────
    /// Writing an HTTP transcript file failed.
    #[error("Error writing HTTP log file {}: {source}", path.display())]
    Transcript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if the controller refused or half-completed the login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::MissingIdentifier | Self::MissingCsrfToken
        )
    }

    /// Returns `true` if the controller could not be reached at all.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Tls(_) => true,
            _ => false,
        }
    }

    /// The raw response body carried by this error, if any.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Authentication { body, .. }
            | Self::HttpStatus { body, .. }
            | Self::Decode { body, .. }
            | Self::UnexpectedResponse { body, .. } => Some(body),
            _ => None,
        }
    }
}
