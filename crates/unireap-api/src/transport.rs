// Transport configuration for building the session's reqwest::Client.
//
// Each session gets its own client and its own cookie jar; nothing here
// is shared between sites.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use tracing::warn;

use crate::error::Error;

/// `User-Agent` sent on every controller call.
pub(crate) const USER_AGENT: &str = concat!("unireap/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Verify the controller certificate against the system roots.
    #[default]
    Verify,
    /// Accept any certificate (self-signed controllers, operator opt-in).
    DangerAcceptInvalid,
}

impl TlsMode {
    /// Translate a site's `verify_tls` flag.
    pub fn from_verify(verify: bool) -> Self {
        if verify {
            Self::Verify
        } else {
            Self::DangerAcceptInvalid
        }
    }
}

/// Transport configuration for one controller session.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// `None` keeps the reqwest default (no overall request timeout).
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new(tls: TlsMode) -> Self {
        Self { tls, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a `reqwest::Client` wired to the given cookie jar.
    ///
    /// TLS info capture is always enabled so transcripts can report the
    /// peer certificate.
    pub fn build_client(&self, jar: &Arc<Jar>) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(jar))
            .tls_info(true);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if self.tls == TlsMode::DangerAcceptInvalid {
            warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
