// Controller session
//
// Wraps `reqwest::Client` with routing-aware URL construction, the
// session state machine, and owned response capture. Endpoint methods
// (login, clients) live in sibling files as inherent impls so this module
// stays focused on transport mechanics.

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::legacy::envelope;
use crate::routing::RoutingVariant;
use crate::transcript::{Exchange, TranscriptRecorder};
use crate::transport::{self, TransportConfig};

/// Observable lifecycle of a [`ControllerSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Closed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal state; the CSRF token exists only while authenticated.
pub(crate) enum State {
    Unauthenticated,
    Authenticated { csrf_token: String },
    Closed,
}

/// Authenticated HTTP context for one site on one controller.
///
/// Owns its cookie jar, TLS policy, and CSRF token. Never shared between
/// sites and never reused across runs.
pub struct ControllerSession {
    pub(crate) http: reqwest::Client,
    cookie_jar: Arc<Jar>,
    base_url: String,
    site: String,
    routing: RoutingVariant,
    pub(crate) state: State,
    transcript: Option<TranscriptRecorder>,
}

impl ControllerSession {
    /// Create an unauthenticated session.
    ///
    /// `base_url` is the controller root (`https://udm.local` for a gateway,
    /// `https://controller:8443` for a standalone application).
    pub fn new(
        base_url: &Url,
        site: impl Into<String>,
        routing: RoutingVariant,
        transport: &TransportConfig,
        transcript: Option<TranscriptRecorder>,
    ) -> Result<Self, Error> {
        let cookie_jar = Arc::new(Jar::default());
        let http = transport.build_client(&cookie_jar)?;
        Ok(Self {
            http,
            cookie_jar,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            site: site.into(),
            routing,
            state: State::Unauthenticated,
            transcript,
        })
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn routing(&self) -> RoutingVariant {
        self.routing
    }

    pub fn state(&self) -> SessionState {
        match self.state {
            State::Unauthenticated => SessionState::Unauthenticated,
            State::Authenticated { .. } => SessionState::Authenticated,
            State::Closed => SessionState::Closed,
        }
    }

    /// Root for every call except login: the controller URL, plus
    /// `/proxy/network` on gateway-proxied hosts.
    pub fn api_base(&self) -> String {
        format!("{}{}", self.base_url, self.routing.api_prefix())
    }

    /// End the session. Further calls fail with [`Error::InvalidState`].
    pub fn close(&mut self) {
        debug!(site = %self.site, "closing session");
        self.state = State::Closed;
    }

    // ── State guards ─────────────────────────────────────────────────

    pub(crate) fn csrf_token(&self, operation: &'static str) -> Result<&str, Error> {
        match &self.state {
            State::Authenticated { csrf_token } => Ok(csrf_token),
            _ => Err(Error::InvalidState {
                operation,
                state: self.state().as_str(),
            }),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}{login_path}` -- the proxy prefix never applies to auth.
    pub(crate) fn login_url(&self) -> Result<Url, Error> {
        let full = format!("{}{}", self.base_url, self.routing.login_path());
        Ok(Url::parse(&full)?)
    }

    /// `{apiBase}/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!("{}/api/s/{}/{path}", self.api_base(), self.site);
        Ok(Url::parse(&full)?)
    }

    // ── Request execution ────────────────────────────────────────────

    /// Send a built request and capture the full response.
    ///
    /// The body is read into memory exactly once here, so the connection
    /// is released before any decoding happens. `logged_body` overrides
    /// what the transcript shows for the request body.
    pub(crate) async fn execute(
        &self,
        request: reqwest::Request,
        logged_body: Option<String>,
    ) -> Result<CapturedResponse, Error> {
        let method = request.method().clone();
        let url = request.url().clone();
        let request_headers = self.outgoing_headers(&request);
        let request_body = logged_body.unwrap_or_else(|| {
            request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default()
        });

        debug!("{method} {url}");

        let resp = self.http.execute(request).await?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let peer_certificate_len = resp
            .extensions()
            .get::<reqwest::tls::TlsInfo>()
            .map(|info| info.peer_certificate().map(<[u8]>::len));
        let body = resp.text().await?;

        trace!(%status, bytes = body.len(), "response received");

        if let Some(recorder) = &self.transcript {
            recorder.record(&Exchange {
                method,
                url: &url,
                request_headers: &request_headers,
                request_body: &request_body,
                status,
                response_headers: &headers,
                response_body: &body,
                peer_certificate_len,
            })?;
        }

        Ok(CapturedResponse {
            status,
            headers,
            body,
        })
    }

    /// Request headers as sent: the client adds `Cookie` from the jar and
    /// its default `User-Agent` only at send time.
    fn outgoing_headers(&self, request: &reqwest::Request) -> HeaderMap {
        let mut headers = request.headers().clone();
        if !headers.contains_key(COOKIE) {
            if let Some(cookies) = self.cookie_jar.cookies(request.url()) {
                headers.insert(COOKIE, cookies);
            }
        }
        headers
            .entry(USER_AGENT)
            .or_insert(HeaderValue::from_static(transport::USER_AGENT));
        headers
    }
}

/// A fully read HTTP response.
#[derive(Debug)]
pub(crate) struct CapturedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedResponse {
    /// Run the body through the envelope validator and return `data`.
    ///
    /// Controllers answer most failures with an `rc: "error"` envelope and a
    /// 4xx status; those classify like any other envelope. A non-2xx reply
    /// that is not an envelope becomes [`Error::HttpStatus`].
    pub fn into_data<T: DeserializeOwned>(self, identifier: &str) -> Result<Vec<T>, Error> {
        if !self.status.is_success() {
            if let Ok(head) = envelope::decode::<IgnoredAny>(&self.body, identifier) {
                envelope::validate(&head.meta, &self.body, identifier)?;
            }
            return Err(Error::HttpStatus {
                identifier: identifier.to_owned(),
                status: self.status.as_u16(),
                body: self.body,
            });
        }

        envelope::unwrap(&self.body, identifier)
    }
}

impl fmt::Debug for ControllerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerSession")
            .field("base_url", &self.base_url)
            .field("site", &self.site)
            .field("routing", &self.routing)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
