// Session login
//
// Cookie-based login. The endpoint sets a session cookie in the session's
// jar and returns the CSRF token as a response header; both are required
// before any other call is allowed.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::legacy::models::{LoginRequest, LoginResponse};
use crate::legacy::session::{ControllerSession, State};
use crate::transcript::redacted_login_body;

const CSRF_HEADER: &str = "X-Csrf-Token";

impl ControllerSession {
    /// Authenticate with username/password.
    ///
    /// The endpoint differs by routing variant:
    /// - Gateway-proxied: `POST /api/auth/login`
    /// - Direct: `POST /api/login`
    ///
    /// A 2xx reply only counts as a login when the body carries a non-empty
    /// `unique_id` and the headers carry a non-empty `X-Csrf-Token`. On any
    /// failure the session stays unauthenticated.
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        if !matches!(self.state, State::Unauthenticated) {
            return Err(Error::InvalidState {
                operation: "log in",
                state: self.state().as_str(),
            });
        }

        let url = self.login_url()?;
        debug!("logging in at {}", url);

        let request = self
            .http
            .post(url)
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            })
            .build()?;

        let response = self
            .execute(request, Some(redacted_login_body(username)))
            .await?;

        if !response.status.is_success() {
            let status = response.status.as_u16();
            return Err(if matches!(status, 400 | 401 | 403) {
                Error::Authentication {
                    status,
                    body: response.body,
                }
            } else {
                Error::HttpStatus {
                    identifier: "login".into(),
                    status,
                    body: response.body,
                }
            });
        }

        let login: LoginResponse =
            serde_json::from_str(&response.body).map_err(|e| Error::Decode {
                identifier: "login".into(),
                message: e.to_string(),
                body: response.body.clone(),
            })?;

        if login.unique_id.as_deref().is_none_or(str::is_empty) {
            return Err(Error::MissingIdentifier);
        }

        let csrf_token = response
            .headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingCsrfToken)?;

        debug!("login successful");
        self.state = State::Authenticated {
            csrf_token: csrf_token.to_owned(),
        };
        Ok(())
    }
}
