// ── Core error types ──
//
// Every failure is fatal for the site it happens in. `CoreError::Site`
// pins the failure to a site and a phase so the CLI can print a single
// line naming both.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::SiteConfig;

/// The step of a site run that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum Phase {
    /// Building the HTTP client (TLS setup).
    Connect,
    Login,
    List,
    /// Forget batch `batch` (1-based) of `of`.
    Forget { batch: usize, of: usize },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("connect"),
            Self::Login => f.write_str("login"),
            Self::List => f.write_str("list"),
            Self::Forget { batch, of } => write!(f, "forget (batch {batch} of {of})"),
        }
    }
}

/// A site run that stopped early.
///
/// Every failure is fatal for its site; `devices_forgotten` counts the
/// clients already removed by earlier batches, which stay removed.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Site '{site}' at {controller}: {phase} failed: {cause}")]
    Site {
        site: String,
        controller: String,
        phase: Phase,
        devices_forgotten: usize,
        cause: unireap_api::Error,
    },
}

impl CoreError {
    pub(crate) fn site(site: &SiteConfig, phase: Phase, cause: unireap_api::Error) -> Self {
        Self::Site {
            site: site.site.clone(),
            controller: site.controller.to_string(),
            phase,
            devices_forgotten: 0,
            cause,
        }
    }

    /// Record clients forgotten by batches that completed before the failure.
    pub(crate) fn with_devices_forgotten(mut self, count: usize) -> Self {
        let Self::Site {
            devices_forgotten, ..
        } = &mut self;
        *devices_forgotten = count;
        self
    }

    pub fn phase(&self) -> Phase {
        let Self::Site { phase, .. } = self;
        *phase
    }

    pub fn devices_forgotten(&self) -> usize {
        let Self::Site {
            devices_forgotten, ..
        } = self;
        *devices_forgotten
    }

    /// The underlying API error.
    pub fn api_error(&self) -> &unireap_api::Error {
        let Self::Site { cause, .. } = self;
        cause
    }

    pub fn is_auth_failure(&self) -> bool {
        self.api_error().is_auth_failure()
    }

    pub fn is_connection_failure(&self) -> bool {
        self.api_error().is_connection_failure()
    }
}
