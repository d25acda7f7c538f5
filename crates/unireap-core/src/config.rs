// ── Runtime run configuration ──
//
// These types describe *what* to reap and *how* to reach each controller.
// They carry credential data but never touch disk. The config crate builds
// a `RunConfig` and the CLI hands it in.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use unireap_api::{RoutingVariant, TlsMode, TransportConfig};

use crate::batch::FORGET_BATCH_SIZE;

/// One controller site to reap.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Controller root URL (e.g. `https://udm.local`).
    pub controller: Url,
    pub routing: RoutingVariant,
    /// Site name as used in `/api/s/{site}/...` (usually `default`).
    pub site: String,
    pub username: String,
    pub password: SecretString,
    /// `false` accepts any certificate.
    pub verify_tls: bool,
    /// Overall request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl SiteConfig {
    pub fn transport(&self) -> TransportConfig {
        let transport = TransportConfig::new(TlsMode::from_verify(self.verify_tls));
        match self.timeout {
            Some(timeout) => transport.with_timeout(timeout),
            None => transport,
        }
    }
}

/// What happens to the remaining sites when one site fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole run at the first failing site.
    #[default]
    AbortRun,
    /// Record the failure and move on to the next site.
    ContinueWithNextSite,
}

/// Per-site knobs shared by every site in a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Write one raw HTTP transcript file per call into this directory.
    pub transcript_dir: Option<PathBuf>,
    /// List and classify, but never send a forget command.
    pub dry_run: bool,
    pub batch_size: NonZeroUsize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            transcript_dir: None,
            dry_run: false,
            batch_size: FORGET_BATCH_SIZE,
        }
    }
}

/// Everything a multi-site run needs.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Processed strictly in this order.
    pub sites: Vec<SiteConfig>,
    pub options: RunOptions,
    pub failure_policy: FailurePolicy,
}
