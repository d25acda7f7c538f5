//! Domain layer between `unireap-api` and the `unireap` CLI.
//!
//! - **[`classify`]** decides which known clients are idle ghosts.
//! - **[`batch`]** splits the candidate MACs into bounded forget batches.
//! - **[`run`]** drives one site end to end ([`run_site`]) and walks every
//!   configured site under a [`FailurePolicy`] ([`run_all`]).
//!
//! Configuration arrives as an explicit [`RunConfig`]; this crate never
//! reads files or environment variables.

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod report;
pub mod run;

// ── Primary re-exports ──────────────────────────────────────────────
pub use batch::{FORGET_BATCH_SIZE, ReclamationBatch};
pub use classify::is_idle;
pub use config::{FailurePolicy, RunConfig, RunOptions, SiteConfig};
pub use error::{CoreError, Phase};
pub use report::{RunReport, SiteOutcome, SiteReport};
pub use run::{run_all, run_site};

pub use unireap_api::{ClientRecord, Error as ApiError, RoutingVariant};
