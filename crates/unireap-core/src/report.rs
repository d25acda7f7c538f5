// Run outcome reporting
//
// Plain data for the CLI to render. Nothing here performs I/O.

use serde::Serialize;

use crate::error::CoreError;

/// Counts from one successful site run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteReport {
    pub site: String,
    pub controller: String,
    pub clients_discovered: usize,
    pub clients_idle: usize,
    pub devices_forgotten: usize,
    pub batches_sent: usize,
    pub dry_run: bool,
    /// MACs classified idle, in discovery order.
    pub idle_macs: Vec<String>,
}

/// How one site ended.
#[derive(Debug)]
pub enum SiteOutcome {
    Completed(SiteReport),
    Failed(CoreError),
}

/// Outcomes of a multi-site run, in configuration order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<SiteOutcome>,
    /// Sites never attempted because an earlier site aborted the run.
    pub skipped: usize,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn completed(&self) -> impl Iterator<Item = &SiteReport> {
        self.outcomes.iter().filter_map(|o| match o {
            SiteOutcome::Completed(report) => Some(report),
            SiteOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &CoreError> {
        self.outcomes.iter().filter_map(|o| match o {
            SiteOutcome::Failed(err) => Some(err),
            SiteOutcome::Completed(_) => None,
        })
    }

    /// Total devices forgotten, including batches that completed before
    /// a site failed.
    pub fn devices_forgotten(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                SiteOutcome::Completed(report) => report.devices_forgotten,
                SiteOutcome::Failed(err) => err.devices_forgotten(),
            })
            .sum()
    }
}
