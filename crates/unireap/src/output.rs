//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders the run report in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits one MAC per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use unireap_core::{CoreError, Phase, RunReport, SiteOutcome};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Serializable summary ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Completed,
    DryRun,
    Failed,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Completed => "ok",
            Self::DryRun => "dry run",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Serialize)]
struct SiteSummary {
    site: String,
    controller: String,
    status: Status,
    clients_discovered: usize,
    clients_idle: usize,
    devices_forgotten: usize,
    batches_sent: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    idle_macs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    sites: Vec<SiteSummary>,
    devices_forgotten: usize,
    skipped_sites: usize,
}

impl From<&RunReport> for RunSummary {
    fn from(report: &RunReport) -> Self {
        let sites = report
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                SiteOutcome::Completed(r) => SiteSummary {
                    site: r.site.clone(),
                    controller: r.controller.clone(),
                    status: if r.dry_run {
                        Status::DryRun
                    } else {
                        Status::Completed
                    },
                    clients_discovered: r.clients_discovered,
                    clients_idle: r.clients_idle,
                    devices_forgotten: r.devices_forgotten,
                    batches_sent: r.batches_sent,
                    idle_macs: r.idle_macs.clone(),
                    failed_phase: None,
                    error: None,
                },
                SiteOutcome::Failed(err) => {
                    let CoreError::Site {
                        site, controller, ..
                    } = err;
                    let batches_sent = match err.phase() {
                        Phase::Forget { batch, .. } => batch.saturating_sub(1),
                        _ => 0,
                    };
                    SiteSummary {
                        site: site.clone(),
                        controller: controller.clone(),
                        status: Status::Failed,
                        clients_discovered: 0,
                        clients_idle: 0,
                        devices_forgotten: err.devices_forgotten(),
                        batches_sent,
                        idle_macs: Vec::new(),
                        failed_phase: Some(err.phase().to_string()),
                        error: Some(err.api_error().to_string()),
                    }
                }
            })
            .collect();

        Self {
            sites,
            devices_forgotten: report.devices_forgotten(),
            skipped_sites: report.skipped,
        }
    }
}

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Controller")]
    controller: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Clients")]
    clients: usize,
    #[tabled(rename = "Idle")]
    idle: usize,
    #[tabled(rename = "Forgotten")]
    forgotten: usize,
    #[tabled(rename = "Batches")]
    batches: usize,
}

fn row(s: &SiteSummary, color: bool) -> SiteRow {
    let label = match &s.failed_phase {
        Some(phase) => format!("{} ({phase})", s.status.label()),
        None => s.status.label().to_owned(),
    };
    let status = if color {
        match s.status {
            Status::Completed => label.green().to_string(),
            Status::DryRun => label.yellow().to_string(),
            Status::Failed => label.red().to_string(),
        }
    } else {
        label
    };

    SiteRow {
        site: s.site.clone(),
        controller: s.controller.clone(),
        status,
        clients: s.clients_discovered,
        idle: s.clients_idle,
        forgotten: s.devices_forgotten,
        batches: s.batches_sent,
    }
}

// ── Render dispatcher ────────────────────────────────────────────────

/// Render a run report in the chosen format.
///
/// - `table`: one row per site plus a totals line
/// - `json` / `yaml`: the full summary, idle MACs included
/// - `plain`: forgotten MACs (or dry-run candidates), one per line
pub fn render_report(
    format: OutputFormat,
    report: &RunReport,
    color: bool,
) -> Result<String, CliError> {
    let summary = RunSummary::from(report);

    Ok(match format {
        OutputFormat::Table => render_table(&summary, color),
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
        OutputFormat::Yaml => serde_yaml::to_string(&summary)?,
        OutputFormat::Plain => summary
            .sites
            .iter()
            .flat_map(|s| s.idle_macs.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn render_table(summary: &RunSummary, color: bool) -> String {
    let rows: Vec<SiteRow> = summary.sites.iter().map(|s| row(s, color)).collect();
    let mut out = Table::new(rows).with(Style::rounded()).to_string();

    out.push_str(&format!(
        "\n{} devices forgotten across {} sites",
        summary.devices_forgotten,
        summary.sites.len()
    ));
    if summary.skipped_sites > 0 {
        out.push_str(&format!(", {} skipped", summary.skipped_sites));
    }
    out
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use unireap_core::SiteReport;

    use super::*;

    fn completed(site: &str, macs: &[&str], dry_run: bool) -> SiteOutcome {
        SiteOutcome::Completed(SiteReport {
            site: site.into(),
            controller: "https://udm.local/".into(),
            clients_discovered: 10,
            clients_idle: macs.len(),
            devices_forgotten: if dry_run { 0 } else { macs.len() },
            batches_sent: usize::from(!dry_run && !macs.is_empty()),
            dry_run,
            idle_macs: macs.iter().map(|m| (*m).to_owned()).collect(),
        })
    }

    fn report(outcomes: Vec<SiteOutcome>, skipped: usize) -> RunReport {
        RunReport { outcomes, skipped }
    }

    fn failed_on_second_batch(site: &str) -> SiteOutcome {
        SiteOutcome::Failed(CoreError::Site {
            site: site.into(),
            controller: "https://udm.local/".into(),
            phase: Phase::Forget { batch: 2, of: 3 },
            devices_forgotten: 25,
            cause: unireap_core::ApiError::ControllerReported {
                identifier: "forget".into(),
                message: "api.err.Busy".into(),
            },
        })
    }

    #[test]
    fn table_has_totals_line() {
        let r = report(
            vec![
                completed("default", &["aa:bb:cc:dd:ee:01"], false),
                failed_on_second_batch("branch"),
            ],
            2,
        );

        let text = render_report(OutputFormat::Table, &r, false).unwrap();

        assert!(text.contains("default"));
        assert!(text.contains("failed (forget (batch 2 of 3))"));
        assert!(text.ends_with("26 devices forgotten across 2 sites, 2 skipped"));
    }

    #[test]
    fn failed_site_keeps_clients_forgotten_before_the_failure() {
        let r = report(vec![failed_on_second_batch("branch")], 0);

        let text = render_report(OutputFormat::Json, &r, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["sites"][0]["status"], "failed");
        assert_eq!(value["sites"][0]["site"], "branch");
        assert_eq!(value["sites"][0]["devices_forgotten"], 25);
        assert_eq!(value["sites"][0]["batches_sent"], 1);
        assert_eq!(value["devices_forgotten"], 25);
    }

    #[test]
    fn json_includes_status_and_macs() {
        let r = report(vec![completed("default", &["aa:bb:cc:dd:ee:01"], true)], 0);

        let text = render_report(OutputFormat::Json, &r, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["sites"][0]["status"], "dry_run");
        assert_eq!(value["sites"][0]["idle_macs"][0], "aa:bb:cc:dd:ee:01");
        assert_eq!(value["devices_forgotten"], 0);
        assert!(value["sites"][0].get("error").is_none());
    }

    #[test]
    fn plain_lists_one_mac_per_line() {
        let r = report(
            vec![
                completed("a", &["aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02"], false),
                completed("b", &["aa:bb:cc:dd:ee:03"], false),
            ],
            0,
        );

        let text = render_report(OutputFormat::Plain, &r, false).unwrap();

        assert_eq!(
            text,
            "aa:bb:cc:dd:ee:01\naa:bb:cc:dd:ee:02\naa:bb:cc:dd:ee:03"
        );
    }

    #[test]
    fn yaml_renders() {
        let r = report(vec![completed("default", &[], false)], 0);
        let text = render_report(OutputFormat::Yaml, &r, false).unwrap();
        assert!(text.contains("status: completed"));
    }
}
