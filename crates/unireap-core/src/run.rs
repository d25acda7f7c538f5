// ── Site run orchestration ──
//
// One site: session → login → list → classify → plan → forget, strictly
// in order, stopping at the first failure. Many sites: one after another
// in configuration order, each with its own session.

use tracing::{debug, info, warn};

use unireap_api::{ControllerSession, TranscriptRecorder};

use crate::batch;
use crate::classify;
use crate::config::{FailurePolicy, RunConfig, RunOptions, SiteConfig};
use crate::error::{CoreError, Phase};
use crate::report::{RunReport, SiteOutcome, SiteReport};

/// Reap idle clients from one site.
///
/// The session is closed on every exit path. A failed forget batch stops
/// the run; later batches are never sent.
pub async fn run_site(site: &SiteConfig, options: &RunOptions) -> Result<SiteReport, CoreError> {
    info!(
        site = %site.site,
        controller = %site.controller,
        routing = %site.routing,
        "starting site run"
    );

    let transcript = options.transcript_dir.as_ref().map(TranscriptRecorder::new);
    let mut session = ControllerSession::new(
        &site.controller,
        site.site.as_str(),
        site.routing,
        &site.transport(),
        transcript,
    )
    .map_err(|e| CoreError::site(site, Phase::Connect, e))?;

    let result = reap(&mut session, site, options).await;
    session.close();
    result
}

async fn reap(
    session: &mut ControllerSession,
    site: &SiteConfig,
    options: &RunOptions,
) -> Result<SiteReport, CoreError> {
    session
        .login(&site.username, &site.password)
        .await
        .map_err(|e| CoreError::site(site, Phase::Login, e))?;
    info!("login complete");

    let clients = session
        .list_clients()
        .await
        .map_err(|e| CoreError::site(site, Phase::List, e))?;

    let idle_macs = classify::idle_macs(&clients);
    info!(
        clients = clients.len(),
        idle = idle_macs.len(),
        "client list retrieved"
    );

    let mut report = SiteReport {
        site: site.site.clone(),
        controller: site.controller.to_string(),
        clients_discovered: clients.len(),
        clients_idle: idle_macs.len(),
        devices_forgotten: 0,
        batches_sent: 0,
        dry_run: options.dry_run,
        idle_macs: Vec::new(),
    };

    if options.dry_run {
        info!("dry run, no clients forgotten");
        report.idle_macs = idle_macs;
        return Ok(report);
    }

    let batches = batch::plan(&idle_macs, options.batch_size);
    let total = batches.len();

    for (index, chunk) in batches.iter().enumerate() {
        let phase = Phase::Forget {
            batch: index + 1,
            of: total,
        };
        let forgotten = report.devices_forgotten;
        session.forget_batch(&chunk.macs).await.map_err(|e| {
            CoreError::site(site, phase, e).with_devices_forgotten(forgotten)
        })?;

        report.devices_forgotten += chunk.len();
        report.batches_sent += 1;
        debug!(
            from = chunk.offset,
            to = chunk.offset + chunk.len(),
            "forget batch complete"
        );
    }

    info!(forgotten = report.devices_forgotten, "site run complete");
    report.idle_macs = idle_macs;
    Ok(report)
}

/// Run every configured site in order under the configured failure policy.
pub async fn run_all(config: &RunConfig) -> RunReport {
    let mut report = RunReport::default();

    for (index, site) in config.sites.iter().enumerate() {
        match run_site(site, &config.options).await {
            Ok(site_report) => report.outcomes.push(SiteOutcome::Completed(site_report)),
            Err(err) => {
                warn!(error = %err, "site run failed");
                report.outcomes.push(SiteOutcome::Failed(err));

                if config.failure_policy == FailurePolicy::AbortRun {
                    report.skipped = config.sites.len() - index - 1;
                    if report.skipped > 0 {
                        warn!(skipped = report.skipped, "aborting remaining sites");
                    }
                    break;
                }
            }
        }
    }

    report
}
