//! `uisync sync` (one cycle) and `uisync run` (scheduler loop).

use std::time::Duration;

use tabled::Tabled;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use uisync_core::{CategoryReport, SyncReport, Syncer};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, bad, good};

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "List")]
    list: &'static str,
    #[tabled(rename = "To add")]
    planned_additions: usize,
    #[tabled(rename = "To remove")]
    planned_removals: usize,
    #[tabled(rename = "Added")]
    added: String,
    #[tabled(rename = "Removed")]
    removed: String,
    #[tabled(rename = "Failed")]
    failed: String,
    #[tabled(rename = "Gone")]
    unresolved: usize,
}

fn report_row(report: &CategoryReport, color: bool) -> ReportRow {
    let s = report.summary;
    ReportRow {
        list: report.category.list_name(),
        planned_additions: report.planned_additions,
        planned_removals: report.planned_removals,
        added: good(s.added, color),
        removed: good(s.removed, color),
        failed: bad(s.error_count(), color),
        unresolved: s.unresolved,
    }
}

fn report_detail(report: &SyncReport) -> String {
    let color = output::should_color();
    let rows: Vec<ReportRow> = report.categories.iter().map(|c| report_row(c, color)).collect();
    format!(
        "{}\nFinished in {:.1}s",
        output::render_table(&rows),
        report.elapsed().as_secs_f64()
    )
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Run one cycle and print its report.
pub async fn sync_once(syncer: &Syncer, global: &GlobalOpts) -> Result<(), CliError> {
    let report = syncer.run_cycle().await?;
    let out = output::render_single(global.output, &report, report_detail)?;
    output::print_output(&out);
    Ok(())
}

/// Run a cycle, sleep `interval`, repeat. A failed cycle is logged and the
/// next one starts on schedule. Cancellation stops the loop between
/// cycles; a cycle already in flight runs to completion.
pub async fn run_loop(syncer: &Syncer, interval: Duration, cancel: &CancellationToken) {
    info!(interval_secs = interval.as_secs(), "starting scheduler");
    loop {
        match syncer.run_cycle().await {
            Ok(report) => {
                let totals = report.totals();
                info!(
                    added = totals.added,
                    removed = totals.removed,
                    failed = totals.error_count(),
                    "cycle complete"
                );
            }
            Err(e) => error!(error = %e, transient = e.is_transient(), "sync cycle failed"),
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }
    info!("scheduler stopped");
}

/// `uisync run`: the scheduler, stopped by Ctrl-C.
pub async fn run(syncer: &Syncer, interval: Duration) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current cycle");
        }
        on_signal.cancel();
    });

    run_loop(syncer, interval, &cancel).await;
    Ok(())
}
