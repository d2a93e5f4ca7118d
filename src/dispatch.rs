use eyre::{Result, WrapErr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::report::Report;
use crate::scanner::Scanner;
use crate::types::{RunSummary, ScanOutcome};

/// Runs one scan task per target with at most `concurrency` tasks active.
///
/// - Tasks are admitted in input order; each holds its admission permit
///   until its outcome has been handed to the reporter.
/// - Completions flow over a channel to a single consumer, which owns the
///   progress counter and is the only writer of output.
/// - A run ends only once every permit is free again.
pub struct Dispatcher {
    scanner: Arc<Scanner>,
    concurrency: usize,
    progress: Arc<AtomicUsize>,
}

impl Dispatcher {
    pub fn new(scanner: Scanner, concurrency: usize) -> Self {
        let concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS.min(u32::MAX as usize));
        log::debug!("[dispatch] new: concurrency={}", concurrency);
        Self {
            scanner: Arc::new(scanner),
            concurrency,
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Number of targets completed in the current (or last) run
    pub fn completed(&self) -> usize {
        self.progress.load(Ordering::SeqCst)
    }

    pub async fn run<R: Report>(&self, targets: Vec<String>, mut report: R) -> Result<(RunSummary, R)> {
        let total = targets.len();
        let run_start = Instant::now();
        log::info!("[dispatch] run_starting: targets={} concurrency={} probes={:?}",
            total, self.concurrency, self.scanner.probe_names());

        self.progress.store(0, Ordering::SeqCst);
        report.start(total)?;

        let (tx, rx) = mpsc::unbounded_channel::<ScanOutcome>();
        let consumer = tokio::spawn(consume(rx, report, Arc::clone(&self.progress), total));

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for target in targets {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .wrap_err("Admission semaphore closed")?;
            let scanner = Arc::clone(&self.scanner);
            let tx = tx.clone();

            tasks.spawn(async move {
                let outcome = scanner.scan(&target).await;
                if tx.send(outcome).is_err() {
                    log::error!("[dispatch] reporter_gone: target={}", target);
                }
                drop(permit);
            });

            while let Some(joined) = tasks.try_join_next() {
                reap(joined);
            }
        }
        drop(tx);

        // Every slot free again means every admitted task has finished
        let barrier = semaphore
            .acquire_many(self.concurrency as u32)
            .await
            .wrap_err("Admission semaphore closed")?;
        drop(barrier);

        while let Some(joined) = tasks.join_next().await {
            reap(joined);
        }

        let (summary, report) = consumer.await.wrap_err("Reporter task failed")?;

        log::info!("[dispatch] run_completed: completed={}/{} findings={} unresolved={} duration={}ms",
            summary.completed, summary.total, summary.with_findings, summary.unresolved,
            run_start.elapsed().as_millis());

        Ok((summary, report))
    }
}

fn reap(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        log::error!("[dispatch] task_failed: error={}", e);
    }
}

async fn consume<R: Report>(
    mut rx: mpsc::UnboundedReceiver<ScanOutcome>,
    mut report: R,
    progress: Arc<AtomicUsize>,
    total: usize,
) -> (RunSummary, R) {
    let mut summary = RunSummary {
        total,
        ..RunSummary::default()
    };

    while let Some(outcome) = rx.recv().await {
        let completed = progress.fetch_add(1, Ordering::SeqCst) + 1;
        summary.completed = completed;
        if outcome.has_any() {
            summary.with_findings += 1;
        }
        if outcome.is_unresolved() {
            summary.unresolved += 1;
        }

        if let Err(e) = report.completed(completed, total, &outcome) {
            log::error!("[dispatch] report_failed: target={} error={:#}", outcome.target(), e);
        }
    }

    if let Err(e) = report.finish(&summary) {
        log::error!("[dispatch] report_finish_failed: error={:#}", e);
    }

    (summary, report)
}
