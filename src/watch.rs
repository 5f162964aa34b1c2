//! Live regeneration: rerun the compiler whenever a source file changes.
//!
//! Sources are polled rather than subscribed to, which behaves the same on
//! every platform and on network shares. A burst of saves (spreadsheet
//! exports often touch a file several times) is collapsed by a debounce
//! window into a single run. Runs never overlap: the loop waits for each one.

use crate::compiler::{compile, CompileReport};
use crate::config::Config;
use crate::errors::CompileResult;
use log::{debug, error, info};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Last seen `(mtime, len)` of each watched file. `None` means absent.
#[derive(Debug, Clone, Default)]
pub struct SourceStamps {
    stamps: Vec<(PathBuf, Option<(SystemTime, u64)>)>,
}

impl SourceStamps {
    pub fn new(paths: &[&Path]) -> Self {
        Self {
            stamps: paths.iter().map(|p| (p.to_path_buf(), stamp(p))).collect(),
        }
    }

    /// Re-read every stamp. Returns `true` if any changed since the last poll.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for (path, last) in &mut self.stamps {
            let now = stamp(path);
            if now != *last {
                debug!("source changed: {}", path.display());
                *last = now;
                changed = true;
            }
        }
        changed
    }
}

fn stamp(path: &Path) -> Option<(SystemTime, u64)> {
    let meta = std::fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

/// Collapses a burst of change notifications into one trigger that fires
/// once `window` has passed since the most recent notification.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` exactly once per settled burst.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Counters reported when the watch loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub runs: usize,
    pub failures: usize,
}

/// Receives the running [`WatchSummary`] after every run.
pub type StatusSender = tokio::sync::watch::Sender<WatchSummary>;

/// Compile once, then recompile on every settled change until `shutdown`
/// resolves. A failed run is logged and the previous output stays in place.
/// The counters are published on `status` after each run.
pub async fn watch_until<F>(config: Config, shutdown: F, status: StatusSender) -> WatchSummary
where
    F: Future<Output = ()>,
{
    let paths = config.sources.paths();
    let mut stamps = SourceStamps::new(&paths);
    let mut debouncer = Debouncer::new(config.watch.debounce());
    let mut summary = WatchSummary::default();

    info!(
        "watching {} and {} (poll {:?}, debounce {:?})",
        config.sources.levels.display(),
        config.sources.worlds.display(),
        config.watch.poll_interval(),
        config.watch.debounce()
    );
    run_once(&config, &mut summary).await;
    status.send_replace(summary);

    let mut ticker = tokio::time::interval(config.watch.poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("watch stopped after {} runs ({} failed)", summary.runs, summary.failures);
                break;
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                if stamps.poll() {
                    debouncer.notify(now);
                }
                if debouncer.ready(now) {
                    info!("source change settled, recompiling");
                    run_once(&config, &mut summary).await;
                    status.send_replace(summary);
                }
            }
        }
    }
    summary
}

/// [`watch_until`] stopped by Ctrl-C.
pub async fn watch(config: Config) -> WatchSummary {
    let (status, _) = tokio::sync::watch::channel(WatchSummary::default());
    watch_until(
        config,
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
        status,
    )
    .await
}

async fn run_once(config: &Config, summary: &mut WatchSummary) {
    let cfg = config.clone();
    let result: CompileResult<CompileReport> =
        match tokio::task::spawn_blocking(move || compile(&cfg)).await {
            Ok(result) => result,
            Err(e) => {
                error!("compile task panicked: {}", e);
                summary.runs += 1;
                summary.failures += 1;
                return;
            }
        };
    summary.runs += 1;
    match result {
        Ok(report) => info!(
            "rebuilt {} levels in {} worlds",
            report.levels, report.worlds
        ),
        Err(e) => {
            summary.failures += 1;
            error!("compile failed, keeping previous output: {}", e);
        }
    }
}
