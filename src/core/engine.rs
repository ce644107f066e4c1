//! Concurrent folder validation
//!
//! One producer walks the root and feeds a bounded queue, a fixed pool of
//! workers filters and verifies each path, and a single aggregator folds the
//! outcomes into the folder's [`Report`].

use crossbeam_channel::{Receiver, Sender};
use indicatif::ProgressBar;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, warn};

use super::digest;
use super::error::{Error, Result};
use super::report::{FileOutcome, Report};
use crate::scanner::exclusion::ExclusionFilter;
use crate::scanner::file_scanner::regular_files;

/// Default size of the per-folder worker pool.
pub const DEFAULT_WORKERS: usize = 4;

/// Queue slots per worker between the walker and the pool.
const QUEUE_DEPTH_PER_WORKER: usize = 64;

type Outcome = (PathBuf, io::Result<FileOutcome>);

/// Run-wide settings shared by every folder.
#[derive(Clone)]
pub struct Options {
    workers: usize,
    cancel: Arc<AtomicBool>,
    progress: ProgressBar,
}

impl Options {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            cancel: Arc::new(AtomicBool::new(false)),
            progress: ProgressBar::hidden(),
        }
    }

    /// Share a cancellation flag, e.g. one raised by a Ctrl-C handler.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Tick `progress` once per evaluated file.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Reject settings no folder can run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidWorkerCount);
        }
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

/// Validate every file below a single root
///
/// # Arguments
/// * `root` - Folder to walk recursively
/// * `filter` - Paths it matches are skipped and not counted
/// * `options` - Worker count, cancellation flag and progress bar
///
/// # Errors
/// * [`Error::InvalidWorkerCount`] if `options` has zero workers
/// * [`Error::Walk`] if any part of the tree cannot be enumerated; no partial
///   report is returned
/// * [`Error::Interrupted`] if the cancellation flag was raised
pub fn process_folder(root: &Path, filter: &ExclusionFilter, options: &Options) -> Result<Report> {
    options.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .thread_name(|idx| format!("refcheck-worker-{}", idx))
        .build()?;

    let (path_tx, path_rx) =
        crossbeam_channel::bounded::<PathBuf>(options.workers * QUEUE_DEPTH_PER_WORKER);
    let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded::<Outcome>();

    debug!(root = %root.display(), workers = options.workers, "validating folder");

    let (walked, report) = thread::scope(|s| {
        let aggregator = s.spawn(move || aggregate(root, outcome_rx));

        let walked = pool.in_place_scope(move |scope| {
            for _ in 0..options.workers {
                let path_rx = path_rx.clone();
                let outcome_tx = outcome_tx.clone();
                scope.spawn(move |_| run_worker(&path_rx, &outcome_tx, filter, options));
            }
            drop(path_rx);
            drop(outcome_tx);

            let walked = dispatch(root, &path_tx, options);
            // Closing the queue lets the workers drain and exit.
            drop(path_tx);
            walked
        });

        let report = match aggregator.join() {
            Ok(report) => report,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (walked, report)
    });

    if let Err(e) = walked {
        error!(root = %root.display(), error = %e, "folder validation failed");
        return Err(e);
    }
    if options.is_cancelled() {
        return Err(Error::Interrupted {
            root: root.to_path_buf(),
        });
    }

    debug!(
        root = %root.display(),
        total = report.total_files,
        intact = report.intact_files,
        corrupted = report.corrupted_files,
        invalid = report.invalid_files,
        errored = report.errored_files,
        "folder validated"
    );
    Ok(report)
}

/// Validate each root in order, stopping at the first failure
///
/// Roots are processed one after another; concurrency exists only inside a
/// single root. On error no reports are returned.
pub fn process_all<P: AsRef<Path>>(
    roots: &[P],
    filter: &ExclusionFilter,
    options: &Options,
) -> Result<Vec<Report>> {
    roots
        .iter()
        .map(|root| process_folder(root.as_ref(), filter, options))
        .collect()
}

/// Walk `root` and push each regular file onto the queue.
fn dispatch(root: &Path, path_tx: &Sender<PathBuf>, options: &Options) -> Result<()> {
    for entry in regular_files(root) {
        if options.is_cancelled() {
            return Err(Error::Interrupted {
                root: root.to_path_buf(),
            });
        }
        let path = entry?;
        if path_tx.send(path).is_err() {
            // Every worker is gone; nothing left to feed.
            break;
        }
    }
    Ok(())
}

fn run_worker(
    path_rx: &Receiver<PathBuf>,
    outcome_tx: &Sender<Outcome>,
    filter: &ExclusionFilter,
    options: &Options,
) {
    for path in path_rx.iter() {
        // Keep draining after cancellation so the walker never blocks.
        if options.is_cancelled() {
            continue;
        }
        if filter.matches(&path) {
            debug!(path = %path.display(), "excluded");
            continue;
        }

        let result = digest::verify(&path);
        if let Err(e) = &result {
            warn!(path = %path.display(), error = %e, "failed to verify file, skipping");
        }
        options.progress.inc(1);

        if outcome_tx.send((path, result)).is_err() {
            break;
        }
    }
}

/// Single owner of the report; ends once every worker has dropped its sender.
fn aggregate(root: &Path, outcome_rx: Receiver<Outcome>) -> Report {
    let mut report = Report::new(root);
    for (path, result) in outcome_rx {
        report.record(path, result);
    }
    report
}
