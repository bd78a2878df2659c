//! Bounded worker pool for per-file pipelines.
//!
//! Files are dispatched over a bounded channel to scoped worker threads. Each
//! result comes back tagged with its input index and lands in that index's slot,
//! so output order always matches input order.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use tracing::debug;

use crate::error::FileError;

/// Caller-held abort signal. Raising it stops dispatch of new files; files already
/// handed to a worker run to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker count. `None` uses the available hardware parallelism.
    pub workers: Option<usize>,
    pub cancel: Option<CancelToken>,
}

impl BatchOptions {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Workers to start for `jobs` files: at least one, never more than the files.
    pub fn worker_count(&self, jobs: usize) -> usize {
        let wanted = self.workers.filter(|&n| n > 0).unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        });
        wanted.min(jobs).max(1)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// Run `job` on every path and return the results in input order.
///
/// A failing file only affects its own slot. Files never dispatched because the
/// cancel token was raised report [`FileError::Cancelled`].
pub fn run<T, F>(paths: &[PathBuf], options: &BatchOptions, job: F) -> Vec<Result<T, FileError>>
where
    T: Send,
    F: Fn(&Path) -> Result<T, FileError> + Sync,
{
    if paths.is_empty() {
        return Vec::new();
    }

    let workers = options.worker_count(paths.len());
    debug!(files = paths.len(), workers, "starting batch");

    let (job_tx, job_rx) = bounded::<usize>(workers);
    let (result_tx, result_rx) = unbounded::<(usize, Result<T, FileError>)>();
    let mut slots: Vec<Option<Result<T, FileError>>> = paths.iter().map(|_| None).collect();

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let job = &job;
            scope.spawn(move || {
                for index in job_rx.iter() {
                    let result = job(&paths[index]);
                    if result_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for index in 0..paths.len() {
            if options.is_cancelled() {
                debug!(dispatched = index, "batch cancelled");
                break;
            }
            if job_tx.send(index).is_err() {
                break;
            }
        }
        drop(job_tx);

        for (index, result) in result_rx.iter() {
            slots[index] = Some(result);
        }
    });

    slots
        .into_iter()
        .zip(paths)
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| Err(FileError::Cancelled { path: path.clone() }))
        })
        .collect()
}
