//! Single background worker.
//!
//! Long operations (walks, batch conversions) run on one dedicated thread so the
//! caller stays free to display progress and react to Ctrl-C. Jobs are queued over
//! a bounded(1) crossbeam channel: at most one job waits while another runs, and
//! `submit` blocks beyond that.
//!
//! Each job gets its own `CancelFlag` and progress channel. The outcome comes back
//! on a one-shot result channel; a job that returns `Ok` after its flag was set is
//! reported as `Cancelled` with whatever partial value it produced.

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use crate::progress::{ChannelProgress, Progress, ProgressEvent};
use crate::shutdown::CancelFlag;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// How a job ended.
#[derive(Debug)]
pub enum JobOutcome<T> {
    Completed(T),
    /// Stopped early; carries the partial result.
    Cancelled(T),
    Failed(anyhow::Error),
}

impl<T> JobOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }

    /// Collapse into a result, treating cancellation as success.
    pub fn into_result(self) -> Result<T> {
        match self {
            JobOutcome::Completed(v) | JobOutcome::Cancelled(v) => Ok(v),
            JobOutcome::Failed(e) => Err(e),
        }
    }
}

/// Caller side of a submitted job.
pub struct JobHandle<T> {
    cancel: CancelFlag,
    progress: Receiver<ProgressEvent>,
    result: Receiver<JobOutcome<T>>,
}

impl<T> JobHandle<T> {
    /// Ask the job to stop at its next cancellation point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Progress events in the order the job emitted them.
    pub fn progress(&self) -> &Receiver<ProgressEvent> {
        &self.progress
    }

    /// Block until the job finishes.
    pub fn wait(self) -> JobOutcome<T> {
        self.result
            .recv()
            .unwrap_or_else(|_| JobOutcome::Failed(anyhow!("worker stopped before the job finished")))
    }
}

/// Owns the worker thread. Dropping it closes the queue and joins the thread
/// after the queued jobs finish.
pub struct BackgroundWorker {
    queue: Option<Sender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl BackgroundWorker {
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = bounded::<Job>(1);
        let thread = thread::Builder::new()
            .name("text-encode-worker".into())
            .spawn(move || {
                for job in rx {
                    job();
                }
                debug!("worker queue closed");
            })
            .context("spawn worker thread")?;
        Ok(Self {
            queue: Some(tx),
            thread: Some(thread),
        })
    }

    /// Queue `task`. It receives the job's cancellation flag and a progress sink.
    pub fn submit<T, F>(&self, task: F) -> Result<JobHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce(&CancelFlag, &dyn Progress) -> Result<T> + Send + 'static,
    {
        let cancel = CancelFlag::new();
        let (progress_tx, progress_rx) = unbounded();
        let (result_tx, result_rx) = bounded(1);

        let flag = cancel.clone();
        let job: Job = Box::new(move || {
            let progress = ChannelProgress::new(progress_tx);
            let outcome = match task(&flag, &progress) {
                Ok(v) if flag.is_cancelled() => JobOutcome::Cancelled(v),
                Ok(v) => JobOutcome::Completed(v),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "job failed");
                    JobOutcome::Failed(e)
                }
            };
            let _ = result_tx.send(outcome);
        });

        let queue = self.queue.as_ref().context("worker is shut down")?;
        queue
            .send(job)
            .map_err(|_| anyhow!("worker thread is not running"))?;
        Ok(JobHandle {
            cancel,
            progress: progress_rx,
            result: result_rx,
        })
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        drop(self.queue.take());
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("worker thread panicked");
        }
    }
}
