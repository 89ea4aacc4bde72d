//! Worker pool with a best-effort retirement line.
//!
//! # Responsibilities
//! - Hand each submitted path to exactly one free worker
//! - Run the head site's delay on that worker and time it
//! - Grow by one worker on demand; shrink by one idle worker when possible
//! - Keep one worker that can never retire
//!
//! Workers are OS threads because the simulated service time is a blocking
//! sleep. Requests are handed over on a zero-capacity channel, so `submit`
//! waits until some worker is actually free.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, never, select, Receiver, Sender};
use tokio::sync::oneshot;

use crate::observability::metrics;
use crate::path::{PathResult, PathSpec};
use crate::scheduler::scaling::{self, ScalingDecision};
use crate::scheduler::SchedulerError;

/// Timing of one served request, as seen by the worker.
#[derive(Debug)]
pub struct ServiceTiming {
    /// When a worker picked the request up.
    pub dequeued: Instant,
    /// When the delay step finished.
    pub finished: Instant,
    /// Result of the delay step.
    pub outcome: PathResult<()>,
}

impl ServiceTiming {
    /// Time spent waiting for a worker, measured from `submitted`.
    pub fn queuing_delay(&self, submitted: Instant) -> Duration {
        self.dequeued.saturating_duration_since(submitted)
    }

    /// Time the worker spent in the delay step.
    pub fn service_time(&self) -> Duration {
        self.finished.saturating_duration_since(self.dequeued)
    }
}

struct Job {
    path: Arc<PathSpec>,
    reply: oneshot::Sender<ServiceTiming>,
}

/// One unit of the live worker count, held by a worker thread for its lifetime.
///
/// The gauge is always set from the value the atomic update produced.
struct WorkerGuard {
    workers: Arc<AtomicUsize>,
}

impl WorkerGuard {
    fn enlist(workers: &Arc<AtomicUsize>) -> Self {
        let count = workers.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_pool_size(count);
        Self {
            workers: workers.clone(),
        }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let remaining = self.workers.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::record_pool_size(remaining);
    }
}

/// Per-site request scheduler.
pub struct Scheduler {
    jobs_tx: Sender<Job>,
    jobs_rx: Receiver<Job>,
    retire_tx: Sender<()>,
    retire_rx: Receiver<()>,
    workers: Arc<AtomicUsize>,
    next_worker_id: AtomicU64,
    auto_scale: bool,
}

impl Scheduler {
    /// Start the pool.
    ///
    /// `workers <= 0` starts one worker and enables autoscaling; a positive
    /// count fixes the pool at that size.
    pub fn new(workers: i64) -> Result<Self, SchedulerError> {
        let auto_scale = workers <= 0;
        let size = if auto_scale {
            1
        } else {
            usize::try_from(workers).unwrap_or(usize::MAX)
        };

        let (jobs_tx, jobs_rx) = bounded(0);
        let (retire_tx, retire_rx) = bounded(0);

        let scheduler = Self {
            jobs_tx,
            jobs_rx,
            retire_tx,
            retire_rx,
            workers: Arc::new(AtomicUsize::new(0)),
            next_worker_id: AtomicU64::new(0),
            auto_scale,
        };

        // The first worker never listens for retirement, so the pool can't empty.
        scheduler.spawn_worker(None)?;
        for _ in 1..size {
            scheduler.spawn_worker(Some(scheduler.retire_rx.clone()))?;
        }

        tracing::info!(workers = size, auto_scale, "Worker pool started");
        Ok(scheduler)
    }

    /// Whether `observe` should be applied after each request.
    pub fn auto_scale(&self) -> bool {
        self.auto_scale
    }

    /// Live worker count. May be stale by the time it is read.
    pub fn worker_count(&self) -> usize {
        self.workers.load(Ordering::SeqCst)
    }

    /// Hand a path to the next free worker and wait for its timing.
    ///
    /// Waits as long as it takes for a worker to free up; there is no queue
    /// limit and no rejection.
    pub async fn submit(&self, path: Arc<PathSpec>) -> Result<ServiceTiming, SchedulerError> {
        let (reply, response) = oneshot::channel();
        let jobs = self.jobs_tx.clone();
        let job = Job { path, reply };

        tokio::task::spawn_blocking(move || jobs.send(job))
            .await?
            .map_err(|_| SchedulerError::Closed)?;

        response.await.map_err(|_| SchedulerError::Closed)
    }

    /// Start one more worker that may later retire.
    pub fn scale_up(&self) -> Result<(), SchedulerError> {
        self.spawn_worker(Some(self.retire_rx.clone()))
    }

    /// Ask one idle scalable worker to exit.
    ///
    /// Returns `false` when nobody was listening; the request is dropped.
    pub fn scale_down(&self) -> bool {
        self.retire_tx.try_send(()).is_ok()
    }

    /// Apply the scaling policy to one request's measurements.
    pub fn observe(&self, queuing_delay: Duration, service_time: Duration) -> ScalingDecision {
        let decision = scaling::evaluate(queuing_delay, service_time);
        match decision {
            ScalingDecision::ScaleUp => match self.scale_up() {
                Ok(()) => {
                    metrics::record_scaling(decision.as_str(), true);
                    tracing::debug!(
                        queuing_delay = ?queuing_delay,
                        service_time = ?service_time,
                        workers = self.worker_count(),
                        "Scaled up"
                    );
                }
                Err(e) => {
                    metrics::record_scaling(decision.as_str(), false);
                    tracing::error!(error = %e, "Failed to start worker");
                }
            },
            ScalingDecision::ScaleDown => {
                let retired = self.scale_down();
                metrics::record_scaling(decision.as_str(), retired);
                tracing::debug!(
                    queuing_delay = ?queuing_delay,
                    service_time = ?service_time,
                    retired,
                    "Scale down requested"
                );
            }
            ScalingDecision::Hold => {}
        }
        decision
    }

    fn spawn_worker(&self, retire: Option<Receiver<()>>) -> Result<(), SchedulerError> {
        let id = self.next_worker_id.fetch_add(1, Ordering::Relaxed);
        let guard = WorkerGuard::enlist(&self.workers);
        let jobs = self.jobs_rx.clone();

        // On spawn failure the closure, and with it the guard, is dropped.
        thread::Builder::new()
            .name(format!("site-worker-{}", id))
            .spawn(move || {
                let _guard = guard;
                run_worker(id, jobs, retire);
            })
            .map_err(SchedulerError::Spawn)?;

        Ok(())
    }
}

/// Worker loop shared by permanent (`retire == None`) and scalable workers.
fn run_worker(id: u64, jobs: Receiver<Job>, retire: Option<Receiver<()>>) {
    let permanent = retire.is_none();
    let retire = retire.unwrap_or_else(never);

    tracing::trace!(worker = id, permanent, "Worker started");
    loop {
        select! {
            recv(jobs) -> job => match job {
                Ok(job) => serve(job),
                Err(_) => {
                    tracing::trace!(worker = id, "Request queue closed");
                    return;
                }
            },
            recv(retire) -> _ => {
                tracing::debug!(worker = id, "Worker retired");
                return;
            }
        }
    }
}

fn serve(job: Job) {
    let dequeued = Instant::now();
    let outcome = job.path.delay_at_head();
    let finished = Instant::now();

    // The caller may have gone away; its timing is simply dropped.
    let _ = job.reply.send(ServiceTiming {
        dequeued,
        finished,
        outcome,
    });
}
