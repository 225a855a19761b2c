//! Background conversion jobs.
//!
//! A job owns its pixel buffer and plan and runs on its own thread. The
//! caller sees it only through an ordered channel of [`JobEvent`]s; nothing
//! mutable is shared. To cancel, drop the handle (or call
//! [`ConversionJob::abandon`]): the worker notices the closed channel at its
//! next band boundary and exits without producing a result.

use std::any::Any;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::bands::{execute, Execution, ProgressEvent, ProgressSink};
use super::monitor::PerformanceMonitor;
use super::prepare;
use crate::capacity::CapacityReport;
use crate::convert::{ConversionResult, GridSpec, PixelBuffer};
use crate::error::ConvertError;
use crate::settings::{ConversionSettings, JobPlan};

/// Lifecycle of a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    /// Source buffer accepted
    Loaded,
    /// Settings validated and grid planned
    Planned,
    /// Capacity check passed
    Guarded,
    /// Worker running
    Executing,
    Complete,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete | JobState::Failed)
    }
}

/// Messages from a worker to its caller.
///
/// `Complete` or `Failed` is always the last message of a job.
#[derive(Debug)]
pub enum JobEvent {
    Progress(ProgressEvent),
    Complete(ConversionResult),
    Failed(ConvertError),
}

/// Handle to a running conversion.
pub struct ConversionJob {
    events: Receiver<JobEvent>,
    worker: Option<JoinHandle<()>>,
    state: JobState,
    grid: GridSpec,
    capacity: CapacityReport,
}

impl ConversionJob {
    /// Validate, plan and guard a job, then start it on a worker thread.
    ///
    /// All checks run synchronously: a rejected job never starts and never
    /// emits progress.
    ///
    /// # Errors
    /// * `ConvertError::Validation` - If the settings are invalid
    /// * `ConvertError::Input` - If the source dimensions are degenerate
    /// * `ConvertError::Capacity` - If the job is estimated to be too large
    /// * `ConvertError::Internal` - If the worker thread cannot be spawned
    pub fn submit(buffer: PixelBuffer, settings: &ConversionSettings) -> Result<Self, ConvertError> {
        let mut monitor = PerformanceMonitor::start();
        let mut state = JobState::Idle;
        advance(&mut state, JobState::Loaded);

        let (plan, capacity) = prepare(&buffer, settings, |next| advance(&mut state, next))?;
        monitor.checkpoint("Performance check complete");

        let (tx, rx) = mpsc::channel();
        let grid = plan.grid;
        let worker = thread::Builder::new()
            .name("glyph-grid-worker".to_string())
            .spawn(move || run_worker(buffer, plan, tx, monitor))
            .map_err(|e| ConvertError::internal(format!("failed to spawn worker: {}", e)))?;
        advance(&mut state, JobState::Executing);

        log::info!(
            "Started conversion to {} ({} complexity, ~{}s)",
            grid,
            capacity.time.complexity.name(),
            capacity.time.seconds
        );

        Ok(Self {
            events: rx,
            worker: Some(worker),
            state,
            grid,
            capacity,
        })
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn capacity(&self) -> &CapacityReport {
        &self.capacity
    }

    /// Block for the next event.
    ///
    /// Returns `None` once the terminal event has been delivered.
    pub fn recv(&mut self) -> Option<JobEvent> {
        if self.state.is_terminal() {
            return None;
        }
        let event = match self.events.recv() {
            Ok(event) => event,
            Err(_) => {
                self.join();
                worker_lost()
            }
        };
        self.observe(&event);
        Some(event)
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `None` on timeout or once the job has finished; check
    /// [`state`](Self::state) to tell them apart.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<JobEvent> {
        if self.state.is_terminal() {
            return None;
        }
        let event = match self.events.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => {
                self.join();
                worker_lost()
            }
        };
        self.observe(&event);
        Some(event)
    }

    /// Drain the job, passing progress to `on_progress`, and return its result.
    pub fn wait(
        mut self,
        mut on_progress: impl FnMut(&ProgressEvent),
    ) -> Result<ConversionResult, ConvertError> {
        while let Some(event) = self.recv() {
            match event {
                JobEvent::Progress(p) => on_progress(&p),
                JobEvent::Complete(result) => {
                    self.join();
                    return Ok(result);
                }
                JobEvent::Failed(e) => {
                    self.join();
                    return Err(e);
                }
            }
        }
        Err(worker_lost_error())
    }

    /// Discard the job without waiting for it.
    ///
    /// The worker stops at its next band boundary. No result is produced.
    pub fn abandon(mut self) {
        if !self.state.is_terminal() {
            log::warn!("Abandoning conversion to {}", self.grid);
        }
        // Dropping the receiver closes the channel; do not join.
        self.worker.take();
    }

    fn observe(&mut self, event: &JobEvent) {
        match event {
            JobEvent::Progress(_) => {}
            JobEvent::Complete(_) => advance(&mut self.state, JobState::Complete),
            JobEvent::Failed(_) => advance(&mut self.state, JobState::Failed),
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.worker.take() {
            if let Err(payload) = handle.join() {
                log::error!("Conversion worker panicked: {}", panic_message(payload.as_ref()));
            }
        }
    }
}

impl std::fmt::Debug for ConversionJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionJob")
            .field("state", &self.state)
            .field("grid", &self.grid)
            .finish()
    }
}

fn advance(state: &mut JobState, next: JobState) {
    log::debug!("Job state {:?} -> {:?}", state, next);
    *state = next;
}

fn worker_lost_error() -> ConvertError {
    ConvertError::internal("conversion worker terminated unexpectedly")
}

fn worker_lost() -> JobEvent {
    JobEvent::Failed(worker_lost_error())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

/// Forwards progress into the job channel.
struct ChannelSink<'a> {
    tx: &'a Sender<JobEvent>,
}

impl ProgressSink for ChannelSink<'_> {
    fn report(&mut self, event: ProgressEvent) -> bool {
        self.tx.send(JobEvent::Progress(event)).is_ok()
    }
}

/// Worker thread body.
fn run_worker(
    buffer: PixelBuffer,
    plan: JobPlan,
    tx: Sender<JobEvent>,
    mut monitor: PerformanceMonitor,
) {
    let mut sink = ChannelSink { tx: &tx };
    match execute(&buffer, &plan, &mut sink) {
        Ok(Execution::Complete(result)) => {
            monitor.checkpoint("Conversion complete");
            log::debug!("Conversion performance: {}", monitor.report());
            log::info!("Finished conversion to {}", plan.grid);
            let _ = tx.send(JobEvent::Complete(result));
        }
        Ok(Execution::Abandoned { rows_done }) => {
            log::warn!(
                "Conversion abandoned after {} of {} rows",
                rows_done,
                plan.grid.height
            );
        }
        Err(e) => {
            monitor.checkpoint("Conversion error");
            log::error!("Conversion failed: {}", e);
            let _ = tx.send(JobEvent::Failed(e));
        }
    }
}
