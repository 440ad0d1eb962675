//! Progress reporting and background execution.
//!
//! The search calls a [`ProgressSink`] once per evaluated move. Sinks must
//! not block; the channel sinks below either never block (unbounded) or
//! drop updates when the consumer falls behind (bounded). [`spawn`] runs a
//! search on its own thread and streams [`ProgressEvent`]s, ending with a
//! single [`ProgressEvent::Done`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::warn;

use super::config::AnnealingConfig;
use super::runner::AllocationRunner;
use super::types::{OptimizationResult, ProgressEvent, ProgressUpdate};
use crate::error::{AllocError, Result};
use crate::model::ModelHandle;
use crate::system::ProductionUnit;

/// Receives per-move progress from a running search.
pub trait ProgressSink {
    fn report(&mut self, update: ProgressUpdate);
}

/// Discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _update: ProgressUpdate) {}
}

/// Keeps every update in memory.
impl ProgressSink for Vec<ProgressUpdate> {
    fn report(&mut self, update: ProgressUpdate) {
        self.push(update);
    }
}

/// Unbounded: never blocks. A disconnected receiver is ignored.
impl ProgressSink for Sender<ProgressEvent> {
    fn report(&mut self, update: ProgressUpdate) {
        let _ = self.send(ProgressEvent::Progress(update));
    }
}

/// Bounded: drops the update when the buffer is full.
impl ProgressSink for SyncSender<ProgressEvent> {
    fn report(&mut self, update: ProgressUpdate) {
        let _ = self.try_send(ProgressEvent::Progress(update));
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(ProgressUpdate)> ProgressSink for FnSink<F> {
    fn report(&mut self, update: ProgressUpdate) {
        (self.0)(update)
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn report(&mut self, update: ProgressUpdate) {
        (**self).report(update)
    }
}

/// A search running on a background thread.
pub struct OptimizationHandle {
    events: Receiver<ProgressEvent>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl OptimizationHandle {
    /// Raw event stream. Ends after [`ProgressEvent::Done`].
    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Asks the search to stop after the current move.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Blocks until the search finishes, discarding progress.
    pub fn wait(self) -> Result<OptimizationResult> {
        self.wait_with(|_| {})
    }

    /// Blocks until the search finishes, forwarding progress to `on_progress`.
    pub fn wait_with<F: FnMut(ProgressUpdate)>(
        mut self,
        mut on_progress: F,
    ) -> Result<OptimizationResult> {
        let mut outcome = Err(AllocError::WorkerLost);
        for event in self.events.iter() {
            match event {
                ProgressEvent::Progress(update) => on_progress(update),
                ProgressEvent::Done(result) => {
                    outcome = result.map(|boxed| *boxed);
                    break;
                }
            }
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("optimization worker panicked");
            }
        }
        outcome
    }
}

/// Starts a search on a new thread.
///
/// Progress goes through an unbounded channel, so the search never waits on
/// the consumer. The handle's cancel flag is checked before every draw.
pub fn spawn(
    model: Arc<ModelHandle>,
    units: Vec<ProductionUnit>,
    config: AnnealingConfig,
) -> OptimizationHandle {
    let (tx, rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let worker = thread::spawn(move || {
        let mut sink = tx.clone();
        let result =
            AllocationRunner::run_with_progress(&model, &units, &config, &mut sink, Some(flag));
        let _ = tx.send(ProgressEvent::Done(result.map(Box::new)));
    });

    OptimizationHandle {
        events: rx,
        cancel,
        worker: Some(worker),
    }
}
