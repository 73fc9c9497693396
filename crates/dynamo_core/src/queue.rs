//! Capture → render hand-off
//!
//! Many producers (whatever threads the input layer calls back on), exactly
//! one consumer (the render thread). Producers never wait on the consumer:
//! the channel is unbounded, input volume is bounded by how fast people can
//! touch a screen.
//!
//! The consumer drains once per frame. Only the tasks present when the drain
//! starts are run, so a producer hammering the queue cannot stall a frame.

use crate::pointer::{PointerBatch, PointerEvent};
use crossbeam_channel::{Receiver, Sender};
use std::fmt;
use thiserror::Error;

/// Receives pointer events on the consumer thread, one call per event.
pub trait PointerSink {
    fn on_pointer_event(&mut self, event: PointerEvent);
}

/// Unit of work run on the consumer thread.
pub enum Task<C> {
    /// Delivered to [`PointerSink::on_pointer_event`] event by event, in batch order.
    Pointer(PointerBatch),
    /// Arbitrary maintenance work (surface lifecycle, shutdown, ...).
    Run(Box<dyn FnOnce(&mut C) + Send>),
}

impl<C> Task<C> {
    pub fn run<F>(f: F) -> Self
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        Task::Run(Box::new(f))
    }
}

impl<C> fmt::Debug for Task<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Pointer(batch) => f.debug_tuple("Pointer").field(batch).finish(),
            Task::Run(_) => f.write_str("Run(..)"),
        }
    }
}

/// The consumer side is gone (surface torn down, render thread exited).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event queue consumer has been dropped")]
pub struct QueueClosed;

/// Consumer-owned end of the queue.
pub struct EventQueue<C> {
    tx: Sender<Task<C>>,
    rx: Receiver<Task<C>>,
}

impl<C> EventQueue<C> {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Handle for producer threads.
    pub fn producer(&self) -> QueueProducer<C> {
        QueueProducer {
            tx: self.tx.clone(),
        }
    }

    pub fn enqueue(&self, task: Task<C>) {
        // Cannot fail: this queue holds the receiver.
        let _ = self.tx.send(task);
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Runs every task queued before this call, in FIFO order, on the calling
    /// thread. Returns the number of tasks run.
    pub fn drain_and_run_all(&self, consumer: &mut C) -> usize
    where
        C: PointerSink,
    {
        let pending = self.rx.len();
        let mut ran = 0;

        for task in self.rx.try_iter().take(pending) {
            match task {
                Task::Pointer(batch) => {
                    for event in batch {
                        consumer.on_pointer_event(event);
                    }
                }
                Task::Run(f) => f(consumer),
            }
            ran += 1;
        }

        if ran > 0 {
            tracing::trace!(tasks = ran, "drained event queue");
        }
        ran
    }
}

impl<C> Default for EventQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle. Cheap to clone, safe to use from any thread.
pub struct QueueProducer<C> {
    tx: Sender<Task<C>>,
}

impl<C> Clone for QueueProducer<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<C> QueueProducer<C> {
    pub fn enqueue(&self, task: Task<C>) -> Result<(), QueueClosed> {
        self.tx.send(task).map_err(|_| QueueClosed)
    }

    /// Enqueues a batch as one unit of work. Empty batches are skipped.
    pub fn enqueue_batch(&self, batch: PointerBatch) -> Result<(), QueueClosed> {
        if batch.is_empty() {
            return Ok(());
        }
        self.enqueue(Task::Pointer(batch))
    }

    /// Queues a closure to run on the consumer thread.
    pub fn queue_task<F>(&self, f: F) -> Result<(), QueueClosed>
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        self.enqueue(Task::run(f))
    }
}
