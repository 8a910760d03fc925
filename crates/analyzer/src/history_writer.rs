//! Background history persistence.
//!
//! Chat handlers hand finished exchanges to a [`HistoryWriter`], which queues
//! them on a bounded channel. A single [`HistoryWorker`] task inserts them one
//! statement at a time.
//!
//! Delivery is at-most-once and best-effort: a record is dropped (with a
//! warning) when the queue is full or the worker has stopped, and an insert
//! that fails is logged and not retried. Enqueueing never waits.

use std::time::Duration;

use database::{history, Database, NewHistoryRecord};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Cheap, cloneable handle used to enqueue history records.
#[derive(Debug, Clone)]
pub struct HistoryWriter {
    tx: mpsc::Sender<NewHistoryRecord>,
}

/// Owner of the background task; used to drain it on shutdown.
#[derive(Debug)]
pub struct HistoryWorker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

enum Event {
    Record(Option<NewHistoryRecord>),
    Shutdown { requested: bool },
}

impl HistoryWriter {
    /// Start the worker task and return the enqueue handle plus the worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(db: Database, capacity: usize) -> (HistoryWriter, HistoryWorker) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(run_worker(db, rx, shutdown_rx));

        (
            HistoryWriter { tx },
            HistoryWorker {
                shutdown: shutdown_tx,
                handle,
            },
        )
    }

    /// Queue a record without waiting. Returns whether it was accepted.
    pub fn enqueue(&self, record: NewHistoryRecord) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(record)) => {
                warn!(caller_id = %record.caller_id, "History queue full, dropping record");
                false
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                warn!(caller_id = %record.caller_id, "History worker stopped, dropping record");
                false
            }
        }
    }
}

impl HistoryWorker {
    /// Stop accepting records, write what is queued, and wait for the task.
    ///
    /// Gives up after `timeout`; records still queued at that point are lost.
    pub async fn drain(self, timeout: Duration) {
        // The task may already be gone; nothing to signal then.
        let _ = self.shutdown.send(());

        match tokio::time::timeout(timeout, self.handle).await {
            Ok(Ok(())) => info!("History writer drained"),
            Ok(Err(e)) => error!("History writer task failed: {}", e),
            Err(_) => warn!(
                timeout_ms = timeout.as_millis() as u64,
                "History writer did not drain in time"
            ),
        }
    }
}

async fn run_worker(
    db: Database,
    mut rx: mpsc::Receiver<NewHistoryRecord>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut draining = false;

    loop {
        let event = if draining {
            Event::Record(rx.recv().await)
        } else {
            tokio::select! {
                record = rx.recv() => Event::Record(record),
                signal = &mut shutdown => Event::Shutdown { requested: signal.is_ok() },
            }
        };

        match event {
            Event::Record(Some(record)) => write_record(&db, record).await,
            Event::Record(None) => break,
            Event::Shutdown { requested } => {
                draining = true;
                // A dropped worker handle detaches the task instead of stopping it.
                if requested {
                    debug!("History writer closing queue");
                    rx.close();
                }
            }
        }
    }

    debug!("History writer stopped");
}

async fn write_record(db: &Database, record: NewHistoryRecord) {
    match history::insert_history(db.pool(), &record).await {
        Ok(id) => debug!(id, caller_id = %record.caller_id, "History record saved"),
        Err(e) => error!(caller_id = %record.caller_id, "Failed to save history record: {}", e),
    }
}
