use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::r#trait::DurableStore;

/// A write scheduled against the durable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOp {
    Set { key: String, value: String },
    Delete { key: String },
}

impl PersistOp {
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Delete { key } => key,
        }
    }
}

enum PersistMsg {
    Op(PersistOp),
    Flush(oneshot::Sender<()>),
}

/// Handle to the single writer task. Ops are applied strictly in submission
/// order, so writes to one key can never overtake each other.
#[derive(Clone)]
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<PersistMsg>,
    failures: Arc<AtomicU64>,
}

impl PersistQueue {
    /// Enqueue without waiting. Returns false once the writer task is gone.
    pub fn submit(&self, op: PersistOp) -> bool {
        let key = op.key().to_string();
        if self.tx.send(PersistMsg::Op(op)).is_err() {
            tracing::warn!(
                target: "fitbuddy.store",
                stage = "persist.submit.closed",
                key = %key
            );
            return false;
        }
        true
    }

    /// Wait until every op submitted before this call has been applied.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(PersistMsg::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// Writes that the store rejected since start.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

pub fn start_persist_queue(store: Arc<dyn DurableStore>) -> PersistQueue {
    let (tx, mut rx) = mpsc::unbounded_channel::<PersistMsg>();
    let failures = Arc::new(AtomicU64::new(0));
    let failures_task = failures.clone();

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg {
                PersistMsg::Op(op) => {
                    let result = match &op {
                        PersistOp::Set { key, value } => store.set(key, value).await,
                        PersistOp::Delete { key } => store.delete(key).await,
                    };
                    match result {
                        Ok(()) => tracing::debug!(
                            target: "fitbuddy.store",
                            stage = "persist.applied",
                            store = store.name(),
                            key = %op.key()
                        ),
                        Err(e) => {
                            failures_task.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!(
                                target: "fitbuddy.store",
                                stage = "persist.failed",
                                store = store.name(),
                                key = %op.key(),
                                error = %e
                            );
                        }
                    }
                }
                PersistMsg::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    });

    PersistQueue { tx, failures }
}
