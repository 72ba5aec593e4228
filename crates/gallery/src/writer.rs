//! Write-behind queue from the controller to the media store.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{
    domain::{MediaId, MediaRecord},
    error::MediaStoreError,
};
use storage::MediaStore;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum WriteCommand {
    Put(MediaRecord),
    Delete(MediaId),
    Flush(oneshot::Sender<()>),
}

impl WriteCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Put(_) => "put",
            Self::Delete(_) => "delete",
            Self::Flush(_) => "flush",
        }
    }
}

/// Applies store writes on a background task, strictly in submission order.
/// Submitting never blocks; failures are logged and counted, never retried.
pub struct StoreWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
    failed_writes: Arc<AtomicU64>,
}

impl StoreWriter {
    /// Spawns the writer task. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn MediaStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteCommand>();
        let failed_writes = Arc::new(AtomicU64::new(0));
        let failures = failed_writes.clone();

        tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                let result = match cmd {
                    WriteCommand::Put(record) => store
                        .put(&record)
                        .await
                        .map_err(|err| MediaStoreError::write_failed(record.id.0, err)),
                    WriteCommand::Delete(id) => store
                        .delete(&id)
                        .await
                        .map_err(|err| MediaStoreError::write_failed(id.0, err)),
                    WriteCommand::Flush(done) => {
                        let _ = done.send(());
                        Ok(())
                    }
                };
                if let Err(err) = result {
                    failures.fetch_add(1, Ordering::Relaxed);
                    warn!(error = %err, "media store write dropped");
                }
            }
            debug!("media store writer drained");
        });

        Self { tx, failed_writes }
    }

    pub fn put(&self, record: MediaRecord) {
        self.submit(WriteCommand::Put(record));
    }

    pub fn delete(&self, id: MediaId) {
        self.submit(WriteCommand::Delete(id));
    }

    /// Resolves once every write submitted before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(done_tx)).is_err() {
            warn!("media store writer stopped before flush");
            return;
        }
        let _ = done_rx.await;
    }

    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    fn submit(&self, cmd: WriteCommand) {
        let cmd_name = cmd.name();
        match self.tx.send(cmd) {
            Ok(()) => debug!(command = cmd_name, "queued media store write"),
            Err(_) => warn!(command = cmd_name, "media store writer stopped; write dropped"),
        }
    }
}
