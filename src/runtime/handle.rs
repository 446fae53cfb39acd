use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    collections::{MessageCollection, ProductCollection},
    core::collection::{StoreError, StoreResult},
    persist::DocumentSink,
    record::{CollectionRecord, MessageDraft, MessageRecord, ProductFields, ProductRecord},
    types::{RecordIndex, UploadedFile},
};

use super::events::CollectionEvent;

/// Failure of a call submitted through a [`CollectionHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The operation itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The worker is gone (shut down or its job panicked).
    #[error("collection worker unavailable")]
    ChannelClosed,
}

/// Worker sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum number of queued jobs before callers wait.
    pub queue_bound: usize,
    /// Capacity of the event broadcast buffer.
    pub events_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_bound: 256,
            events_capacity: 1024,
        }
    }
}

type Job<C> = Box<dyn FnOnce(&C) + Send + 'static>;

enum Command<C> {
    Run { job: Job<C> },
    Shutdown { resp: oneshot::Sender<()> },
}

/// Cloneable front end of a single collection worker.
///
/// Every job submitted through any clone runs on the same worker, one at a
/// time and in submission order, so read-modify-write cycles on the backing
/// document never interleave.
pub struct CollectionHandle<C> {
    cmd_tx: mpsc::Sender<Command<C>>,
    events_tx: broadcast::Sender<CollectionEvent>,
}

impl<C> Clone for CollectionHandle<C> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

/// Moves `collection` onto a dedicated worker task and returns its handle.
///
/// Must be called from within a tokio runtime. Jobs execute on the blocking
/// pool because every collection operation does synchronous file I/O.
pub fn spawn_collection<C>(collection: C, config: RuntimeConfig) -> CollectionHandle<C>
where
    C: Send + Sync + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command<C>>(config.queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<CollectionEvent>(config.events_capacity.max(1));
    let collection = Arc::new(collection);

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Run { job } => {
                    let target = Arc::clone(&collection);
                    if let Err(err) = tokio::task::spawn_blocking(move || job(&*target)).await {
                        tracing::error!(error = %err, "collection job aborted");
                    }
                }
                Command::Shutdown { resp } => {
                    let _ = resp.send(());
                    break;
                }
            }
        }
        tracing::debug!("collection worker stopped");
    });

    CollectionHandle { cmd_tx, events_tx }
}

impl<C: Send + Sync + 'static> CollectionHandle<C> {
    /// Subscribes to mutation events from this worker.
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionEvent> {
        self.events_tx.subscribe()
    }

    /// Runs `f` against the collection on the worker and returns its result.
    pub async fn call<T, F>(&self, f: F) -> Result<T, RuntimeError>
    where
        F: FnOnce(&C) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job<C> = Box::new(move |collection| {
            let _ = tx.send(f(collection));
        });
        self.cmd_tx
            .send(Command::Run { job })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        Ok(rx.await.map_err(|_| RuntimeError::ChannelClosed)??)
    }

    /// Finishes queued jobs, then stops the worker.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    fn events(&self) -> broadcast::Sender<CollectionEvent> {
        self.events_tx.clone()
    }
}

impl<S: DocumentSink + 'static> CollectionHandle<MessageCollection<S>> {
    /// Stores a new unread message.
    pub async fn submit(&self, draft: MessageDraft) -> Result<MessageRecord, RuntimeError> {
        let events = self.events();
        self.call(move |messages| {
            let (index, record) = messages.submit(draft)?;
            let _ = events.send(CollectionEvent::Appended {
                kind: MessageRecord::KIND,
                index,
            });
            Ok(record)
        })
        .await
    }

    /// All messages in order.
    pub async fn list(&self) -> Result<Vec<MessageRecord>, RuntimeError> {
        self.call(|messages| messages.list()).await
    }

    /// Sets the read flag of the message at `index`.
    pub async fn mark_read(
        &self,
        index: RecordIndex,
        read: bool,
    ) -> Result<MessageRecord, RuntimeError> {
        let events = self.events();
        self.call(move |messages| {
            let record = messages.mark_read(index, read)?;
            let _ = events.send(CollectionEvent::Patched {
                kind: MessageRecord::KIND,
                index,
                field: "read",
            });
            Ok(record)
        })
        .await
    }
}

impl<S: DocumentSink + 'static> CollectionHandle<ProductCollection<S>> {
    /// Saves `files` and appends a product referencing them.
    pub async fn create(
        &self,
        fields: ProductFields,
        files: Vec<UploadedFile>,
    ) -> Result<ProductRecord, RuntimeError> {
        let events = self.events();
        self.call(move |products| {
            let (index, record) = products.create(fields, &files)?;
            let _ = events.send(CollectionEvent::Appended {
                kind: ProductRecord::KIND,
                index,
            });
            Ok(record)
        })
        .await
    }

    /// All products in order.
    pub async fn list(&self) -> Result<Vec<ProductRecord>, RuntimeError> {
        self.call(|products| products.list()).await
    }

    /// Replaces the product at `index`, keeping its images when `files` is empty.
    pub async fn update(
        &self,
        index: RecordIndex,
        fields: ProductFields,
        files: Vec<UploadedFile>,
    ) -> Result<ProductRecord, RuntimeError> {
        let events = self.events();
        self.call(move |products| {
            let record = products.update(index, fields, &files)?;
            let _ = events.send(CollectionEvent::Replaced {
                kind: ProductRecord::KIND,
                index,
            });
            Ok(record)
        })
        .await
    }

    /// Removes the product at `index`.
    pub async fn delete(&self, index: RecordIndex) -> Result<ProductRecord, RuntimeError> {
        let events = self.events();
        self.call(move |products| {
            let record = products.delete(index)?;
            let _ = events.send(CollectionEvent::Deleted {
                kind: ProductRecord::KIND,
                index,
            });
            Ok(record)
        })
        .await
    }
}
