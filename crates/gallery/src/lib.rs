//! Gallery controller: the in-memory item list, the viewer over it, and the
//! write-behind link to the persistent media store.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use shared::{
    domain::{FileInput, MediaId, MediaKind, MediaRecord},
    error::MediaStoreError,
};
use storage::{MediaStore, Storage};
use tracing::{debug, info, warn};

pub mod display;
pub mod viewer;
pub mod writer;

pub use display::{DisplayHandle, DisplayRegistry};
pub use viewer::{Key, PointerTarget, Presentation, Size, Slide, Viewer, ViewerState};
pub use writer::StoreWriter;

pub const DEFAULT_CAPACITY: usize = 120;

/// An item on screen. Owns its display handle, which is released when the item
/// is dropped.
#[derive(Debug)]
pub struct GalleryItem {
    pub id: MediaId,
    pub name: String,
    pub kind: MediaKind,
    display: DisplayHandle,
}

impl GalleryItem {
    pub fn display(&self) -> &DisplayHandle {
        &self.display
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub unsupported: usize,
    pub dropped_over_capacity: usize,
}

pub struct GalleryController {
    items: Vec<GalleryItem>,
    viewer: Viewer,
    capacity: usize,
    last_order: i64,
    store: Option<Arc<dyn MediaStore>>,
    writer: Option<StoreWriter>,
    registry: DisplayRegistry,
}

impl GalleryController {
    /// Opens the store at `database_url` and replays it. An unavailable store
    /// yields a session without persistence rather than an error.
    pub async fn start(database_url: &str, capacity: usize) -> Self {
        let store: Option<Arc<dyn MediaStore>> = match Storage::initialize(database_url).await {
            Ok(storage) => Some(Arc::new(storage)),
            Err(err) => {
                warn!(error = %err, "starting gallery without persistence");
                None
            }
        };
        let mut controller = Self::with_store(store, capacity);
        controller.load_from_store().await;
        controller
    }

    /// Builds an empty controller over `store`. Spawns the store writer, so this
    /// must run inside a tokio runtime when a store is given.
    pub fn with_store(store: Option<Arc<dyn MediaStore>>, capacity: usize) -> Self {
        let writer = store.clone().map(StoreWriter::spawn);
        Self {
            items: Vec::new(),
            viewer: Viewer::new(),
            capacity,
            last_order: i64::MIN,
            store,
            writer,
            registry: DisplayRegistry::new(),
        }
    }

    /// Replaces the item list with the persisted records in insertion order.
    pub async fn load_from_store(&mut self) {
        self.viewer.close();
        self.items.clear();

        let Some(store) = self.store.clone() else {
            return;
        };
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }

        let mut records = match store.get_all().await {
            Ok(records) => records,
            Err(source) => {
                let err = MediaStoreError::ReadFailed { source };
                warn!(error = %err, "starting gallery with no persisted items");
                return;
            }
        };
        records.sort_by_key(|r| r.order);
        if let Some(max_order) = records.iter().map(|r| r.order).max() {
            self.last_order = self.last_order.max(max_order);
        }

        if records.len() > self.capacity {
            warn!(
                persisted = records.len(),
                capacity = self.capacity,
                "persisted items exceed capacity; extra items are not shown"
            );
            records.truncate(self.capacity);
        }

        for record in records {
            self.items.push(GalleryItem {
                display: self.registry.create(record.blob),
                id: record.id,
                name: record.name,
                kind: record.kind,
            });
        }
        info!(items = self.items.len(), "loaded persisted gallery");
    }

    pub fn ingest(&mut self, files: impl IntoIterator<Item = FileInput>) -> IngestReport {
        self.ingest_at(files, Utc::now().timestamp_millis())
    }

    /// Ingests with `now_ms` as the capture time of the batch.
    pub fn ingest_at(
        &mut self,
        files: impl IntoIterator<Item = FileInput>,
        now_ms: i64,
    ) -> IngestReport {
        let mut report = IngestReport::default();

        for file in files {
            let Some(kind) = file.kind() else {
                let err = MediaStoreError::UnsupportedFile {
                    name: file.name,
                    mime_type: file.mime_type,
                };
                debug!(error = %err, "skipping file");
                report.unsupported += 1;
                continue;
            };
            if self.remaining() == 0 {
                report.dropped_over_capacity += 1;
                continue;
            }

            let batch_index = report.accepted as i64;
            let order = now_ms
                .saturating_add(batch_index)
                .max(self.last_order.saturating_add(1));
            self.last_order = order;

            let record = MediaRecord {
                id: file.id(),
                name: file.name,
                kind,
                blob: file.bytes,
                order,
            };
            self.items.push(GalleryItem {
                id: record.id.clone(),
                name: record.name.clone(),
                kind,
                display: self.registry.create(record.blob.clone()),
            });
            if let Some(writer) = &self.writer {
                writer.put(record);
            }
            report.accepted += 1;
        }

        if report.dropped_over_capacity > 0 {
            debug!(
                dropped = report.dropped_over_capacity,
                capacity = self.capacity,
                "gallery full; extra files dropped"
            );
        }
        info!(
            accepted = report.accepted,
            unsupported = report.unsupported,
            total = self.items.len(),
            "ingested files"
        );
        report
    }

    /// Removes the first item with `id`. Returns whether an item was removed.
    pub fn remove(&mut self, id: &MediaId) -> bool {
        let Some(position) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        self.items.remove(position);
        if let Some(writer) = &self.writer {
            writer.delete(id.clone());
        }
        self.viewer.on_item_removed(position, self.items.len());
        info!(id = %id, total = self.items.len(), "removed item");
        true
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn open_viewer(&mut self, index: usize) -> bool {
        self.viewer.open(index, self.items.len())
    }

    pub fn close_viewer(&mut self) {
        self.viewer.close();
    }

    pub fn show_previous(&mut self) {
        self.viewer.previous(self.items.len());
    }

    pub fn show_next(&mut self) {
        self.viewer.next(self.items.len());
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        self.viewer.handle_key(key, self.items.len())
    }

    pub fn handle_pointer(&mut self, target: PointerTarget) {
        self.viewer.handle_pointer(target, self.items.len());
    }

    pub fn current_slide(&self, viewport: Size) -> Option<Slide<'_>> {
        self.viewer.slide(&self.items, viewport)
    }

    /// Waits for all queued store writes to be applied.
    pub async fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }

    pub fn failed_writes(&self) -> u64 {
        self.writer.as_ref().map_or(0, StoreWriter::failed_writes)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
