//! Process-local display references for media blobs.
//!
//! A [`DisplayHandle`] stands in for the blob while an item is on screen. The
//! registry entry behind it lives exactly as long as the handle.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

const REFERENCE_PREFIX: &str = "blob:tripbook/";

#[derive(Default)]
struct RegistryInner {
    next_key: u64,
    live: HashMap<u64, Arc<[u8]>>,
}

#[derive(Clone, Default)]
pub struct DisplayRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl DisplayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, blob: Arc<[u8]>) -> DisplayHandle {
        let key = {
            let mut inner = self.lock();
            inner.next_key += 1;
            let key = inner.next_key;
            inner.live.insert(key, blob);
            key
        };
        DisplayHandle {
            key,
            reference: format!("{REFERENCE_PREFIX}{key}"),
            registry: self.clone(),
        }
    }

    /// Looks up a reference previously handed out by [`DisplayRegistry::create`].
    /// Released references resolve to `None`.
    pub fn resolve(&self, reference: &str) -> Option<Arc<[u8]>> {
        let key = reference
            .strip_prefix(REFERENCE_PREFIX)?
            .parse::<u64>()
            .ok()?;
        self.lock().live.get(&key).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    fn release(&self, key: u64) {
        self.lock().live.remove(&key);
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for DisplayRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

pub struct DisplayHandle {
    key: u64,
    reference: String,
    registry: DisplayRegistry,
}

impl DisplayHandle {
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn bytes(&self) -> Option<Arc<[u8]>> {
        self.registry.lock().live.get(&self.key).cloned()
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.registry.release(self.key);
    }
}

impl fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayHandle").field(&self.reference).finish()
    }
}
