use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use std::sync::Arc;

// Internal data structure, protected by a lock.
struct StorageInner<H: Key, T> {
    map: SlotMap<H, Arc<T>>,
    lookup: FxHashMap<String, H>,
    /// Identifiers in registration order.
    order: Vec<String>,
}

impl<H: Key, T> Default for StorageInner<H, T> {
    fn default() -> Self {
        Self {
            map: SlotMap::default(),
            lookup: FxHashMap::default(),
            order: Vec::new(),
        }
    }
}

/// Thread-safe asset container keyed by a stable string identifier.
pub struct AssetStorage<H: Key, T> {
    inner: RwLock<StorageInner<H, T>>,
}

impl<H: Key, T> Default for AssetStorage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Key, T> AssetStorage<H, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::default(),
        }
    }

    /// [Write] Adds an asset under `identifier` and returns its handle.
    ///
    /// Re-using an identifier keeps the old asset alive under its handle but
    /// points the identifier at the new one.
    pub fn add(&self, identifier: impl Into<String>, asset: impl Into<T>) -> H {
        let identifier = identifier.into();
        let mut guard = self.inner.write();
        let handle = guard.map.insert(Arc::new(asset.into()));
        if guard.lookup.insert(identifier.clone(), handle).is_some() {
            log::warn!("Asset identifier '{identifier}' registered twice, rebinding to the newest asset");
        } else {
            guard.order.push(identifier);
        }
        handle
    }

    /// [Read] Gets a single asset.
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        let guard = self.inner.read();
        guard.map.get(handle).cloned()
    }

    pub fn get_by_identifier(&self, identifier: &str) -> Option<Arc<T>> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(identifier)?;
        guard.map.get(*handle).cloned()
    }

    pub fn get_handle(&self, identifier: &str) -> Option<H> {
        let guard = self.inner.read();
        guard.lookup.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered identifiers, oldest first.
    pub fn identifiers(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }
}
