use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use erpbench_core::InternalId;

/// A value as held by a store, together with the key the store assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<V> {
    pub id: InternalId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub value: V,
}

/// Entity store error.
///
/// Contention is never an error; writes fail only when the store cannot
/// accept them at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store is closed")]
    Unavailable,
    #[error("internal key space exhausted")]
    KeySpaceExhausted,
}

/// Keyed entity store with monotonic key assignment.
pub trait EntityStore: Send + Sync {
    type Value;

    /// Store a new value under the next key (starting at 1).
    fn create(&self, value: Self::Value) -> Result<InternalId, StoreError>;

    /// Copy of the record stored under `id`.
    fn get(&self, id: InternalId) -> Option<Record<Self::Value>>;

    /// Insert or overwrite the value under `id`.
    fn save(&self, id: InternalId, value: Self::Value) -> Result<(), StoreError>;

    /// Remove a record. Its key is never handed out again.
    fn delete(&self, id: InternalId) -> Result<Option<Record<Self::Value>>, StoreError>;

    /// Keys of all live records, ascending.
    fn ids(&self) -> Vec<InternalId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refuse further writes. Reads keep answering.
    fn close(&self);

    fn is_closed(&self) -> bool;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    type Value = S::Value;

    fn create(&self, value: Self::Value) -> Result<InternalId, StoreError> {
        (**self).create(value)
    }

    fn get(&self, id: InternalId) -> Option<Record<Self::Value>> {
        (**self).get(id)
    }

    fn save(&self, id: InternalId, value: Self::Value) -> Result<(), StoreError> {
        (**self).save(id, value)
    }

    fn delete(&self, id: InternalId) -> Result<Option<Record<Self::Value>>, StoreError> {
        (**self).delete(id)
    }

    fn ids(&self) -> Vec<InternalId> {
        (**self).ids()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn close(&self) {
        (**self).close()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

#[derive(Debug)]
struct Inner<V> {
    /// Next key to hand out; `None` once `u64` is exhausted.
    next: Option<InternalId>,
    records: HashMap<InternalId, Record<V>>,
    closed: bool,
}

/// In-memory entity store.
///
/// The key counter, the record map and the closed flag share one lock, so
/// key assignment and insertion happen as a single step and a reader never
/// sees a half-applied write.
#[derive(Debug)]
pub struct InMemoryEntityStore<V> {
    inner: RwLock<Inner<V>>,
}

impl<V> InMemoryEntityStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next: Some(InternalId::FIRST),
                records: HashMap::new(),
                closed: false,
            }),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // Critical sections only do map operations that cannot panic, so a
    // poisoned lock still guards consistent state.
    fn read(&self) -> RwLockReadGuard<'_, Inner<V>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<V>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> Default for InMemoryEntityStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EntityStore for InMemoryEntityStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    type Value = V;

    fn create(&self, value: V) -> Result<InternalId, StoreError> {
        let mut inner = self.write();
        if inner.closed {
            tracing::warn!("create refused: store is closed");
            return Err(StoreError::Unavailable);
        }

        let id = inner.next.ok_or(StoreError::KeySpaceExhausted)?;
        inner.next = id.next();

        let now = Utc::now();
        inner.records.insert(
            id,
            Record {
                id,
                created_at: now,
                updated_at: now,
                value,
            },
        );

        tracing::debug!(id = %id, "record created");
        Ok(id)
    }

    fn get(&self, id: InternalId) -> Option<Record<V>> {
        self.read().records.get(&id).cloned()
    }

    fn save(&self, id: InternalId, value: V) -> Result<(), StoreError> {
        let mut inner = self.write();
        if inner.closed {
            tracing::warn!(id = %id, "save refused: store is closed");
            return Err(StoreError::Unavailable);
        }

        let now = Utc::now();
        match inner.records.entry(id) {
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                record.value = value;
                record.updated_at = now;
            }
            Entry::Vacant(slot) => {
                slot.insert(Record {
                    id,
                    created_at: now,
                    updated_at: now,
                    value,
                });
            }
        }

        // Keep the counter ahead of explicitly saved keys so `create` never
        // lands on one.
        if inner.next.is_some_and(|next| id >= next) {
            inner.next = id.next();
        }

        tracing::debug!(id = %id, "record saved");
        Ok(())
    }

    fn delete(&self, id: InternalId) -> Result<Option<Record<V>>, StoreError> {
        let mut inner = self.write();
        if inner.closed {
            tracing::warn!(id = %id, "delete refused: store is closed");
            return Err(StoreError::Unavailable);
        }

        let removed = inner.records.remove(&id);
        if removed.is_some() {
            tracing::debug!(id = %id, "record deleted");
        }
        Ok(removed)
    }

    fn ids(&self) -> Vec<InternalId> {
        let mut ids: Vec<InternalId> = self.read().records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn len(&self) -> usize {
        self.read().records.len()
    }

    fn close(&self) {
        let mut inner = self.write();
        if !inner.closed {
            inner.closed = true;
            tracing::info!(records = inner.records.len(), "entity store closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.read().closed
    }
}
