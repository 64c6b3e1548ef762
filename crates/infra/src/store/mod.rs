//! Keyed entity storage.

pub mod entity_store;

pub use entity_store::{EntityStore, InMemoryEntityStore, Record, StoreError};
