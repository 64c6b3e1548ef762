//! Infrastructure layer: entity storage and the service facade over it.

pub mod facade;
pub mod store;

pub use facade::{InMemoryFacade, ServiceError, ServiceFacade};
pub use store::{EntityStore, InMemoryEntityStore, Record, StoreError};
