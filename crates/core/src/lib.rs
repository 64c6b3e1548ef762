//! `erpbench-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod correlation;
pub mod entity;
pub mod error;
pub mod id;

pub use correlation::{CorrelationId, CorrelationIdError, CorrelationOutcome, Overflow};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{InternalId, OpaqueToken};
