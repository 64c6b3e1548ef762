//! Inventory domain module.
//!
//! This crate contains the catalog item entity, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{Item, ItemView, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
