//! `erpbench-auth`: authorization boundary for externally visible identifiers.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod gateway;
pub mod user;

pub use gateway::{AccessError, InMemoryTokenRegistry, TokenRegistry, resolve_external};
pub use user::{User, UserStatus, UserView};
