//! Strongly-typed identifiers used across the domain.
//!
//! Two identifier spaces exist and must never be mixed:
//! - [`InternalId`]: the store's monotonic key. Never leaves the process.
//! - [`OpaqueToken`]: the externally visible handle. Random, carries no
//!   information about the internal key it maps to.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Monotonic key assigned by an entity store (starts at 1, never reused).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InternalId(u64);

impl InternalId {
    /// First identifier handed out by an empty store.
    pub const FIRST: InternalId = InternalId(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier following this one, or `None` once `u64` is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl core::fmt::Display for InternalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for InternalId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<InternalId> for u64 {
    fn from(value: InternalId) -> Self {
        value.0
    }
}

const SIMPLE_LEN: usize = 32;
const HYPHENATED_LEN: usize = 36;

/// Externally visible identifier of an entity.
///
/// Backed by a random (v4) UUID, so consecutive tokens share no arithmetic
/// relationship and cannot be derived from the internal key. Rendered in the
/// 32-char "simple" hex form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OpaqueToken(Uuid);

impl OpaqueToken {
    /// Mint a fresh random token.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for OpaqueToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.simple(), f)
    }
}

impl FromStr for OpaqueToken {
    type Err = DomainError;

    /// Accepts the simple (32 hex) and hyphenated (36 char) UUID forms only,
    /// with no surrounding whitespace, so a token has one external spelling
    /// per form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != SIMPLE_LEN && s.len() != HYPHENATED_LEN {
            return Err(DomainError::invalid_id(format!(
                "OpaqueToken: expected {SIMPLE_LEN} or {HYPHENATED_LEN} characters, found {}",
                s.len()
            )));
        }
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("OpaqueToken: {e}")))?;
        Ok(Self(uuid))
    }
}

impl From<OpaqueToken> for String {
    fn from(value: OpaqueToken) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for OpaqueToken {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
