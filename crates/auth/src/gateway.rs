//! Identifier gateway: maps opaque external tokens to internal store keys.
//!
//! The token space is disjoint from the key space. Tokens are minted at
//! random and the association lives only in the registry's side table, so no
//! token can be computed from a key (or from another token).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use erpbench_core::{InternalId, OpaqueToken};

/// Uniform failure of the external lookup path.
///
/// Deliberately a single variant: "unknown", "malformed" and "exists but
/// hidden" must be indistinguishable to the caller.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("not found")]
    NotFound,
}

/// Token registry abstraction.
pub trait TokenRegistry: Send + Sync {
    /// Mint (or return the existing) token for an internal key.
    fn issue(&self, id: InternalId) -> OpaqueToken;

    /// Internal key registered for a token.
    fn resolve(&self, token: &OpaqueToken) -> Option<InternalId>;

    /// Token currently registered for an internal key.
    fn token_for(&self, id: InternalId) -> Option<OpaqueToken>;

    /// Forget both directions of the mapping for a key.
    fn revoke(&self, id: InternalId) -> Option<OpaqueToken>;

    /// Number of live mappings.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse + resolve untrusted text. Malformed text (raw integers included)
    /// resolves to nothing.
    fn resolve_str(&self, raw: &str) -> Option<InternalId> {
        match raw.parse::<OpaqueToken>() {
            Ok(token) => self.resolve(&token),
            Err(e) => {
                tracing::debug!(error = %e, "rejecting malformed token");
                None
            }
        }
    }
}

impl<S> TokenRegistry for Arc<S>
where
    S: TokenRegistry + ?Sized,
{
    fn issue(&self, id: InternalId) -> OpaqueToken {
        (**self).issue(id)
    }

    fn resolve(&self, token: &OpaqueToken) -> Option<InternalId> {
        (**self).resolve(token)
    }

    fn token_for(&self, id: InternalId) -> Option<OpaqueToken> {
        (**self).token_for(id)
    }

    fn revoke(&self, id: InternalId) -> Option<OpaqueToken> {
        (**self).revoke(id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn resolve_str(&self, raw: &str) -> Option<InternalId> {
        (**self).resolve_str(raw)
    }
}

/// External-facing lookup: every failure collapses into [`AccessError::NotFound`].
pub fn resolve_external<R>(registry: &R, raw: &str) -> Result<InternalId, AccessError>
where
    R: TokenRegistry + ?Sized,
{
    registry.resolve_str(raw).ok_or(AccessError::NotFound)
}

type TokenSource = Box<dyn Fn() -> OpaqueToken + Send + Sync>;

#[derive(Debug, Default)]
struct Tables {
    forward: HashMap<OpaqueToken, InternalId>,
    reverse: HashMap<InternalId, OpaqueToken>,
}

/// In-memory token registry.
///
/// Both directions of the mapping sit behind one lock, so a token is never
/// visible in one table and missing from the other.
pub struct InMemoryTokenRegistry {
    tables: RwLock<Tables>,
    source: TokenSource,
}

impl InMemoryTokenRegistry {
    pub fn new() -> Self {
        Self::with_source(OpaqueToken::random)
    }

    /// Registry drawing tokens from a custom source (tests).
    pub fn with_source<F>(source: F) -> Self
    where
        F: Fn() -> OpaqueToken + Send + Sync + 'static,
    {
        Self {
            tables: RwLock::new(Tables::default()),
            source: Box::new(source),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // Every critical section is a handful of map operations that cannot
    // panic, so a poisoned lock still guards consistent tables.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryTokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for InMemoryTokenRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryTokenRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl TokenRegistry for InMemoryTokenRegistry {
    fn issue(&self, id: InternalId) -> OpaqueToken {
        let mut tables = self.write();
        if let Some(existing) = tables.reverse.get(&id) {
            return *existing;
        }

        let token = loop {
            let candidate = (self.source)();
            if !tables.forward.contains_key(&candidate) {
                break candidate;
            }
            tracing::warn!("token collision; drawing again");
        };

        tables.forward.insert(token, id);
        tables.reverse.insert(id, token);
        token
    }

    fn resolve(&self, token: &OpaqueToken) -> Option<InternalId> {
        self.read().forward.get(token).copied()
    }

    fn token_for(&self, id: InternalId) -> Option<OpaqueToken> {
        self.read().reverse.get(&id).copied()
    }

    fn revoke(&self, id: InternalId) -> Option<OpaqueToken> {
        let mut tables = self.write();
        let token = tables.reverse.remove(&id)?;
        tables.forward.remove(&token);
        Some(token)
    }

    fn len(&self) -> usize {
        self.read().forward.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use proptest::prelude::*;

    #[test]
    fn issue_then_resolve() {
        let registry = InMemoryTokenRegistry::new();
        let id = InternalId::new(7);

        let token = registry.issue(id);
        assert_eq!(registry.resolve(&token), Some(id));
        assert_eq!(registry.resolve_str(&token.to_string()), Some(id));
        assert_eq!(registry.token_for(id), Some(token));
    }

    #[test]
    fn issue_is_idempotent_per_key() {
        let registry = InMemoryTokenRegistry::new();
        let id = InternalId::FIRST;

        let first = registry.issue(id);
        let second = registry.issue(id);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn raw_sequential_ids_never_resolve() {
        let registry = InMemoryTokenRegistry::new();
        for n in 1..=10 {
            registry.issue(InternalId::new(n));
        }

        for n in 0..=20u64 {
            assert_eq!(registry.resolve_str(&n.to_string()), None);
            assert_eq!(
                resolve_external(&registry, &n.to_string()),
                Err(AccessError::NotFound)
            );
        }
    }

    #[test]
    fn unknown_wellformed_token_is_not_found() {
        let registry = InMemoryTokenRegistry::new();
        registry.issue(InternalId::FIRST);

        let stranger = OpaqueToken::random().to_string();
        assert_eq!(resolve_external(&registry, &stranger), Err(AccessError::NotFound));
    }

    #[test]
    fn revoke_removes_both_directions() {
        let registry = InMemoryTokenRegistry::new();
        let id = InternalId::new(3);
        let token = registry.issue(id);

        assert_eq!(registry.revoke(id), Some(token));
        assert_eq!(registry.resolve(&token), None);
        assert_eq!(registry.token_for(id), None);
        assert!(registry.is_empty());
        assert_eq!(registry.revoke(id), None);
    }

    #[test]
    fn colliding_source_is_retried() {
        let fixed = OpaqueToken::random();
        let draws = Mutex::new(vec![OpaqueToken::random(), fixed, fixed]);
        let registry = InMemoryTokenRegistry::with_source(move || {
            draws
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(OpaqueToken::random)
        });

        let a = registry.issue(InternalId::new(1));
        let b = registry.issue(InternalId::new(2));
        assert_eq!(a, fixed);
        assert_ne!(b, fixed);
        assert_eq!(registry.resolve(&a), Some(InternalId::new(1)));
        assert_eq!(registry.resolve(&b), Some(InternalId::new(2)));
    }

    #[test]
    fn sequential_tokens_are_not_offsets_of_each_other() {
        let registry = InMemoryTokenRegistry::new();
        let tokens: Vec<u128> = (1..=64)
            .map(|n| registry.issue(InternalId::new(n)).as_uuid().as_u128())
            .collect();

        let deltas: HashSet<u128> = tokens
            .windows(2)
            .map(|w| w[1].wrapping_sub(w[0]))
            .collect();

        // A counter (or any affine encoding of one) yields a single delta.
        assert!(deltas.len() > 1);
        assert!(!deltas.contains(&1));
    }

    #[test]
    fn concurrent_issue_yields_unique_tokens() {
        let registry = InMemoryTokenRegistry::arc();
        let handles: Vec<_> = (1..=128u64)
            .map(|n| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.issue(InternalId::new(n)))
            })
            .collect();

        let tokens: HashSet<OpaqueToken> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(tokens.len(), 128);
        assert_eq!(registry.len(), 128);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no integer text is ever accepted as a token.
        #[test]
        fn integer_text_never_resolves(n in any::<i64>()) {
            let registry = InMemoryTokenRegistry::new();
            if n > 0 {
                registry.issue(InternalId::new(n.unsigned_abs()));
            }
            prop_assert_eq!(resolve_external(&registry, &n.to_string()), Err(AccessError::NotFound));
        }

        /// Property: a token issued for one key never resolves to another.
        #[test]
        fn tokens_resolve_to_their_own_key(keys in prop::collection::hash_set(1u64..10_000, 1..32)) {
            let registry = InMemoryTokenRegistry::new();
            let issued: Vec<(InternalId, OpaqueToken)> = keys
                .iter()
                .map(|k| {
                    let id = InternalId::new(*k);
                    (id, registry.issue(id))
                })
                .collect();

            for (id, token) in issued {
                prop_assert_eq!(registry.resolve(&token), Some(id));
            }
        }
    }
}
