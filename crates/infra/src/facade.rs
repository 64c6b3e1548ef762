//! Service facade (application-level composition).
//!
//! Composes the entity stores and the identifier gateway into the operations
//! a transport layer needs. Holds no state of its own: every collaborator is
//! handed in at construction, so the same facade runs behind HTTP, in a CLI
//! or directly in tests.
//!
//! ## Request flow
//!
//! ```text
//! raw token (untrusted text)
//!   ↓
//! 1. Resolve through the token registry (malformed / unknown → NotFound)
//!   ↓
//! 2. Load the record from the store by internal key (absent → NotFound)
//!   ↓
//! 3. Visibility check on the entity (hidden → NotFound)
//!   ↓
//! 4. Build a view carrying the token, never the internal key
//! ```
//!
//! Steps 1–3 fail with the same [`ServiceError::NotFound`], so a caller
//! cannot tell "does not exist" from "exists but not for you".

use std::sync::Arc;

use tracing::instrument;

use erpbench_auth::{
    AccessError, InMemoryTokenRegistry, TokenRegistry, User, UserStatus, UserView, resolve_external,
};
use erpbench_core::{CorrelationId, DomainError, Entity, InternalId, OpaqueToken};
use erpbench_inventory::{Item, ItemView};

use crate::store::{EntityStore, InMemoryEntityStore, Record, StoreError};

/// Failure of a facade operation, as seen by a transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Unknown, malformed or hidden identifier (single uniform signal).
    #[error("not found")]
    NotFound,
    /// The backing store refuses writes (shut down).
    #[error("store unavailable")]
    StoreUnavailable,
    /// Input rejected by domain validation.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<StoreError> for ServiceError {
    fn from(_: StoreError) -> Self {
        ServiceError::StoreUnavailable
    }
}

impl From<AccessError> for ServiceError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::NotFound => ServiceError::NotFound,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(_) => ServiceError::NotFound,
        }
    }
}

/// Facade wired with the in-memory store and registry.
pub type InMemoryFacade = ServiceFacade<
    Arc<InMemoryEntityStore<Item>>,
    Arc<InMemoryEntityStore<User>>,
    Arc<InMemoryTokenRegistry>,
>;

impl InMemoryFacade {
    /// Default dev/test wiring: fresh stores, fresh registries.
    pub fn in_memory() -> Self {
        ServiceFacade::new(
            InMemoryEntityStore::arc(),
            InMemoryEntityStore::arc(),
            InMemoryTokenRegistry::arc(),
            InMemoryTokenRegistry::arc(),
        )
    }
}

/// Entry point for transports.
///
/// ## Generic Parameters
///
/// - `IS`: item store
/// - `US`: user store
/// - `R`: token registry (one instance per entity kind, so tokens of one
///   kind never resolve as another)
#[derive(Debug, Clone)]
pub struct ServiceFacade<IS, US, R> {
    items: IS,
    users: US,
    item_tokens: R,
    user_tokens: R,
}

impl<IS, US, R> ServiceFacade<IS, US, R> {
    pub fn new(items: IS, users: US, item_tokens: R, user_tokens: R) -> Self {
        Self {
            items,
            users,
            item_tokens,
            user_tokens,
        }
    }

    /// Direct access to the item store (internal callers only).
    pub fn items(&self) -> &IS {
        &self.items
    }

    /// Direct access to the user store (internal callers only).
    pub fn users(&self) -> &US {
        &self.users
    }

    /// Run `f` inside a span tagged with the request's correlation id.
    pub fn with_correlation<T>(&self, correlation: &CorrelationId, f: impl FnOnce(&Self) -> T) -> T {
        let span = tracing::info_span!(
            "request",
            correlation_id = correlation.value(),
            correlation_outcome = ?correlation.outcome(),
        );
        span.in_scope(|| f(self))
    }
}

impl<IS, US, R> ServiceFacade<IS, US, R>
where
    IS: EntityStore<Value = Item>,
    US: EntityStore<Value = User>,
    R: TokenRegistry,
{
    /// Create an item and mint its external token.
    #[instrument(skip_all, err)]
    pub fn create_item(&self, name: &str, description: &str) -> Result<ItemView, ServiceError> {
        let item = Item::new(name, description)?;
        let id = self.items.create(item.clone())?;
        let token = self.item_tokens.issue(id);

        tracing::info!(kind = Item::KIND, "created");
        Ok(ItemView::new(token, &item))
    }

    /// Look up an item by its external token.
    #[instrument(skip_all, err)]
    pub fn get_item(&self, raw_token: &str) -> Result<ItemView, ServiceError> {
        let (token, record) = lookup_visible(&self.items, &self.item_tokens, raw_token)?;
        Ok(ItemView::new(token, &record.value))
    }

    /// Delete an item and invalidate its token.
    #[instrument(skip_all, err)]
    pub fn delete_item(&self, raw_token: &str) -> Result<(), ServiceError> {
        let id = resolve_external(&self.item_tokens, raw_token)?;

        // Delete first: if the store is closed the token must stay valid.
        let removed = self.items.delete(id)?;
        self.item_tokens.revoke(id);

        match removed {
            Some(_) => {
                tracing::info!(kind = Item::KIND, "deleted");
                Ok(())
            }
            None => Err(ServiceError::NotFound),
        }
    }

    /// Register a user and mint its external token.
    #[instrument(skip_all, err)]
    pub fn register_user(&self, display_name: &str, email: &str) -> Result<UserView, ServiceError> {
        let user = User::new(display_name, email)?;
        let id = self.users.create(user.clone())?;
        let token = self.user_tokens.issue(id);

        tracing::info!(kind = User::KIND, "created");
        Ok(UserView::new(token, &user))
    }

    /// Public view of a user. Disabled users are reported as not found.
    #[instrument(skip_all, err)]
    pub fn get_user_view(&self, raw_token: &str) -> Result<UserView, ServiceError> {
        let (token, record) = lookup_visible(&self.users, &self.user_tokens, raw_token)?;
        Ok(UserView::new(token, &record.value))
    }

    /// Disable a user; afterwards its token answers like an unknown one.
    #[instrument(skip_all, err)]
    pub fn disable_user(&self, raw_token: &str) -> Result<(), ServiceError> {
        let (_token, record) = lookup_visible(&self.users, &self.user_tokens, raw_token)?;
        self.users
            .save(record.id, record.value.with_status(UserStatus::Disabled))?;

        tracing::info!(kind = User::KIND, "disabled");
        Ok(())
    }

    /// Shut both stores down. Reads keep working; writes fail afterwards.
    pub fn close(&self) {
        self.items.close();
        self.users.close();
        tracing::info!("stores closed");
    }
}

/// Resolve `raw_token`, load the record and apply the visibility rule.
fn lookup_visible<V, S, R>(
    store: &S,
    tokens: &R,
    raw_token: &str,
) -> Result<(OpaqueToken, Record<V>), ServiceError>
where
    V: Entity,
    S: EntityStore<Value = V>,
    R: TokenRegistry,
{
    let id: InternalId = resolve_external(tokens, raw_token)?;
    let record = store.get(id).ok_or(ServiceError::NotFound)?;
    if !record.value.is_visible() {
        tracing::debug!(kind = V::KIND, "hidden record reported as not found");
        return Err(ServiceError::NotFound);
    }
    // Re-read the token: it may have been revoked since resolution.
    let token = tokens.token_for(id).ok_or(ServiceError::NotFound)?;
    Ok((token, record))
}
