//! User entity and its external projection.

use serde::Serialize;

use erpbench_core::{DomainError, DomainResult, Entity, OpaqueToken};

// ─────────────────────────────────────────────────────────────────────────────
// User Status
// ─────────────────────────────────────────────────────────────────────────────

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User is active and visible through the external path.
    #[default]
    Active,
    /// User is disabled; externally indistinguishable from a missing user.
    Disabled,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "Active"),
            UserStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// User entity.
///
/// # Invariants
/// - `email` is trimmed, lowercased and contains an `@`.
/// - `display_name` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    email: String,
    display_name: String,
    status: UserStatus,
}

impl User {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        let email = email.into();
        let display_name = display_name.into();

        // Validate email format (basic check)
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        if display_name.trim().is_empty() {
            return Err(DomainError::validation("display name cannot be empty"));
        }

        Ok(Self {
            email: email.trim().to_lowercase(),
            display_name: display_name.trim().to_string(),
            status: UserStatus::Active,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Copy of this user with the given status.
    pub fn with_status(&self, status: UserStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "auth.user";

    fn is_visible(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// External view
// ─────────────────────────────────────────────────────────────────────────────

/// What the outside world may see of a user.
///
/// Carries the opaque token only; the store key is never part of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: OpaqueToken,
    pub display_name: String,
    pub email: String,
}

impl UserView {
    pub fn new(token: OpaqueToken, user: &User) -> Self {
        Self {
            id: token,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
        }
    }
}
