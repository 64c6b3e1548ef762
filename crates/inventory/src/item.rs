use serde::Serialize;

use erpbench_core::{DomainError, DomainResult, Entity, OpaqueToken};

/// Upper bound on an item name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Upper bound on an item description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 2_000;

/// Catalog item.
///
/// Plain value: identity is assigned by the store that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    name: String,
    description: String,
}

impl Item {
    /// Validate and build an item. The name is trimmed and must not be empty.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        let description = description.into();

        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::validation(format!(
                "description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(Self { name, description })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Entity for Item {
    const KIND: &'static str = "inventory.item";
}

/// What the outside world may see of an item.
///
/// Carries the opaque token only; the store key is never part of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: OpaqueToken,
    pub name: String,
    pub description: String,
}

impl ItemView {
    pub fn new(token: OpaqueToken, item: &Item) -> Self {
        Self {
            id: token,
            name: item.name.clone(),
            description: item.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_name_and_keeps_description() {
        let item = Item::new("  Test Item ", "Proven to be decoupled").unwrap();
        assert_eq!(item.name(), "Test Item");
        assert_eq!(item.description(), "Proven to be decoupled");
    }

    #[test]
    fn new_rejects_empty_name() {
        let err = Item::new("   ", "desc").unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn new_rejects_oversized_fields() {
        assert!(matches!(
            Item::new("x".repeat(MAX_NAME_LEN + 1), ""),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Item::new("ok", "y".repeat(MAX_DESCRIPTION_LEN + 1)),
            Err(DomainError::Validation(_))
        ));
        assert!(Item::new("x".repeat(MAX_NAME_LEN), "").is_ok());
    }

    #[test]
    fn view_exposes_token_and_fields() {
        let item = Item::new("Widget", "blue").unwrap();
        let token = OpaqueToken::random();
        let view = ItemView::new(token, &item);
        assert_eq!(view.id, token);
        assert_eq!(view.name, "Widget");
        assert_eq!(view.description, "blue");
    }

    #[test]
    fn items_are_always_visible() {
        let item = Item::new("Widget", "").unwrap();
        assert!(item.is_visible());
    }
}
