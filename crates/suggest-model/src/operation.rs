//! CRUD operations keyed by stable identifier
//!
//! [`Operation`] is the shape the merge applier folds into a collection and
//! the shape inline child changes arrive in.

use crate::entity::Fields;
use crate::suggestion::Action;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One create/update/delete against an identified entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Target identifier
    pub identifier: String,

    /// Action to apply
    pub action: Action,

    /// Field values written by create/update
    #[serde(flatten)]
    pub fields: Fields,
}

impl Operation {
    /// Create operation
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<String>, action: Action) -> Self {
        Self {
            identifier: identifier.into(),
            action,
            fields: Fields::new(),
        }
    }

    /// Create-operation shorthand
    #[inline]
    #[must_use]
    pub fn create(identifier: impl Into<String>) -> Self {
        Self::new(identifier, Action::Create)
    }

    /// Update-operation shorthand
    #[inline]
    #[must_use]
    pub fn update(identifier: impl Into<String>) -> Self {
        Self::new(identifier, Action::Update)
    }

    /// Delete-operation shorthand
    #[inline]
    #[must_use]
    pub fn delete(identifier: impl Into<String>) -> Self {
        Self::new(identifier, Action::Delete)
    }

    /// Set a field, returning the operation
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_flattens_fields() {
        let raw = json!({"identifier": "T-1", "action": "UPDATE", "title": "New"});
        let op: Operation = serde_json::from_value(raw).unwrap();
        assert_eq!(op.action, Action::Update);
        assert_eq!(op.fields.get("title"), Some(&json!("New")));
        assert!(!op.fields.contains_key("identifier"));
    }

    #[test]
    fn operation_builders() {
        let op = Operation::create("T-9").with_field("done", true);
        assert_eq!(op.identifier, "T-9");
        assert_eq!(op.action, Action::Create);
        assert_eq!(op.fields.len(), 1);
        assert_eq!(Operation::delete("T-9").action, Action::Delete);
    }
}
