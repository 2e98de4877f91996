//! Path-addressed suggestions
//!
//! A [`Suggestion`] is an immutable proposal to create, update or delete an
//! entity or one of its fields. Suggestions relate to entities, and to each
//! other, only through their path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// CRUD action carried by suggestions and operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Introduce a new entity or value
    Create,

    /// Change an existing entity or value
    Update,

    /// Remove an entity
    Delete,
}

impl Action {
    /// Check if action writes field values
    #[inline]
    #[must_use]
    pub fn writes_fields(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("CREATE"),
            Self::Update => f.write_str("UPDATE"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// Kind tag of a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    /// Whole-entity suggestion
    Entity,
    /// Single-field suggestion
    Field,
}

/// Suggestion targeting a whole entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySuggestion {
    /// Address of the entity
    pub path: String,

    /// Proposed action
    pub action: Action,

    /// Entity value before the change, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<Value>,

    /// Entity value after the change (`null` for deletes)
    #[serde(default)]
    pub suggested_value: Value,
}

/// Suggestion targeting one field of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSuggestion {
    /// Address of the field
    pub path: String,

    /// Proposed action
    pub action: Action,

    /// Name of the field; suggestions without one cannot be routed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    /// Field value before the change, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<Value>,

    /// Proposed field value
    #[serde(default)]
    pub suggested_value: Value,
}

/// Proposed edit, tagged by what it targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Suggestion {
    /// Entity-level suggestion
    Entity(EntitySuggestion),

    /// Field-level suggestion
    Field(FieldSuggestion),
}

impl Suggestion {
    /// Create entity-level suggestion
    #[must_use]
    pub fn entity(
        path: impl Into<String>,
        action: Action,
        original_value: Option<Value>,
        suggested_value: Value,
    ) -> Self {
        Self::Entity(EntitySuggestion {
            path: path.into(),
            action,
            original_value,
            suggested_value,
        })
    }

    /// Create field-level suggestion
    #[must_use]
    pub fn field(
        path: impl Into<String>,
        action: Action,
        field_name: impl Into<String>,
        original_value: Option<Value>,
        suggested_value: Value,
    ) -> Self {
        Self::Field(FieldSuggestion {
            path: path.into(),
            action,
            field_name: Some(field_name.into()),
            original_value,
            suggested_value,
        })
    }

    /// Address of the suggestion
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Entity(s) => &s.path,
            Self::Field(s) => &s.path,
        }
    }

    /// Proposed action
    #[inline]
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Self::Entity(s) => s.action,
            Self::Field(s) => s.action,
        }
    }

    /// Kind tag
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SuggestionKind {
        match self {
            Self::Entity(_) => SuggestionKind::Entity,
            Self::Field(_) => SuggestionKind::Field,
        }
    }

    /// Value before the change
    #[inline]
    #[must_use]
    pub fn original_value(&self) -> Option<&Value> {
        match self {
            Self::Entity(s) => s.original_value.as_ref(),
            Self::Field(s) => s.original_value.as_ref(),
        }
    }

    /// Proposed value
    #[inline]
    #[must_use]
    pub fn suggested_value(&self) -> &Value {
        match self {
            Self::Entity(s) => &s.suggested_value,
            Self::Field(s) => &s.suggested_value,
        }
    }

    /// Non-empty field name of a field suggestion
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Field(s) => s.field_name.as_deref().filter(|name| !name.is_empty()),
            Self::Entity(_) => None,
        }
    }

    /// Entity payload, if entity-typed
    #[inline]
    #[must_use]
    pub fn as_entity(&self) -> Option<&EntitySuggestion> {
        match self {
            Self::Entity(s) => Some(s),
            Self::Field(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Action::Create).unwrap(), json!("CREATE"));
        let action: Action = serde_json::from_value(json!("DELETE")).unwrap();
        assert_eq!(action, Action::Delete);
        assert_eq!(Action::Update.to_string(), "UPDATE");
    }

    #[test]
    fn action_writes_fields() {
        assert!(Action::Create.writes_fields());
        assert!(Action::Update.writes_fields());
        assert!(!Action::Delete.writes_fields());
    }

    #[test]
    fn suggestion_deserializes_tagged() {
        let raw = json!({
            "type": "field",
            "path": "initiative.I-1.title",
            "action": "UPDATE",
            "fieldName": "title",
            "originalValue": "Old",
            "suggestedValue": "New"
        });
        let suggestion: Suggestion = serde_json::from_value(raw).unwrap();
        assert_eq!(suggestion.kind(), SuggestionKind::Field);
        assert_eq!(suggestion.field_name(), Some("title"));
        assert_eq!(suggestion.original_value(), Some(&json!("Old")));
    }

    #[test]
    fn suggestion_without_field_name() {
        let raw = json!({
            "type": "field",
            "path": "initiative.I-1.title",
            "action": "UPDATE",
            "suggestedValue": "New"
        });
        let suggestion: Suggestion = serde_json::from_value(raw).unwrap();
        assert_eq!(suggestion.field_name(), None);

        let blank = Suggestion::field("initiative.I-1.title", Action::Update, "", None, json!(1));
        assert_eq!(blank.field_name(), None);
    }

    #[test]
    fn entity_accessors() {
        let s = Suggestion::entity("initiative.I-1", Action::Delete, None, Value::Null);
        assert_eq!(s.path(), "initiative.I-1");
        assert_eq!(s.action(), Action::Delete);
        assert!(s.as_entity().is_some());
        assert!(s.field_name().is_none());
    }
}
