//! Entity values and the current-state snapshot
//!
//! Every entity carries a stable `identifier` plus free-form scalar fields.
//! Leaf-list items (checklist rows) live inside a child's list-valued field
//! and are lifted into [`Entity`] values on demand.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Ordered field map of an entity
pub type Fields = IndexMap<String, Value>;

/// Anything with a stable identity used for matching across versions
pub trait Identified {
    /// Identity type
    type Id: PartialEq + Debug;

    /// Stable identity
    fn id(&self) -> &Self::Id;
}

/// Identified entity with scalar fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable, human-meaningful key
    pub identifier: String,

    /// Mutable fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity {
    /// Create entity without fields
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            fields: Fields::new(),
        }
    }

    /// Set a field, returning the entity
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Field value
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Fields as a JSON object (identifier excluded)
    #[must_use]
    pub fn fields_value(&self) -> Value {
        fields_to_value(&self.fields)
    }

    /// Lift a JSON array of objects into entities
    ///
    /// Each element must be an object carrying `id_field` as a string or
    /// number. Returns `None` if the value is not such an array.
    #[must_use]
    pub fn list_from_value(value: &Value, id_field: &str) -> Option<Vec<Self>> {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => return Some(Vec::new()),
            _ => return None,
        };

        items
            .iter()
            .map(|item| {
                let object = item.as_object()?;
                let identifier = match object.get(id_field)? {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                let fields = object
                    .iter()
                    .filter(|(key, _)| key.as_str() != id_field)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                Some(Self { identifier, fields })
            })
            .collect()
    }
}

impl Identified for Entity {
    type Id = String;

    fn id(&self) -> &String {
        &self.identifier
    }
}

/// Convert a field map into a JSON object
#[must_use]
pub fn fields_to_value(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Map<String, Value>>(),
    )
}

/// Check if a value is a scalar (not an array or object)
#[inline]
#[must_use]
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// A child entity together with the container that owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    /// Identifier of the owning container
    pub container_identifier: String,

    /// The child itself
    pub entity: Entity,
}

impl ChildRecord {
    /// Create child record
    #[inline]
    #[must_use]
    pub fn new(container_identifier: impl Into<String>, entity: Entity) -> Self {
        Self {
            container_identifier: container_identifier.into(),
            entity,
        }
    }
}

/// Current entity state a suggestion batch is evaluated against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Containers
    #[serde(default)]
    pub containers: Vec<Entity>,

    /// Children of all containers
    #[serde(default)]
    pub children: Vec<ChildRecord>,
}

impl Snapshot {
    /// Create empty snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container
    #[must_use]
    pub fn with_container(mut self, container: Entity) -> Self {
        self.containers.push(container);
        self
    }

    /// Add a child owned by `container_identifier`
    #[must_use]
    pub fn with_child(mut self, container_identifier: impl Into<String>, child: Entity) -> Self {
        self.children.push(ChildRecord::new(container_identifier, child));
        self
    }

    /// Find container by identifier
    #[must_use]
    pub fn container(&self, identifier: &str) -> Option<&Entity> {
        self.containers.iter().find(|c| c.identifier == identifier)
    }

    /// Find child by identifier
    #[must_use]
    pub fn child(&self, identifier: &str) -> Option<&ChildRecord> {
        self.children.iter().find(|c| c.entity.identifier == identifier)
    }

    /// Children owned by a container, in snapshot order
    pub fn children_of<'a>(
        &'a self,
        container_identifier: &'a str,
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.children
            .iter()
            .filter(move |c| c.container_identifier == container_identifier)
            .map(|c| &c.entity)
    }
}
