//! Merge applier
//!
//! Folds an ordered list of [`Operation`]s into a collection of entities keyed
//! by identifier.
//!
//! # Semantics
//!
//! - CREATE and UPDATE merge fields into the entry; UPDATE on a missing
//!   identifier creates it
//! - DELETE removes the entry
//! - Later operations win for overlapping keys, earlier keys are kept
//! - Untouched entries keep their relative order, new entries are appended
//!   in operation order

use indexmap::IndexMap;
use suggest_model::{Action, Entity, Operation};

/// Applies operations to an entity collection
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeApplier;

impl MergeApplier {
    /// Create merge applier
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Apply `operations` in order to `original`, returning the new collection
    ///
    /// `original` is never mutated.
    #[must_use]
    pub fn apply(&self, original: &[Entity], operations: &[Operation]) -> Vec<Entity> {
        let mut entries: IndexMap<String, Entity> = original
            .iter()
            .map(|entity| (entity.identifier.clone(), entity.clone()))
            .collect();

        for op in operations {
            match op.action {
                Action::Create | Action::Update => {
                    let entry = entries
                        .entry(op.identifier.clone())
                        .or_insert_with(|| Entity::new(op.identifier.clone()));
                    entry
                        .fields
                        .extend(op.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Action::Delete => {
                    entries.shift_remove(&op.identifier);
                }
            }
        }

        tracing::debug!(
            original = original.len(),
            operations = operations.len(),
            result = entries.len(),
            "merge applied"
        );
        entries.into_values().collect()
    }
}

/// Apply operations with a default [`MergeApplier`]
#[must_use]
pub fn apply(original: &[Entity], operations: &[Operation]) -> Vec<Entity> {
    MergeApplier::new().apply(original, operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entity(id: &str, title: &str) -> Entity {
        Entity::new(id).with_field("title", title)
    }

    #[test]
    fn empty_operations_is_identity() {
        let original = vec![entity("a", "A"), entity("b", "B")];
        assert_eq!(apply(&original, &[]), original);
    }

    #[test]
    fn update_merges_fields() {
        let original = vec![entity("a", "A").with_field("done", false)];
        let ops = vec![Operation::update("a").with_field("done", true)];
        let result = apply(&original, &ops);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].field("title"), Some(&json!("A")));
        assert_eq!(result[0].field("done"), Some(&json!(true)));
        assert_eq!(original[0].field("done"), Some(&json!(false)));
    }

    #[test]
    fn update_on_missing_creates() {
        let ops = vec![Operation::update("z").with_field("title", "Z")];
        let result = apply(&[], &ops);
        assert_eq!(result, vec![entity("z", "Z")]);
    }

    #[test]
    fn update_then_delete_removes() {
        let original = vec![entity("a", "A"), entity("b", "B")];
        let ops = vec![
            Operation::update("a").with_field("title", "A2"),
            Operation::delete("a"),
        ];
        let result = apply(&original, &ops);
        assert_eq!(result, vec![entity("b", "B")]);
    }

    #[test]
    fn last_write_wins_accumulatively() {
        let ops = vec![
            Operation::create("n").with_field("title", "first").with_field("owner", "x"),
            Operation::update("n").with_field("title", "second"),
        ];
        let result = apply(&[], &ops);
        assert_eq!(result[0].field("title"), Some(&json!("second")));
        assert_eq!(result[0].field("owner"), Some(&json!("x")));
    }

    #[test]
    fn order_is_preserved_and_creates_appended() {
        let original = vec![entity("a", "A"), entity("b", "B"), entity("c", "C")];
        let ops = vec![
            Operation::create("d").with_field("title", "D"),
            Operation::update("b").with_field("title", "B2"),
            Operation::delete("a"),
            Operation::create("e"),
        ];
        let ids: Vec<_> = apply(&original, &ops)
            .into_iter()
            .map(|e| e.identifier)
            .collect();
        assert_eq!(ids, vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn delete_missing_is_noop() {
        let original = vec![entity("a", "A")];
        assert_eq!(apply(&original, &[Operation::delete("zz")]), original);
    }
}
