//! Accepted suggestions to merge operations
//!
//! Reads a [`SuggestionGroup`] together with a [`ResolutionLedger`] and emits
//! the [`Operation`]s the merge applier should fold into the current state.
//! Cascading between entity and field decisions is limited to two rules:
//!
//! - An accepted entity CREATE/UPDATE writes its suggested fields, minus any
//!   field whose own suggestion was rejected
//! - Accepted field suggestions of an entity that is itself not accepted
//!   become an UPDATE, unless the entity suggestion is a CREATE

use crate::grouper::SuggestionGroup;
use crate::resolution::{ResolutionLedger, ResolutionState};
use suggest_model::{Action, Operation, Suggestion};

/// Operations for the accepted child suggestions of one group, in child order
#[must_use]
pub fn accepted_child_operations(
    group: &SuggestionGroup,
    ledger: &ResolutionLedger,
) -> Vec<Operation> {
    group
        .child_ids()
        .into_iter()
        .filter_map(|child_id| {
            accepted_operation(
                child_id,
                group.child_entity_suggestion(child_id),
                group.child_field_suggestions(child_id),
                ledger,
            )
        })
        .collect()
}

/// Operation for the accepted container-level suggestions of one group
#[must_use]
pub fn accepted_container_operation(
    group: &SuggestionGroup,
    ledger: &ResolutionLedger,
) -> Option<Operation> {
    accepted_operation(
        group.identifier(),
        group.entity_suggestion(),
        group
            .field_suggestions()
            .iter()
            .map(|(name, s)| (name.as_str(), s)),
        ledger,
    )
}

fn accepted_operation<'a>(
    identifier: &str,
    entity: Option<&Suggestion>,
    fields: impl Iterator<Item = (&'a str, &'a Suggestion)>,
    ledger: &ResolutionLedger,
) -> Option<Operation> {
    let fields: Vec<(&str, &Suggestion)> = fields.collect();
    let state_of = |s: &Suggestion| ledger.state(s.path());

    if let Some(entity) = entity.filter(|s| state_of(*s) == ResolutionState::Accepted) {
        if entity.action() == Action::Delete {
            return Some(Operation::delete(identifier));
        }
        let rejected: Vec<&str> = fields
            .iter()
            .filter(|(_, s)| state_of(*s) == ResolutionState::Rejected)
            .map(|(name, _)| *name)
            .collect();
        let mut op = Operation::new(identifier, entity.action());
        if let Some(object) = entity.suggested_value().as_object() {
            op.fields.extend(
                object
                    .iter()
                    .filter(|(name, _)| !rejected.contains(&name.as_str()))
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
        }
        return Some(op);
    }

    if entity.is_some_and(|s| s.action() == Action::Create) {
        return None;
    }

    let mut op = Operation::update(identifier);
    for (name, suggestion) in fields {
        if state_of(suggestion) == ResolutionState::Accepted {
            op.fields
                .insert(name.to_string(), suggestion.suggested_value().clone());
        }
    }
    (!op.fields.is_empty()).then_some(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::SuggestionGrouper;
    use serde_json::{json, Value};

    fn group(suggestions: &[Suggestion]) -> SuggestionGroup {
        let groups = SuggestionGrouper::default().group(suggestions);
        groups.get("I-1").cloned().unwrap()
    }

    #[test]
    fn accepted_entity_update_drops_rejected_fields() {
        let suggestions = vec![
            Suggestion::entity(
                "initiative.I-1.tasks.T-1",
                Action::Update,
                None,
                json!({"title": "New", "done": true}),
            ),
            Suggestion::field(
                "initiative.I-1.tasks.T-1.done",
                Action::Update,
                "done",
                Some(json!(false)),
                json!(true),
            ),
        ];
        let mut ledger = ResolutionLedger::new();
        ledger.accept("initiative.I-1.tasks.T-1");
        ledger.reject("initiative.I-1.tasks.T-1.done");

        let ops = accepted_child_operations(&group(&suggestions), &ledger);
        assert_eq!(ops, vec![Operation::update("T-1").with_field("title", "New")]);
    }

    #[test]
    fn accepted_fields_without_entity_become_update() {
        let suggestions = vec![
            Suggestion::field(
                "initiative.I-1.tasks.T-1.title",
                Action::Update,
                "title",
                None,
                json!("A"),
            ),
            Suggestion::field(
                "initiative.I-1.tasks.T-1.owner",
                Action::Update,
                "owner",
                None,
                json!("B"),
            ),
        ];
        let mut ledger = ResolutionLedger::new();
        ledger.accept("initiative.I-1.tasks.T-1.title");

        let ops = accepted_child_operations(&group(&suggestions), &ledger);
        assert_eq!(ops, vec![Operation::update("T-1").with_field("title", "A")]);
    }

    #[test]
    fn pending_create_blocks_its_fields() {
        let suggestions = vec![
            Suggestion::entity(
                "initiative.I-1.tasks.T-2",
                Action::Create,
                None,
                json!({"title": "A"}),
            ),
            Suggestion::field(
                "initiative.I-1.tasks.T-2.title",
                Action::Create,
                "title",
                None,
                json!("A"),
            ),
        ];
        let mut ledger = ResolutionLedger::new();
        ledger.accept("initiative.I-1.tasks.T-2.title");
        assert!(accepted_child_operations(&group(&suggestions), &ledger).is_empty());
    }

    #[test]
    fn accepted_delete() {
        let suggestions = vec![Suggestion::entity(
            "initiative.I-1.tasks.T-3",
            Action::Delete,
            Some(json!({})),
            Value::Null,
        )];
        let mut ledger = ResolutionLedger::new();
        ledger.accept("initiative.I-1.tasks.T-3");
        let ops = accepted_child_operations(&group(&suggestions), &ledger);
        assert_eq!(ops, vec![Operation::delete("T-3")]);
    }

    #[test]
    fn container_operation() {
        let suggestions = vec![
            Suggestion::entity("initiative.I-1", Action::Update, None, json!({"title": "T"})),
            Suggestion::field("initiative.I-1.title", Action::Update, "title", None, json!("T")),
        ];
        let g = group(&suggestions);
        let mut ledger = ResolutionLedger::new();
        assert!(accepted_container_operation(&g, &ledger).is_none());

        ledger.accept("initiative.I-1.title");
        assert_eq!(
            accepted_container_operation(&g, &ledger),
            Some(Operation::update("I-1").with_field("title", "T"))
        );
    }
}
