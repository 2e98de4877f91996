//! Testing utilities for the suggestion workspace
//!
//! Shared fixtures and tracing setup.

#![allow(missing_docs)]

use serde_json::{json, Value};
use suggest_model::{Action, Entity, PathGrammar, Snapshot, Suggestion};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber filtered by `RUST_LOG`; repeated calls are
/// harmless
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn task(id: &str, title: &str) -> Entity {
    Entity::new(id)
        .with_field("title", title)
        .with_field("done", false)
}

pub fn checklist_item(id: &str, text: &str) -> Value {
    json!({"id": id, "text": text, "done": false})
}

/// Two containers, three tasks, one task carrying a checklist
pub fn sample_snapshot() -> Snapshot {
    Snapshot::new()
        .with_container(
            Entity::new("I-1")
                .with_field("title", "Launch beta")
                .with_field("status", "open"),
        )
        .with_container(Entity::new("I-2").with_field("title", "Hiring"))
        .with_child(
            "I-1",
            task("T-1", "Write docs").with_field(
                "checklist",
                json!([checklist_item("c1", "Outline"), checklist_item("c2", "Draft")]),
            ),
        )
        .with_child("I-1", task("T-2", "Record demo"))
        .with_child("I-2", task("T-3", "Post role"))
}

pub fn entity_suggestion(path: &str, action: Action) -> Suggestion {
    Suggestion::entity(path, action, None, json!({}))
}

pub fn field_suggestion(path: &str, field: &str, value: impl Into<Value>) -> Suggestion {
    Suggestion::field(path, Action::Update, field, None, value.into())
}

/// One entity, one field and one child suggestion per container
pub fn suggestions_for(grammar: &PathGrammar, containers: &[&str]) -> Vec<Suggestion> {
    containers
        .iter()
        .flat_map(|id| {
            [
                entity_suggestion(&grammar.container_path(id), Action::Update),
                field_suggestion(&grammar.container_field_path(id, "title"), "title", "x"),
                entity_suggestion(&grammar.child_path(id, "T-1"), Action::Create),
            ]
        })
        .collect()
}
