//! Suggestion grouping
//!
//! Partitions a flat list of path-addressed suggestions into one
//! [`SuggestionGroup`] per container identifier. Malformed suggestions are
//! discarded, never raised.

use indexmap::IndexMap;
use serde::Serialize;
use suggest_model::{
    is_at_or_under, remainder_under, EntitySuggestion, PathError, PathGrammar, PathTarget,
    Suggestion, PATH_SEPARATOR,
};

/// Suggestions addressed to one container
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionGroup {
    identifier: String,
    entity_suggestion: Option<Suggestion>,
    field_suggestions: IndexMap<String, Suggestion>,
    child_suggestions: IndexMap<String, Suggestion>,
}

impl SuggestionGroup {
    /// Create empty group
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Container identifier
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Suggestion at exactly the container path
    #[inline]
    #[must_use]
    pub fn entity_suggestion(&self) -> Option<&Suggestion> {
        self.entity_suggestion.as_ref()
    }

    /// Container field suggestions by field name
    #[inline]
    #[must_use]
    pub fn field_suggestions(&self) -> &IndexMap<String, Suggestion> {
        &self.field_suggestions
    }

    /// Child suggestions keyed by remainder under the child collection
    #[inline]
    #[must_use]
    pub fn child_suggestions(&self) -> &IndexMap<String, Suggestion> {
        &self.child_suggestions
    }

    /// Entity-level suggestion for one child
    #[must_use]
    pub fn child_entity_suggestion(&self, child_id: &str) -> Option<&Suggestion> {
        self.child_suggestions.get(child_id)
    }

    /// Field suggestions of one child, by field name
    pub fn child_field_suggestions<'a>(
        &'a self,
        child_id: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Suggestion)> + 'a {
        self.child_suggestions.iter().filter_map(move |(suffix, s)| {
            let field = remainder_under(suffix, child_id)?;
            (!field.contains(PATH_SEPARATOR)).then_some((field, s))
        })
    }

    /// Distinct child identifiers in first-seen order
    #[must_use]
    pub fn child_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for suffix in self.child_suggestions.keys() {
            let id = suffix.split(PATH_SEPARATOR).next().unwrap_or(suffix.as_str());
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Total suggestions in the group
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.entity_suggestion.is_some())
            + self.field_suggestions.len()
            + self.child_suggestions.len()
    }

    /// Check if the group holds no suggestions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups keyed by container identifier, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SuggestionGroups {
    groups: IndexMap<String, SuggestionGroup>,
}

impl SuggestionGroups {
    /// Group for a container
    #[inline]
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&SuggestionGroup> {
        self.groups.get(identifier)
    }

    /// Iterate groups in order
    pub fn iter(&self) -> impl Iterator<Item = &SuggestionGroup> {
        self.groups.values()
    }

    /// Container identifiers in order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume into the underlying map
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, SuggestionGroup> {
        self.groups
    }
}

/// Why a suggestion was left out of every group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// Path failed to parse
    InvalidPath(PathError),

    /// Field path without a usable field name
    MissingFieldName,

    /// Field name disagrees with the field segment of the path
    FieldNameMismatch {
        /// Field named by the path
        path_field: String,
        /// Field named by the suggestion
        field_name: String,
    },

    /// Field-typed suggestion at an entity path
    NotEntityTyped,
}

/// Suggestion that did not fit any slot
#[derive(Debug, Clone, PartialEq)]
pub struct Discarded {
    /// Path as given
    pub path: String,

    /// Reason it was left out
    pub reason: DiscardReason,
}

/// Builds [`SuggestionGroups`] and answers path queries over raw suggestions
#[derive(Debug, Clone, Default)]
pub struct SuggestionGrouper {
    grammar: PathGrammar,
}

impl SuggestionGrouper {
    /// Create grouper for a grammar
    #[inline]
    #[must_use]
    pub fn new(grammar: PathGrammar) -> Self {
        Self { grammar }
    }

    /// Path grammar in use
    #[inline]
    #[must_use]
    pub fn grammar(&self) -> &PathGrammar {
        &self.grammar
    }

    /// Group suggestions by container
    ///
    /// Later suggestions for the same slot replace earlier ones.
    #[must_use]
    pub fn group(&self, suggestions: &[Suggestion]) -> SuggestionGroups {
        self.group_with_discards(suggestions).0
    }

    /// Group suggestions, also reporting what was discarded
    #[must_use]
    pub fn group_with_discards(
        &self,
        suggestions: &[Suggestion],
    ) -> (SuggestionGroups, Vec<Discarded>) {
        let mut groups: IndexMap<String, SuggestionGroup> = IndexMap::new();
        let mut discarded = Vec::new();

        for suggestion in suggestions {
            let path = match self.grammar.parse(suggestion.path()) {
                Ok(path) => path,
                Err(err) => {
                    tracing::debug!(path = suggestion.path(), error = %err, "discarding suggestion");
                    discarded.push(Discarded {
                        path: suggestion.path().to_string(),
                        reason: DiscardReason::InvalidPath(err),
                    });
                    continue;
                }
            };

            let slot = match path.target() {
                PathTarget::Container if suggestion.as_entity().is_none() => {
                    Err(DiscardReason::NotEntityTyped)
                }
                PathTarget::Container => Ok(Slot::Entity),
                PathTarget::Field(field) => match suggestion.field_name() {
                    None => Err(DiscardReason::MissingFieldName),
                    Some(name) if name != field => Err(DiscardReason::FieldNameMismatch {
                        path_field: field.clone(),
                        field_name: name.to_string(),
                    }),
                    Some(_) => Ok(Slot::Field(field.clone())),
                },
                PathTarget::Child { .. } => path
                    .child_suffix()
                    .map(Slot::Child)
                    .ok_or(DiscardReason::MissingFieldName),
            };

            let slot = match slot {
                Ok(slot) => slot,
                Err(reason) => {
                    tracing::debug!(path = suggestion.path(), ?reason, "discarding suggestion");
                    discarded.push(Discarded {
                        path: suggestion.path().to_string(),
                        reason,
                    });
                    continue;
                }
            };

            let group = groups
                .entry(path.container_id().to_string())
                .or_insert_with(|| SuggestionGroup::new(path.container_id()));
            match slot {
                Slot::Entity => group.entity_suggestion = Some(suggestion.clone()),
                Slot::Field(name) => {
                    group.field_suggestions.insert(name, suggestion.clone());
                }
                Slot::Child(suffix) => {
                    group.child_suggestions.insert(suffix, suggestion.clone());
                }
            }
        }

        (SuggestionGroups { groups }, discarded)
    }

    /// Last suggestion at exactly `base_path`, if it is entity-typed
    #[must_use]
    pub fn select_entity_suggestion_for_base_path<'a>(
        &self,
        suggestions: &'a [Suggestion],
        base_path: &str,
    ) -> Option<&'a EntitySuggestion> {
        suggestions
            .iter()
            .rev()
            .find(|s| s.path() == base_path)
            .and_then(Suggestion::as_entity)
    }

    /// Check for suggestions strictly below `base_path` that cross a
    /// child or leaf collection
    #[must_use]
    pub fn has_child_suggestions_under_path(
        &self,
        suggestions: &[Suggestion],
        base_path: &str,
    ) -> bool {
        suggestions.iter().any(|s| {
            remainder_under(s.path(), base_path).is_some_and(|rest| {
                rest.split(PATH_SEPARATOR)
                    .any(|segment| self.grammar.is_collection_token(segment))
            })
        })
    }

    /// Check for suggestions at or strictly below `base_path`
    #[must_use]
    pub fn has_any_suggestions_under_path(
        &self,
        suggestions: &[Suggestion],
        base_path: &str,
    ) -> bool {
        suggestions.iter().any(|s| is_at_or_under(s.path(), base_path))
    }
}

enum Slot {
    Entity,
    Field(String),
    Child(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use suggest_model::Action;

    fn entity(path: &str) -> Suggestion {
        Suggestion::entity(path, Action::Update, None, json!({}))
    }

    fn field(path: &str, name: &str) -> Suggestion {
        Suggestion::field(path, Action::Update, name, None, json!("v"))
    }

    fn grouper() -> SuggestionGrouper {
        SuggestionGrouper::default()
    }

    #[test]
    fn routes_into_slots() {
        let suggestions = vec![
            entity("initiative.I-1"),
            field("initiative.I-1.title", "title"),
            entity("initiative.I-1.tasks.T-1"),
            field("initiative.I-1.tasks.T-1.title", "title"),
            entity("initiative.I-1.tasks.T-1.checklist.C-1"),
        ];
        let groups = grouper().group(&suggestions);
        let group = groups.get("I-1").unwrap();

        assert!(group.entity_suggestion().is_some());
        assert!(group.field_suggestions().contains_key("title"));
        let keys: Vec<_> = group.child_suggestions().keys().cloned().collect();
        assert_eq!(keys, vec!["T-1", "T-1.title", "T-1.checklist.C-1"]);
        assert_eq!(group.len(), 5);
    }

    #[test]
    fn child_only_container_gets_initialized_group() {
        let groups = grouper().group(&[entity("initiative.I-2.tasks.T-9")]);
        let group = groups.get("I-2").unwrap();
        assert!(group.entity_suggestion().is_none());
        assert!(group.field_suggestions().is_empty());
        assert_eq!(group.child_suggestions().len(), 1);
    }

    #[test]
    fn invalid_paths_yield_no_groups() {
        for raw in ["initiative", "initiative.", "initiative..x", "", "tasks.T-1"] {
            let (groups, discarded) = grouper().group_with_discards(&[entity(raw)]);
            assert!(groups.is_empty(), "{raw} produced a group");
            assert_eq!(discarded.len(), 1);
        }
    }

    #[test]
    fn field_without_name_is_discarded() {
        let nameless = Suggestion::Field(suggest_model::FieldSuggestion {
            path: "initiative.I-1.title".into(),
            action: Action::Update,
            field_name: None,
            original_value: None,
            suggested_value: Value::Null,
        });
        let (groups, discarded) = grouper().group_with_discards(&[nameless]);
        assert!(groups.is_empty());
        assert_eq!(discarded[0].reason, DiscardReason::MissingFieldName);
    }

    #[test]
    fn field_slot_follows_path_segment() {
        let (groups, discarded) = grouper().group_with_discards(&[
            field("initiative.I-1.title", "status"),
            field("initiative.I-1.status", "status"),
            field("initiative.I-1.title", "title"),
        ]);
        let group = groups.get("I-1").unwrap();
        let keys: Vec<_> = group.field_suggestions().keys().cloned().collect();
        assert_eq!(keys, vec!["status", "title"]);
        assert_eq!(
            group.field_suggestions()["title"].path(),
            "initiative.I-1.title"
        );
        assert_eq!(
            group.field_suggestions()["status"].path(),
            "initiative.I-1.status"
        );
        assert_eq!(
            discarded,
            vec![Discarded {
                path: "initiative.I-1.title".into(),
                reason: DiscardReason::FieldNameMismatch {
                    path_field: "title".into(),
                    field_name: "status".into(),
                },
            }]
        );
    }

    #[test]
    fn field_typed_at_entity_path_is_discarded() {
        let (groups, discarded) =
            grouper().group_with_discards(&[field("initiative.I-1", "title")]);
        assert!(groups.is_empty());
        assert_eq!(discarded[0].reason, DiscardReason::NotEntityTyped);
    }

    #[test]
    fn similar_identifiers_stay_apart() {
        let groups = grouper().group(&[
            entity("initiative.X-123"),
            entity("initiative.X-123-OTHER"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups.identifiers().collect::<Vec<_>>(),
            vec!["X-123", "X-123-OTHER"]
        );
    }

    #[test]
    fn child_views() {
        let groups = grouper().group(&[
            entity("initiative.I-1.tasks.T-1"),
            field("initiative.I-1.tasks.T-1.title", "title"),
            field("initiative.I-1.tasks.T-10.title", "title"),
            entity("initiative.I-1.tasks.T-1.checklist.C-1"),
        ]);
        let group = groups.get("I-1").unwrap();

        assert!(group.child_entity_suggestion("T-1").is_some());
        assert!(group.child_entity_suggestion("T-10").is_none());
        let fields: Vec<_> = group.child_field_suggestions("T-1").map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["title"]);
        assert_eq!(group.child_ids(), vec!["T-1", "T-10"]);
    }

    #[test]
    fn select_entity_suggestion() {
        let suggestions = vec![entity("initiative.I-1"), field("initiative.I-2", "title")];
        let g = grouper();
        assert!(g
            .select_entity_suggestion_for_base_path(&suggestions, "initiative.I-1")
            .is_some());
        assert!(g
            .select_entity_suggestion_for_base_path(&suggestions, "initiative.I-2")
            .is_none());
        assert!(g
            .select_entity_suggestion_for_base_path(&suggestions, "initiative.I-3")
            .is_none());
    }

    #[test]
    fn select_entity_suggestion_uses_last_at_path() {
        let g = grouper();
        let shadowed = vec![entity("initiative.I-1"), field("initiative.I-1", "title")];
        assert!(g
            .select_entity_suggestion_for_base_path(&shadowed, "initiative.I-1")
            .is_none());

        let created = Suggestion::entity("initiative.I-1", Action::Create, None, json!({}));
        let replaced = vec![field("initiative.I-1", "title"), entity("initiative.I-1"), created];
        let selected = g
            .select_entity_suggestion_for_base_path(&replaced, "initiative.I-1")
            .unwrap();
        assert_eq!(selected.action, Action::Create);
    }

    #[test]
    fn prefix_queries_are_exact() {
        let g = grouper();
        let other = vec![entity("initiative.X-123-OTHER")];
        assert!(!g.has_any_suggestions_under_path(&other, "initiative.X-123"));

        let exact = vec![entity("initiative.X-123")];
        assert!(g.has_any_suggestions_under_path(&exact, "initiative.X-123"));

        let below = vec![field("initiative.X-123.title", "title")];
        assert!(g.has_any_suggestions_under_path(&below, "initiative.X-123"));
        assert!(!g.has_child_suggestions_under_path(&below, "initiative.X-123"));

        let child = vec![entity("initiative.X-123.tasks.T-1")];
        assert!(g.has_child_suggestions_under_path(&child, "initiative.X-123"));
        assert!(!g.has_child_suggestions_under_path(&child, "initiative.X-12"));

        let leaf = vec![entity("initiative.X-123.tasks.T-1.checklist.C-1")];
        assert!(g.has_child_suggestions_under_path(&leaf, "initiative.X-123.tasks.T-1"));
    }

    #[test]
    fn empty_input() {
        let g = grouper();
        assert!(g.group(&[]).is_empty());
        assert!(!g.has_any_suggestions_under_path(&[], "initiative.I-1"));
    }
}
