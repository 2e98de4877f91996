//! Unified suggestion normalizer
//!
//! Proposals reach the engine from two directions: grouped under a container
//! (with inline child operations), or as standalone child proposals that do
//! not name their container. [`Normalizer`] folds both into one flat list of
//! path-addressed [`Suggestion`]s per container.
//!
//! # Algorithm
//!
//! 1. Merge explicit container proposals by identifier
//! 2. Resolve each standalone child proposal to its container
//! 3. Wrap resolved children in the explicit proposal for that container, or
//!    synthesize one (UPDATE if the container exists, CREATE with placeholder
//!    text if not)
//! 4. Expand every container proposal into entity and field suggestions

use crate::config::{EngineConfig, PlaceholderConfig, UnresolvedChildPolicy};
use crate::error::NormalizeError;
use indexmap::IndexMap;
use serde_json::Value;
use suggest_model::{
    fields_to_value, is_scalar, Action, ChildProposal, ContainerProposal, Entity, Fields,
    Operation, PathGrammar, ProposalBatch, Snapshot, Suggestion, PATH_SEPARATOR,
};
use uuid::Uuid;

/// Prefix of identifiers generated for creates that arrive without one
pub const SYNTHETIC_ID_PREFIX: &str = "new-";

/// Proposal left out of the normalized output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// Container or child identifier as proposed
    pub identifier: String,

    /// Proposed action
    pub action: Action,

    /// Why the proposal could not be placed
    pub reason: NormalizeError,
}

/// Normalizer output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSuggestions {
    containers: IndexMap<String, Vec<Suggestion>>,
    exclusions: Vec<Exclusion>,
}

impl NormalizedSuggestions {
    /// Suggestions per container identifier
    #[inline]
    #[must_use]
    pub fn containers(&self) -> &IndexMap<String, Vec<Suggestion>> {
        &self.containers
    }

    /// Suggestions addressed to one container
    #[must_use]
    pub fn for_container(&self, identifier: &str) -> &[Suggestion] {
        self.containers
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All suggestions in container order
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.containers.values().flatten().cloned().collect()
    }

    /// Proposals that were left out
    #[inline]
    #[must_use]
    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// Total number of suggestions
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.values().map(Vec::len).sum()
    }

    /// Check if no suggestions were produced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into suggestions and exclusions
    #[must_use]
    pub fn into_parts(self) -> (IndexMap<String, Vec<Suggestion>>, Vec<Exclusion>) {
        (self.containers, self.exclusions)
    }
}

/// Folds a [`ProposalBatch`] into per-container suggestions
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    grammar: PathGrammar,
    policy: UnresolvedChildPolicy,
    placeholder: PlaceholderConfig,
}

impl Normalizer {
    /// Create normalizer
    #[inline]
    #[must_use]
    pub fn new(
        grammar: PathGrammar,
        policy: UnresolvedChildPolicy,
        placeholder: PlaceholderConfig,
    ) -> Self {
        Self {
            grammar,
            policy,
            placeholder,
        }
    }

    /// Create normalizer from engine configuration
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.grammar.clone(),
            config.unresolved_child_policy,
            config.placeholder.clone(),
        )
    }

    /// Normalize a batch against the current snapshot
    ///
    /// # Errors
    /// Under [`UnresolvedChildPolicy::Fail`], returns the first proposal that
    /// cannot be resolved or addressed. Under `Exclude` this never fails.
    pub fn normalize(
        &self,
        snapshot: &Snapshot,
        batch: &ProposalBatch,
    ) -> Result<NormalizedSuggestions, NormalizeError> {
        let mut exclusions = Vec::new();

        let mut admitted = Vec::with_capacity(batch.containers.len());
        for proposal in &batch.containers {
            match check_identifier(&proposal.identifier, proposal.action) {
                Ok(()) => admitted.push(proposal.clone()),
                Err(reason) => {
                    self.exclude(&mut exclusions, &proposal.identifier, proposal.action, reason)?;
                }
            }
        }
        let mut proposals = merge_container_proposals(&admitted, &self.grammar.container);

        let mut resolved: IndexMap<String, Vec<Operation>> = IndexMap::new();
        for child in &batch.children {
            let placed = check_identifier(&child.identifier, child.action)
                .and_then(|()| resolve_container(snapshot, child))
                .and_then(|container| {
                    check_identifier(&container, Action::Update).map(|()| container)
                });
            match placed {
                Ok(container) => resolved
                    .entry(container)
                    .or_default()
                    .push(child.clone().into_operation()),
                Err(reason) => {
                    self.exclude(&mut exclusions, &child.identifier, child.action, reason)?;
                }
            }
        }

        for (container, operations) in resolved {
            let proposal = proposals
                .entry(container.clone())
                .or_insert_with(|| self.synthesize_container(snapshot, &container));
            proposal.children.extend(operations);
        }

        let mut containers = IndexMap::with_capacity(proposals.len());
        for proposal in proposals.into_values() {
            let identifier = proposal.identifier.clone();
            let suggestions = self.expand_container(snapshot, proposal, &mut exclusions)?;
            containers.insert(identifier, suggestions);
        }

        Ok(NormalizedSuggestions {
            containers,
            exclusions,
        })
    }

    /// Record an exclusion, or fail under the strict policy
    fn exclude(
        &self,
        exclusions: &mut Vec<Exclusion>,
        identifier: &str,
        action: Action,
        reason: NormalizeError,
    ) -> Result<(), NormalizeError> {
        if self.policy == UnresolvedChildPolicy::Fail {
            return Err(reason);
        }
        tracing::warn!(
            identifier,
            %action,
            error = %reason,
            "excluding proposal"
        );
        exclusions.push(Exclusion {
            identifier: identifier.to_string(),
            action,
            reason,
        });
        Ok(())
    }

    fn synthesize_container(&self, snapshot: &Snapshot, identifier: &str) -> ContainerProposal {
        if snapshot.container(identifier).is_some() {
            ContainerProposal::new(identifier, Action::Update)
        } else {
            tracing::debug!(container = identifier, "synthesizing placeholder container");
            ContainerProposal::new(identifier, Action::Create)
                .with_field("title", self.placeholder.render_title(identifier))
                .with_field("description", self.placeholder.render_description(identifier))
        }
    }

    fn expand_container(
        &self,
        snapshot: &Snapshot,
        proposal: ContainerProposal,
        exclusions: &mut Vec<Exclusion>,
    ) -> Result<Vec<Suggestion>, NormalizeError> {
        let id = proposal.identifier;
        let path = self.grammar.container_path(&id);
        let current = snapshot.container(&id);
        let mut out = Vec::new();

        match proposal.action {
            Action::Create => {
                out.push(Suggestion::entity(
                    path,
                    Action::Create,
                    None,
                    fields_to_value(&proposal.fields),
                ));
            }
            Action::Update => {
                let before = current.map(|c| &c.fields);
                out.push(Suggestion::entity(
                    path,
                    Action::Update,
                    before.map(fields_to_value),
                    merged_value(before, &proposal.fields),
                ));
                for (name, value) in &proposal.fields {
                    let original = before.and_then(|f| f.get(name));
                    if !is_scalar(value)
                        || original == Some(value)
                        || !self.addressable(name, Some(self.grammar.children.as_str()))
                    {
                        continue;
                    }
                    out.push(Suggestion::field(
                        self.grammar.container_field_path(&id, name),
                        Action::Update,
                        name,
                        original.cloned(),
                        value.clone(),
                    ));
                }
            }
            Action::Delete => {
                out.push(Suggestion::entity(
                    path,
                    Action::Delete,
                    current.map(Entity::fields_value),
                    Value::Null,
                ));
                // Deletion wins over any child work; never fatal
                for operation in proposal.children {
                    let reason = NormalizeError::ContainerDeleted {
                        child: operation.identifier.clone(),
                        container: id.clone(),
                    };
                    tracing::warn!(
                        identifier = %operation.identifier,
                        action = %operation.action,
                        error = %reason,
                        "excluding proposal"
                    );
                    exclusions.push(Exclusion {
                        identifier: operation.identifier,
                        action: operation.action,
                        reason,
                    });
                }
                return Ok(out);
            }
        }

        for (index, operation) in proposal.children.into_iter().enumerate() {
            if let Err(reason) = check_identifier(&operation.identifier, operation.action) {
                self.exclude(exclusions, &operation.identifier, operation.action, reason)?;
                continue;
            }
            let child_id = if operation.identifier.is_empty() {
                synthetic_id(&id, index)
            } else {
                operation.identifier.clone()
            };
            self.expand_child(snapshot, &id, &child_id, operation, &mut out);
        }
        Ok(out)
    }

    fn expand_child(
        &self,
        snapshot: &Snapshot,
        container: &str,
        id: &str,
        operation: Operation,
        out: &mut Vec<Suggestion>,
    ) {
        let path = self.grammar.child_path(container, id);

        match operation.action {
            Action::Create => {
                out.push(Suggestion::entity(
                    path,
                    Action::Create,
                    None,
                    fields_to_value(&operation.fields),
                ));
                for (name, value) in &operation.fields {
                    if self.addressable(name, None) {
                        out.push(Suggestion::field(
                            self.grammar.child_field_path(container, id, name),
                            Action::Create,
                            name,
                            None,
                            value.clone(),
                        ));
                    }
                }
            }
            Action::Update => {
                let before = snapshot.child(id).map(|record| &record.entity.fields);
                out.push(Suggestion::entity(
                    path,
                    Action::Update,
                    before.map(fields_to_value),
                    merged_value(before, &operation.fields),
                ));
                for (name, value) in &operation.fields {
                    let original = before.and_then(|f| f.get(name));
                    if original == Some(value) || !self.addressable(name, None) {
                        continue;
                    }
                    out.push(Suggestion::field(
                        self.grammar.child_field_path(container, id, name),
                        Action::Update,
                        name,
                        original.cloned(),
                        value.clone(),
                    ));
                }
            }
            Action::Delete => {
                let before = snapshot.child(id).map(|record| record.entity.fields_value());
                out.push(Suggestion::entity(path, Action::Delete, before, Value::Null));
            }
        }
    }

    /// Field names that would not parse back as a single field segment
    fn addressable(&self, name: &str, reserved: Option<&str>) -> bool {
        let ok = !name.is_empty() && !name.contains(PATH_SEPARATOR) && reserved != Some(name);
        if !ok {
            tracing::debug!(field = name, "skipping unaddressable field");
        }
        ok
    }
}

/// Identifiers must fit in one path segment; only creates may omit one
fn check_identifier(identifier: &str, action: Action) -> Result<(), NormalizeError> {
    let empty = identifier.is_empty() && action != Action::Create;
    if empty || identifier.contains(PATH_SEPARATOR) {
        return Err(NormalizeError::InvalidIdentifier {
            identifier: identifier.to_string(),
        });
    }
    Ok(())
}

/// Merge duplicate container proposals, keeping first-seen order
///
/// A CREATE followed by an UPDATE stays a CREATE; otherwise the later action
/// wins. Fields and inline children accumulate. Creates without an
/// identifier get one derived from `scope` and their position.
fn merge_container_proposals(
    proposals: &[ContainerProposal],
    scope: &str,
) -> IndexMap<String, ContainerProposal> {
    let mut merged: IndexMap<String, ContainerProposal> = IndexMap::new();
    for (index, proposal) in proposals.iter().enumerate() {
        let mut proposal = proposal.clone();
        if proposal.identifier.is_empty() {
            proposal.identifier = synthetic_id(scope, index);
        }
        match merged.get_mut(&proposal.identifier) {
            Some(existing) => {
                existing.action = match (existing.action, proposal.action) {
                    (Action::Create, Action::Update) => Action::Create,
                    (_, incoming) => incoming,
                };
                existing.fields.extend(proposal.fields);
                existing.children.extend(proposal.children);
            }
            None => {
                merged.insert(proposal.identifier.clone(), proposal);
            }
        }
    }
    merged
}

fn resolve_container(snapshot: &Snapshot, child: &ChildProposal) -> Result<String, NormalizeError> {
    match child.action {
        Action::Create => {
            let container = child
                .container_identifier
                .as_deref()
                .filter(|c| !c.is_empty())
                .ok_or_else(|| NormalizeError::MissingContainerIdentifier {
                    child: child.identifier.clone(),
                })?;
            if snapshot.container(container).is_none() {
                return Err(NormalizeError::UnknownContainer {
                    child: child.identifier.clone(),
                    container: container.to_string(),
                });
            }
            Ok(container.to_string())
        }
        Action::Update | Action::Delete => snapshot
            .child(&child.identifier)
            .map(|record| record.container_identifier.clone())
            .ok_or_else(|| NormalizeError::UnknownChild {
                child: child.identifier.clone(),
            }),
    }
}

fn merged_value(before: Option<&Fields>, changes: &Fields) -> Value {
    let mut merged = before.cloned().unwrap_or_default();
    merged.extend(changes.iter().map(|(k, v)| (k.clone(), v.clone())));
    fields_to_value(&merged)
}

/// Stable identifier for the `index`-th unnamed create within `scope`
fn synthetic_id(scope: &str, index: usize) -> String {
    let name = format!("{scope}{PATH_SEPARATOR}{index}");
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());
    format!("{SYNTHETIC_ID_PREFIX}{}", uuid.simple())
}
