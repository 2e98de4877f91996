//! Raw suggestion batches as produced by the suggestion source
//!
//! Proposals arrive from two independent directions: grouped under a
//! container (optionally with inline child operations), or as standalone
//! child proposals that may not know their container.

use crate::entity::Fields;
use crate::operation::Operation;
use crate::suggestion::Action;
use serde::{Deserialize, Serialize};

/// Proposed change to a container, with inline child changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProposal {
    /// Container identifier (synthetic for creates)
    pub identifier: String,

    /// Proposed action
    pub action: Action,

    /// Proposed field values
    #[serde(default)]
    pub fields: Fields,

    /// Inline child operations
    #[serde(default)]
    pub children: Vec<Operation>,
}

impl ContainerProposal {
    /// Create proposal without fields or children
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<String>, action: Action) -> Self {
        Self {
            identifier: identifier.into(),
            action,
            fields: Fields::new(),
            children: Vec::new(),
        }
    }

    /// Set a field, returning the proposal
    #[must_use]
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add an inline child operation
    #[must_use]
    pub fn with_child(mut self, operation: Operation) -> Self {
        self.children.push(operation);
        self
    }
}

/// Standalone proposal for a child entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProposal {
    /// Child identifier (synthetic for creates)
    pub identifier: String,

    /// Proposed action
    pub action: Action,

    /// Intended container; required for creates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_identifier: Option<String>,

    /// Proposed field values
    #[serde(default)]
    pub fields: Fields,
}

impl ChildProposal {
    /// Create proposal without container or fields
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<String>, action: Action) -> Self {
        Self {
            identifier: identifier.into(),
            action,
            container_identifier: None,
            fields: Fields::new(),
        }
    }

    /// Declare the intended container
    #[must_use]
    pub fn in_container(mut self, container_identifier: impl Into<String>) -> Self {
        self.container_identifier = Some(container_identifier.into());
        self
    }

    /// Set a field, returning the proposal
    #[must_use]
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Convert into an inline child operation
    #[must_use]
    pub fn into_operation(self) -> Operation {
        Operation {
            identifier: self.identifier,
            action: self.action,
            fields: self.fields,
        }
    }
}

/// One result from the suggestion source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalBatch {
    /// Container-level proposals
    #[serde(default)]
    pub containers: Vec<ContainerProposal>,

    /// Independent child proposals
    #[serde(default)]
    pub children: Vec<ChildProposal>,
}

impl ProposalBatch {
    /// Create empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container proposal
    #[must_use]
    pub fn with_container(mut self, proposal: ContainerProposal) -> Self {
        self.containers.push(proposal);
        self
    }

    /// Add a child proposal
    #[must_use]
    pub fn with_child(mut self, proposal: ChildProposal) -> Self {
        self.children.push(proposal);
        self
    }

    /// Check if batch proposes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.children.is_empty()
    }
}
