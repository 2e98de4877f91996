//! Engine configuration
//!
//! [`EngineConfig`] carries the path grammar, the policy for child proposals
//! that cannot be resolved, placeholder text for synthesized containers, and
//! field and list diff limits. It can be built in code or loaded from TOML.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use suggest_diff::{FieldDiffConfig, ListDiffConfig};
use suggest_model::PathGrammar;

/// What to do with a proposal that cannot be resolved or addressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedChildPolicy {
    /// Drop the proposal and record an exclusion
    #[default]
    Exclude,

    /// Abort normalization with the first exclusion reason
    Fail,
}

/// Placeholder text for containers synthesized around orphaned children
///
/// `{identifier}` is replaced with the container identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Title template
    pub title: String,

    /// Description template
    pub description: String,
}

impl PlaceholderConfig {
    /// Render the title for a container
    #[must_use]
    pub fn render_title(&self, identifier: &str) -> String {
        self.title.replace("{identifier}", identifier)
    }

    /// Render the description for a container
    #[must_use]
    pub fn render_description(&self, identifier: &str) -> String {
        self.description.replace("{identifier}", identifier)
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            title: "Untitled initiative {identifier}".to_string(),
            description: "Created to hold suggested tasks.".to_string(),
        }
    }
}

/// Suggestion engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path collection tokens
    pub grammar: PathGrammar,

    /// Handling of unresolvable child proposals
    pub unresolved_child_policy: UnresolvedChildPolicy,

    /// Synthesized container text
    pub placeholder: PlaceholderConfig,

    /// Field diff limits
    pub field_diff: FieldDiffConfig,

    /// List alignment limits
    pub list_diff: ListDiffConfig,

    /// Key holding leaf-list item identity inside list-valued fields
    pub leaf_id_field: String,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With path grammar
    #[inline]
    #[must_use]
    pub fn with_grammar(mut self, grammar: PathGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// With unresolved child policy
    #[inline]
    #[must_use]
    pub fn with_unresolved_child_policy(mut self, policy: UnresolvedChildPolicy) -> Self {
        self.unresolved_child_policy = policy;
        self
    }

    /// With placeholder text
    #[inline]
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: PlaceholderConfig) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// With field diff limits
    #[inline]
    #[must_use]
    pub fn with_field_diff(mut self, field_diff: FieldDiffConfig) -> Self {
        self.field_diff = field_diff;
        self
    }

    /// With list alignment limits
    #[inline]
    #[must_use]
    pub fn with_list_diff(mut self, list_diff: ListDiffConfig) -> Self {
        self.list_diff = list_diff;
        self
    }

    /// Parse and validate configuration from TOML
    ///
    /// Missing keys fall back to defaults.
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or the result is invalid
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check configuration consistency
    ///
    /// # Errors
    /// Returns error if grammar tokens are unusable or the leaf id field is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grammar.validate()?;
        if self.leaf_id_field.is_empty() {
            return Err(ConfigError::EmptyLeafIdField);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grammar: PathGrammar::default(),
            unresolved_child_policy: UnresolvedChildPolicy::default(),
            placeholder: PlaceholderConfig::default(),
            field_diff: FieldDiffConfig::default(),
            list_diff: ListDiffConfig::default(),
            leaf_id_field: "id".to_string(),
        }
    }
}
