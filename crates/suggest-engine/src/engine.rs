//! Suggestion engine facade
//!
//! Wires the normalizer, grouper and differs together under one
//! [`EngineConfig`].

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grouper::{Discarded, SuggestionGrouper, SuggestionGroups};
use crate::merge::MergeApplier;
use crate::normalizer::{Exclusion, Normalizer};
use serde::Serialize;
use serde_json::Value;
use suggest_diff::{align_lists_with, FieldDiff, FieldDiffer, ListAlignment};
use suggest_model::{Entity, Operation, ProposalBatch, Snapshot, Suggestion};

/// Display plan for one suggestion's value change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "diff", rename_all = "lowercase")]
pub enum FieldReview {
    /// Word-level diff of a scalar value
    Text(FieldDiff),

    /// Alignment of a list of identity-bearing items
    List(ListAlignment<Entity>),
}

/// Everything a caller needs to render one suggestion batch
#[derive(Debug, Clone, Default)]
pub struct Review {
    groups: SuggestionGroups,
    suggestions: Vec<Suggestion>,
    exclusions: Vec<Exclusion>,
    discarded: Vec<Discarded>,
}

impl Review {
    /// Suggestion groups by container
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &SuggestionGroups {
        &self.groups
    }

    /// Normalized suggestions, flat
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Child proposals excluded during normalization
    #[inline]
    #[must_use]
    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// Suggestions dropped by the grouper
    #[inline]
    #[must_use]
    pub fn discarded(&self) -> &[Discarded] {
        &self.discarded
    }
}

/// Suggestion resolution and diff engine
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    config: EngineConfig,
    normalizer: Normalizer,
    grouper: SuggestionGrouper,
    differ: FieldDiffer,
    merger: MergeApplier,
}

impl SuggestionEngine {
    /// Create engine with validated configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            normalizer: Normalizer::from_config(&config),
            grouper: SuggestionGrouper::new(config.grammar.clone()),
            differ: FieldDiffer::new(config.field_diff),
            merger: MergeApplier::new(),
            config,
        }
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Grouper using the configured grammar
    #[inline]
    #[must_use]
    pub fn grouper(&self) -> &SuggestionGrouper {
        &self.grouper
    }

    /// Normalize a batch and group the result
    ///
    /// # Errors
    /// Returns error only under the `fail` unresolved-child policy
    pub fn review(
        &self,
        snapshot: &Snapshot,
        batch: &ProposalBatch,
    ) -> Result<Review, EngineError> {
        let normalized = self.normalizer.normalize(snapshot, batch)?;
        let suggestions = normalized.suggestions();
        let (_, exclusions) = normalized.into_parts();
        let (groups, discarded) = self.grouper.group_with_discards(&suggestions);

        tracing::info!(
            containers = groups.len(),
            suggestions = suggestions.len(),
            exclusions = exclusions.len(),
            discarded = discarded.len(),
            "suggestion batch reviewed"
        );

        Ok(Review {
            groups,
            suggestions,
            exclusions,
            discarded,
        })
    }

    /// Group already-normalized suggestions
    #[must_use]
    pub fn group(&self, suggestions: &[Suggestion]) -> SuggestionGroups {
        self.grouper.group(suggestions)
    }

    /// Display plan for a suggestion's value change
    ///
    /// Arrays whose items carry the configured leaf id field are aligned as
    /// lists; everything else goes through the text differ.
    #[must_use]
    pub fn diff_field(&self, suggestion: &Suggestion) -> FieldReview {
        let original = suggestion.original_value();
        let suggested = suggestion.suggested_value();

        if let Some((before, after)) = self.as_lists(original, suggested) {
            return FieldReview::List(self.align_list(&before, &after));
        }
        FieldReview::Text(self.differ.diff_values(original, Some(suggested)))
    }

    /// Align two identity-bearing lists within the configured limits
    #[must_use]
    pub fn align_list(&self, original: &[Entity], changed: &[Entity]) -> ListAlignment<Entity> {
        align_lists_with(original, changed, &self.config.list_diff)
    }

    /// Apply operations to a collection
    #[must_use]
    pub fn apply(&self, original: &[Entity], operations: &[Operation]) -> Vec<Entity> {
        self.merger.apply(original, operations)
    }

    fn as_lists(
        &self,
        original: Option<&Value>,
        suggested: &Value,
    ) -> Option<(Vec<Entity>, Vec<Entity>)> {
        let is_list = |v: &Value| v.is_array();
        if !is_list(suggested) && !original.is_some_and(is_list) {
            return None;
        }
        let id_field = &self.config.leaf_id_field;
        let before = Entity::list_from_value(original.unwrap_or(&Value::Null), id_field)?;
        let after = Entity::list_from_value(suggested, id_field)?;
        Some((before, after))
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
