//! Suggestion Engine
//!
//! Turns raw proposal batches into reviewable, per-container suggestion trees
//! and folds accepted decisions back into entity collections.
//!
//! # Core Concepts
//!
//! - [`Normalizer`]: Folds container and standalone child proposals into
//!   path-addressed suggestions
//! - [`SuggestionGrouper`]: Partitions suggestions into one [`SuggestionGroup`]
//!   per container
//! - [`MergeApplier`]: Applies CRUD operations by identifier, last write wins
//! - [`ResolutionLedger`]: Pending/accepted/rejected state per path
//! - [`SuggestionEngine`]: Facade wiring the above under one [`EngineConfig`]
//!
//! # Example
//!
//! ```rust
//! use suggest_engine::{accepted_child_operations, ResolutionLedger, SuggestionEngine};
//! use suggest_model::{Action, ChildProposal, Entity, ProposalBatch, Snapshot};
//!
//! let snapshot = Snapshot::new()
//!     .with_container(Entity::new("I-1").with_field("title", "Launch"))
//!     .with_child("I-1", Entity::new("T-1").with_field("title", "Draft"));
//! let batch = ProposalBatch::new()
//!     .with_child(ChildProposal::new("T-1", Action::Update).with_field("title", "Final"));
//!
//! let engine = SuggestionEngine::default();
//! let review = engine.review(&snapshot, &batch).unwrap();
//! let group = review.groups().get("I-1").unwrap();
//!
//! let mut ledger = ResolutionLedger::new();
//! ledger.accept("initiative.I-1.tasks.T-1.title");
//!
//! let children: Vec<Entity> = snapshot.children_of("I-1").cloned().collect();
//! let merged = engine.apply(&children, &accepted_child_operations(group, &ledger));
//! assert_eq!(merged[0].field("title"), Some(&serde_json::json!("Final")));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod acceptance;
mod config;
mod engine;
mod error;
mod grouper;
mod merge;
mod normalizer;
mod resolution;

// Re-exports
pub use acceptance::{accepted_child_operations, accepted_container_operation};
pub use config::{EngineConfig, PlaceholderConfig, UnresolvedChildPolicy};
pub use engine::{FieldReview, Review, SuggestionEngine};
pub use error::{ConfigError, EngineError, NormalizeError, TransitionError};
pub use grouper::{
    DiscardReason, Discarded, SuggestionGroup, SuggestionGrouper, SuggestionGroups,
};
pub use merge::{apply, MergeApplier};
pub use normalizer::{Exclusion, NormalizedSuggestions, Normalizer, SYNTHETIC_ID_PREFIX};
pub use resolution::{
    allowed_transitions, next_state, validate_transition, BatchId, Decision, ResolutionLedger,
    ResolutionState, TransitionOutcome,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
