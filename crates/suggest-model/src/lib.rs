//! Suggestion Model
//!
//! Path-addressed suggestions over a three-level entity hierarchy.
//!
//! # Core Concepts
//!
//! - [`PathGrammar`]: Collection tokens and path parsing
//! - [`SuggestionPath`]: Parsed address of a container, field or child
//! - [`Suggestion`]: Entity- or field-level CREATE/UPDATE/DELETE proposal
//! - [`Entity`] / [`Snapshot`]: Current state suggestions are evaluated against
//! - [`Operation`]: CRUD operation keyed by stable identifier
//! - [`ProposalBatch`]: Raw output of the suggestion source
//!
//! # Example
//!
//! ```rust
//! use suggest_model::{PathGrammar, PathTarget};
//!
//! let grammar = PathGrammar::default();
//! let path = grammar.parse("initiative.I-1.tasks.T-7.title").unwrap();
//! assert_eq!(path.container_id(), "I-1");
//! assert_eq!(path.child_suffix().as_deref(), Some("T-7.title"));
//! assert!(matches!(path.target(), PathTarget::Child { .. }));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod entity;
mod operation;
mod path;
mod proposal;
mod suggestion;

// Re-exports
pub use entity::{fields_to_value, is_scalar, ChildRecord, Entity, Fields, Identified, Snapshot};
pub use operation::Operation;
pub use path::{
    is_at_or_under, remainder_under, PathError, PathGrammar, PathTarget, SuggestionPath,
    PATH_SEPARATOR,
};
pub use proposal::{ChildProposal, ContainerProposal, ProposalBatch};
pub use suggestion::{Action, EntitySuggestion, FieldSuggestion, Suggestion, SuggestionKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
