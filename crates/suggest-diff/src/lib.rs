//! Suggestion Diffing
//!
//! Human-reviewable diffs for suggestion review.
//!
//! # Core Concepts
//!
//! - [`align_lists`]: LCS alignment of identity-bearing lists into [`DiffRegion`]s
//! - [`FieldDiffer`]: Word-level text patches for scalar fields
//! - [`longest_common_subsequence`]: Shared O(n·m) LCS table
//!
//! # Example
//!
//! ```rust
//! use suggest_diff::{align_lists, DiffRegion};
//! use suggest_model::Entity;
//!
//! let original = vec![Entity::new("1").with_field("title", "x")];
//! let changed = vec![
//!     Entity::new("1").with_field("title", "x2"),
//!     Entity::new("2").with_field("title", "y"),
//! ];
//!
//! let alignment = align_lists(&original, &changed);
//! assert!(matches!(alignment.regions()[0], DiffRegion::Modified { .. }));
//! assert_eq!(alignment.counts().added, 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod align;
mod field;
mod lcs;

// Re-exports
pub use align::{
    align_lists, align_lists_with, DiffRegion, ListAlignment, ListDiffConfig, RegionCounts,
};
pub use field::{
    ChunkKind, DiffUnavailable, FieldDiff, FieldDiffConfig, FieldDiffer, TextChunk, TextPatch,
};
pub use lcs::{longest_common_subsequence, table_cells};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
