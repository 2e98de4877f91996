//! Per-path resolution state
//!
//! Each suggestion path moves through a small lifecycle:
//!
//! ```text
//! Pending ──accept──▶ Accepted
//!    ▲  └──reject──▶ Rejected
//!    └───rollback─────┘
//! ```
//!
//! The transition functions are pure. [`ResolutionLedger`] is the caller-owned
//! map that records decisions for one suggestion batch.

use crate::error::TransitionError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Resolution state of one suggestion path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionState {
    /// Not yet decided
    #[default]
    Pending,

    /// Accepted by the user
    Accepted,

    /// Rejected by the user
    Rejected,
}

impl ResolutionState {
    /// Check if a decision has been made
    #[inline]
    #[must_use]
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// User decision on a suggestion path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Accept the suggestion
    Accept,

    /// Reject the suggestion
    Reject,

    /// Undo a previous decision
    Rollback,
}

impl Decision {
    /// State this decision moves towards
    #[inline]
    #[must_use]
    pub fn target(&self) -> ResolutionState {
        match self {
            Self::Accept => ResolutionState::Accepted,
            Self::Reject => ResolutionState::Rejected,
            Self::Rollback => ResolutionState::Pending,
        }
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: ResolutionState) -> Vec<ResolutionState> {
    use ResolutionState::{Accepted, Pending, Rejected};
    match from {
        Pending => vec![Accepted, Rejected],
        Accepted | Rejected => vec![Pending],
    }
}

/// Validate a state transition
///
/// # Errors
/// Returns `IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(
    from: ResolutionState,
    to: ResolutionState,
) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::IllegalTransition { from, to })
    }
}

/// State after applying `decision`, or `None` if the decision is not valid
/// from `from`
#[must_use]
pub fn next_state(from: ResolutionState, decision: Decision) -> Option<ResolutionState> {
    let to = decision.target();
    validate_transition(from, to).ok().map(|()| to)
}

/// Result of recording a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// State changed
    Applied {
        /// State before
        from: ResolutionState,
        /// State after
        to: ResolutionState,
    },

    /// Decision was not valid from the current state; nothing changed
    Ignored {
        /// Unchanged state
        state: ResolutionState,
    },
}

impl TransitionOutcome {
    /// Check if the state changed
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// State after the decision
    #[inline]
    #[must_use]
    pub fn state(&self) -> ResolutionState {
        match self {
            Self::Applied { to, .. } => *to,
            Self::Ignored { state } => *state,
        }
    }
}

/// Identifier of one suggestion batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(Uuid);

impl BatchId {
    /// Generate new batch ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for BatchId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decisions recorded for one suggestion batch, keyed by path
#[derive(Debug, Clone, Default)]
pub struct ResolutionLedger {
    batch: BatchId,
    records: IndexMap<String, ResolutionState>,
}

impl ResolutionLedger {
    /// Create ledger for a fresh batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create ledger for a known batch
    #[inline]
    #[must_use]
    pub fn for_batch(batch: BatchId) -> Self {
        Self {
            batch,
            records: IndexMap::new(),
        }
    }

    /// Batch the records belong to
    #[inline]
    #[must_use]
    pub fn batch(&self) -> BatchId {
        self.batch
    }

    /// State of a path; undecided paths are pending
    #[must_use]
    pub fn state(&self, path: &str) -> ResolutionState {
        self.records.get(path).copied().unwrap_or_default()
    }

    /// Record a decision on a path
    ///
    /// Decisions that are not valid from the current state leave it unchanged.
    pub fn record(&mut self, path: impl Into<String>, decision: Decision) -> TransitionOutcome {
        let path = path.into();
        let from = self.state(&path);
        match next_state(from, decision) {
            Some(to) => {
                tracing::debug!(%path, ?from, ?to, "resolution recorded");
                self.records.insert(path, to);
                TransitionOutcome::Applied { from, to }
            }
            None => {
                tracing::debug!(%path, ?from, ?decision, "resolution ignored");
                TransitionOutcome::Ignored { state: from }
            }
        }
    }

    /// Accept a path
    pub fn accept(&mut self, path: impl Into<String>) -> TransitionOutcome {
        self.record(path, Decision::Accept)
    }

    /// Reject a path
    pub fn reject(&mut self, path: impl Into<String>) -> TransitionOutcome {
        self.record(path, Decision::Reject)
    }

    /// Roll back a decision on a path
    pub fn rollback(&mut self, path: impl Into<String>) -> TransitionOutcome {
        self.record(path, Decision::Rollback)
    }

    /// Paths currently in `state`, in first-decided order
    ///
    /// Paths never decided are not listed, even for `Pending`.
    pub fn paths_in(&self, state: ResolutionState) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(move |(_, s)| **s == state)
            .map(|(path, _)| path.as_str())
    }

    /// Discard all records and start tracking a new batch
    pub fn supersede(&mut self, batch: BatchId) {
        tracing::debug!(old = %self.batch, new = %batch, cleared = self.records.len(), "batch superseded");
        self.batch = batch;
        self.records.clear();
    }

    /// Number of paths with a record
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been decided
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
