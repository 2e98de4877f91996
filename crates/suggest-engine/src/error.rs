//! Error types for the suggestion engine
//!
//! Provides error handling for:
//! - Resolving independent child proposals to their container
//! - Identifiers that cannot be addressed by a path
//! - Resolution state transitions
//! - Configuration loading

use crate::resolution::ResolutionState;
use suggest_model::PathError;

/// Proposal could not be placed in the normalized output
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// Child create without a declared container
    #[error("child '{child}' is created without a container identifier")]
    MissingContainerIdentifier {
        /// Child identifier
        child: String,
    },

    /// Declared container is not in the snapshot
    #[error("child '{child}' targets unknown container '{container}'")]
    UnknownContainer {
        /// Child identifier
        child: String,
        /// Declared container identifier
        container: String,
    },

    /// Child to update or delete is not in the snapshot
    #[error("child '{child}' not found in current state")]
    UnknownChild {
        /// Child identifier
        child: String,
    },

    /// Identifier is empty outside a create, or contains the path separator
    #[error("identifier '{identifier}' cannot be addressed by a path")]
    InvalidIdentifier {
        /// Identifier as proposed
        identifier: String,
    },

    /// Child operation under a container that is being deleted
    #[error("child '{child}' dropped because container '{container}' is deleted")]
    ContainerDeleted {
        /// Child identifier
        child: String,
        /// Deleted container identifier
        container: String,
    },
}

impl NormalizeError {
    /// Identifier of the offending proposal
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::MissingContainerIdentifier { child }
            | Self::UnknownContainer { child, .. }
            | Self::UnknownChild { child }
            | Self::ContainerDeleted { child, .. } => child,
            Self::InvalidIdentifier { identifier } => identifier,
        }
    }
}

/// Illegal resolution state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition not in the allowed set
    #[error("illegal resolution transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: ResolutionState,
        /// Requested state
        to: ResolutionState,
    },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Path grammar tokens are unusable
    #[error("invalid path grammar: {0}")]
    Grammar(#[from] PathError),

    /// Leaf identity field is empty
    #[error("leaf id field must not be empty")]
    EmptyLeafIdField,
}

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Normalization failed under the strict policy
    #[error("normalization failed: {0}")]
    Normalize(#[from] NormalizeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_error_child() {
        let err = NormalizeError::UnknownContainer {
            child: "T-1".into(),
            container: "I-9".into(),
        };
        assert_eq!(err.identifier(), "T-1");
        assert_eq!(err.to_string(), "child 'T-1' targets unknown container 'I-9'");
    }

    #[test]
    fn invalid_identifier_display() {
        let err = NormalizeError::InvalidIdentifier {
            identifier: "T.1".into(),
        };
        assert_eq!(err.identifier(), "T.1");
        assert_eq!(err.to_string(), "identifier 'T.1' cannot be addressed by a path");
    }

    #[test]
    fn engine_error_from_normalize() {
        let err: EngineError = NormalizeError::UnknownChild { child: "T-2".into() }.into();
        assert!(matches!(err, EngineError::Normalize(_)));
    }

    #[test]
    fn transition_error_display() {
        let err = TransitionError::IllegalTransition {
            from: ResolutionState::Accepted,
            to: ResolutionState::Rejected,
        };
        assert_eq!(err.to_string(), "illegal resolution transition: Accepted -> Rejected");
    }
}
