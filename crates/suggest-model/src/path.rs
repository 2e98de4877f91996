//! Suggestion paths
//!
//! Provides [`PathGrammar`] and [`SuggestionPath`] for addressing suggestions
//! at containers, container fields and the children beneath them.
//!
//! Segmentation is purely dot-based: hyphens and any other characters inside
//! an identifier belong to the identifier.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

/// Collection tokens that make up the path grammar
///
/// # Examples
/// - `initiative.I-1` → container entity
/// - `initiative.I-1.title` → container field
/// - `initiative.I-1.tasks.T-7` → child entity
/// - `initiative.I-1.tasks.T-7.checklist.C-2` → anything below a child
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PathGrammar {
    /// Root token naming the container collection
    pub container: String,

    /// Token naming a container's child collection
    pub children: String,

    /// Token naming a child's ordered leaf list
    pub leaf: String,
}

impl PathGrammar {
    /// Create grammar from explicit tokens
    #[inline]
    #[must_use]
    pub fn new(
        container: impl Into<String>,
        children: impl Into<String>,
        leaf: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            children: children.into(),
            leaf: leaf.into(),
        }
    }

    /// Check that tokens are usable as path segments
    ///
    /// # Errors
    /// Returns error if a token is empty, contains the separator, or two
    /// tokens are equal.
    pub fn validate(&self) -> Result<(), PathError> {
        for token in [&self.container, &self.children, &self.leaf] {
            if token.is_empty() || token.contains(PATH_SEPARATOR) {
                return Err(PathError::InvalidToken(token.clone()));
            }
        }
        if self.container == self.children
            || self.container == self.leaf
            || self.children == self.leaf
        {
            return Err(PathError::InvalidToken(format!(
                "{}/{}/{}",
                self.container, self.children, self.leaf
            )));
        }
        Ok(())
    }

    /// Parse a raw path against this grammar
    ///
    /// # Errors
    /// Returns error if the path is empty, does not start with the container
    /// token, lacks an identifier, or contains an empty segment.
    pub fn parse(&self, path: &str) -> Result<SuggestionPath, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let Some((root, rest)) = segments.split_first() else {
            return Err(PathError::Empty);
        };
        if *root != self.container {
            return Err(PathError::WrongRoot((*root).to_string()));
        }
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(PathError::EmptySegment);
        }
        let Some((container_id, rest)) = rest.split_first() else {
            return Err(PathError::MissingIdentifier(path.to_string()));
        };

        let target = match rest {
            [] => PathTarget::Container,
            [collection] if *collection == self.children => {
                return Err(PathError::MissingIdentifier(path.to_string()));
            }
            [field] => PathTarget::Field((*field).to_string()),
            [collection, child_id, tail @ ..] if *collection == self.children => {
                PathTarget::Child {
                    child_id: (*child_id).to_string(),
                    rest: tail.iter().map(|s| (*s).to_string()).collect(),
                }
            }
            _ => return Err(PathError::UnexpectedSegment(path.to_string())),
        };

        Ok(SuggestionPath {
            raw: path.to_string(),
            container_id: (*container_id).to_string(),
            target,
        })
    }

    /// Path of a container entity
    #[must_use]
    pub fn container_path(&self, container_id: &str) -> String {
        format!("{}.{container_id}", self.container)
    }

    /// Path of a container field
    #[must_use]
    pub fn container_field_path(&self, container_id: &str, field: &str) -> String {
        format!("{}.{container_id}.{field}", self.container)
    }

    /// Path of a child entity
    #[must_use]
    pub fn child_path(&self, container_id: &str, child_id: &str) -> String {
        format!("{}.{container_id}.{}.{child_id}", self.container, self.children)
    }

    /// Path of a child field
    #[must_use]
    pub fn child_field_path(&self, container_id: &str, child_id: &str, field: &str) -> String {
        format!(
            "{}.{container_id}.{}.{child_id}.{field}",
            self.container, self.children
        )
    }

    /// Check if a segment names one of the nested collections
    #[inline]
    #[must_use]
    pub fn is_collection_token(&self, segment: &str) -> bool {
        segment == self.children || segment == self.leaf
    }
}

impl Default for PathGrammar {
    fn default() -> Self {
        Self::new("initiative", "tasks", "checklist")
    }
}

/// What a parsed path points at, relative to its container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathTarget {
    /// The container entity itself
    Container,

    /// A scalar field of the container
    Field(String),

    /// A child entity, or anything nested below it
    Child {
        /// Child identifier
        child_id: String,
        /// Segments after the child identifier (empty for the child itself)
        rest: Vec<String>,
    },
}

/// Parsed, validated suggestion path
///
/// Equality is exact over the raw string; two paths never match by
/// substring.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuggestionPath {
    raw: String,
    container_id: String,
    target: PathTarget,
}

impl SuggestionPath {
    /// Original path string
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Identifier of the owning container
    #[inline]
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Target relative to the container
    #[inline]
    #[must_use]
    pub fn target(&self) -> &PathTarget {
        &self.target
    }

    /// Container field name, if this is a container field path
    #[inline]
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match &self.target {
            PathTarget::Field(field) => Some(field.as_str()),
            _ => None,
        }
    }

    /// Child identifier, if this path addresses a child or below
    #[inline]
    #[must_use]
    pub fn child_id(&self) -> Option<&str> {
        match &self.target {
            PathTarget::Child { child_id, .. } => Some(child_id.as_str()),
            _ => None,
        }
    }

    /// Child field name, if this path is exactly `<child>.<field>`
    #[must_use]
    pub fn child_field(&self) -> Option<&str> {
        match &self.target {
            PathTarget::Child { rest, .. } if rest.len() == 1 => Some(rest[0].as_str()),
            _ => None,
        }
    }

    /// Remainder under the child collection, e.g. `T-7.title`
    #[must_use]
    pub fn child_suffix(&self) -> Option<String> {
        match &self.target {
            PathTarget::Child { child_id, rest } if rest.is_empty() => Some(child_id.clone()),
            PathTarget::Child { child_id, rest } => {
                Some(format!("{child_id}{PATH_SEPARATOR}{}", rest.join(".")))
            }
            _ => None,
        }
    }

    /// Check if path addresses the container entity
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.target, PathTarget::Container)
    }
}

impl Display for SuggestionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Check if `path` equals `base` or lies strictly below it
///
/// `initiative.X-123` is NOT under `initiative.X-12`; a separator must follow
/// the base.
#[must_use]
pub fn is_at_or_under(path: &str, base: &str) -> bool {
    path == base || remainder_under(path, base).is_some()
}

/// Portion of `path` after `base` and the separator, if strictly below
#[must_use]
pub fn remainder_under<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    path.strip_prefix(base)?.strip_prefix(PATH_SEPARATOR)
}

/// Errors related to suggestion paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty path string
    #[error("path is empty")]
    Empty,

    /// First segment is not the container token
    #[error("path root '{0}' is not the container collection")]
    WrongRoot(String),

    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Collection token without identifier
    #[error("path '{0}' is missing an identifier")]
    MissingIdentifier(String),

    /// Segments that fit no addressing form
    #[error("path '{0}' has unexpected segments")]
    UnexpectedSegment(String),

    /// Unusable grammar token
    #[error("invalid collection token: '{0}'")]
    InvalidToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> PathGrammar {
        PathGrammar::default()
    }

    #[test]
    fn parse_container() {
        let path = grammar().parse("initiative.I-1").unwrap();
        assert_eq!(path.container_id(), "I-1");
        assert!(path.is_container());
        assert_eq!(path.to_string(), "initiative.I-1");
    }

    #[test]
    fn parse_container_field() {
        let path = grammar().parse("initiative.I-1.title").unwrap();
        assert_eq!(path.field(), Some("title"));
        assert!(path.child_id().is_none());
    }

    #[test]
    fn parse_child_and_suffix() {
        let path = grammar().parse("initiative.I-1.tasks.T-7").unwrap();
        assert_eq!(path.child_id(), Some("T-7"));
        assert_eq!(path.child_suffix().as_deref(), Some("T-7"));
        assert!(path.child_field().is_none());

        let field = grammar().parse("initiative.I-1.tasks.T-7.title").unwrap();
        assert_eq!(field.child_field(), Some("title"));
        assert_eq!(field.child_suffix().as_deref(), Some("T-7.title"));
    }

    #[test]
    fn parse_deep_child_path() {
        let path = grammar()
            .parse("initiative.I-1.tasks.T-7.checklist.C-2.done")
            .unwrap();
        assert_eq!(path.child_suffix().as_deref(), Some("T-7.checklist.C-2.done"));
    }

    #[test]
    fn hyphens_belong_to_identifier() {
        let path = grammar().parse("initiative.X-123-OTHER").unwrap();
        assert_eq!(path.container_id(), "X-123-OTHER");
    }

    #[test]
    fn parse_rejects_malformed() {
        let g = grammar();
        assert_eq!(g.parse(""), Err(PathError::Empty));
        assert!(matches!(g.parse("initiative"), Err(PathError::MissingIdentifier(_))));
        assert_eq!(g.parse("initiative."), Err(PathError::EmptySegment));
        assert_eq!(g.parse("initiative..x"), Err(PathError::EmptySegment));
        assert!(matches!(g.parse("task.T-1"), Err(PathError::WrongRoot(_))));
        assert!(matches!(
            g.parse("initiative.I-1.tasks"),
            Err(PathError::MissingIdentifier(_))
        ));
        assert_eq!(g.parse("initiative.I-1.tasks."), Err(PathError::EmptySegment));
        assert!(matches!(
            g.parse("initiative.I-1.title.extra"),
            Err(PathError::UnexpectedSegment(_))
        ));
    }

    #[test]
    fn builders_round_trip_through_parse() {
        let g = grammar();
        let child = g.child_field_path("I-1", "T-2", "title");
        assert_eq!(child, "initiative.I-1.tasks.T-2.title");
        assert_eq!(g.parse(&child).unwrap().child_field(), Some("title"));
        assert_eq!(g.container_field_path("I-1", "status"), "initiative.I-1.status");
    }

    #[test]
    fn is_at_or_under_requires_separator() {
        assert!(is_at_or_under("initiative.X-123", "initiative.X-123"));
        assert!(is_at_or_under("initiative.X-123.title", "initiative.X-123"));
        assert!(!is_at_or_under("initiative.X-123-OTHER", "initiative.X-123"));
        assert!(!is_at_or_under("initiative.X-1234", "initiative.X-123"));
    }

    #[test]
    fn remainder_under_strips_base() {
        assert_eq!(
            remainder_under("initiative.I-1.tasks.T-1", "initiative.I-1"),
            Some("tasks.T-1")
        );
        assert_eq!(remainder_under("initiative.I-1", "initiative.I-1"), None);
    }

    #[test]
    fn grammar_validate() {
        assert!(grammar().validate().is_ok());
        assert!(PathGrammar::new("a", "a", "b").validate().is_err());
        assert!(PathGrammar::new("a.b", "c", "d").validate().is_err());
        assert!(PathGrammar::new("", "c", "d").validate().is_err());
    }

    #[test]
    fn collection_tokens() {
        let g = grammar();
        assert!(g.is_collection_token("tasks"));
        assert!(g.is_collection_token("checklist"));
        assert!(!g.is_collection_token("title"));
    }
}
