//! Display-only text diffs of scalar fields
//!
//! [`FieldDiffer`] never fails: anything it cannot diff is reported as
//! [`FieldDiff::Unavailable`] with the reason attached.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::borrow::Cow;
use std::time::Duration;

/// Limits for field diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDiffConfig {
    /// Largest combined input length, in bytes, the differ will accept
    pub max_len: usize,

    /// Deadline for one diff; past it the result is coarser but still exact
    pub timeout_ms: u64,
}

impl Default for FieldDiffConfig {
    fn default() -> Self {
        Self {
            max_len: 64 * 1024,
            timeout_ms: 200,
        }
    }
}

/// Kind of a text chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Text on both sides
    Equal,
    /// Text only in the suggested value
    Insert,
    /// Text only in the original value
    Delete,
}

/// Run of text sharing one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    /// Chunk kind
    pub kind: ChunkKind,
    /// Chunk text
    pub text: String,
}

/// Ordered chunks turning the original text into the suggested text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextPatch {
    chunks: Vec<TextChunk>,
}

impl TextPatch {
    /// Chunks in order
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    /// Original text (equal + deleted chunks)
    #[must_use]
    pub fn original_text(&self) -> String {
        self.collect(ChunkKind::Delete)
    }

    /// Suggested text (equal + inserted chunks)
    #[must_use]
    pub fn changed_text(&self) -> String {
        self.collect(ChunkKind::Insert)
    }

    fn collect(&self, side: ChunkKind) -> String {
        self.chunks
            .iter()
            .filter(|c| c.kind == ChunkKind::Equal || c.kind == side)
            .map(|c| c.text.as_str())
            .collect()
    }

    fn push(&mut self, kind: ChunkKind, text: &str) {
        match self.chunks.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(text),
            _ => self.chunks.push(TextChunk {
                kind,
                text: text.to_string(),
            }),
        }
    }
}

/// Reason a field diff could not be produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum DiffUnavailable {
    /// One side is an array or object
    #[error("value is not a scalar")]
    NonScalar,

    /// Inputs exceed the configured length
    #[error("inputs of {len} bytes exceed limit of {limit}")]
    TooLarge {
        /// Combined input length (saturated on overflow)
        len: usize,
        /// Configured limit
        limit: usize,
    },
}

/// Result of diffing one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum FieldDiff {
    /// Values are equal
    Unchanged,
    /// Values differ
    Changed(TextPatch),
    /// No diff available
    Unavailable(DiffUnavailable),
}

impl FieldDiff {
    /// Patch, if the values differ
    #[inline]
    #[must_use]
    pub fn patch(&self) -> Option<&TextPatch> {
        match self {
            Self::Changed(patch) => Some(patch),
            _ => None,
        }
    }
}

/// Word-level differ for scalar field values
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldDiffer {
    config: FieldDiffConfig,
}

impl FieldDiffer {
    /// Create differ with limits
    #[inline]
    #[must_use]
    pub fn new(config: FieldDiffConfig) -> Self {
        Self { config }
    }

    /// Diff two JSON values; `null` and absent read as empty text
    #[must_use]
    pub fn diff_values(&self, original: Option<&Value>, suggested: Option<&Value>) -> FieldDiff {
        match (scalar_text(original), scalar_text(suggested)) {
            (Some(before), Some(after)) => self.diff_text(&before, &after),
            _ => {
                tracing::debug!("field diff unavailable: non-scalar value");
                FieldDiff::Unavailable(DiffUnavailable::NonScalar)
            }
        }
    }

    /// Diff two strings on word/whitespace boundaries
    #[must_use]
    pub fn diff_text(&self, original: &str, suggested: &str) -> FieldDiff {
        if original == suggested {
            return FieldDiff::Unchanged;
        }

        let len = original.len().saturating_add(suggested.len());
        if len > self.config.max_len {
            tracing::debug!(len, limit = self.config.max_len, "field diff unavailable: too large");
            return FieldDiff::Unavailable(DiffUnavailable::TooLarge {
                len,
                limit: self.config.max_len,
            });
        }

        let diff = TextDiff::configure()
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .diff_words(original, suggested);

        let mut patch = TextPatch::default();
        for change in diff.iter_all_changes() {
            let kind = match change.tag() {
                ChangeTag::Equal => ChunkKind::Equal,
                ChangeTag::Insert => ChunkKind::Insert,
                ChangeTag::Delete => ChunkKind::Delete,
            };
            patch.push(kind, change.value());
        }
        FieldDiff::Changed(patch)
    }
}

fn scalar_text(value: Option<&Value>) -> Option<Cow<'_, str>> {
    match value {
        None | Some(Value::Null) => Some(Cow::Borrowed("")),
        Some(Value::String(s)) => Some(Cow::Borrowed(s.as_str())),
        Some(Value::Bool(b)) => Some(Cow::Owned(b.to_string())),
        Some(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
        Some(Value::Array(_) | Value::Object(_)) => None,
    }
}
