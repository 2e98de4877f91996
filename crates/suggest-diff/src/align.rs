//! Order-preserving alignment of identity-bearing lists
//!
//! Provides [`align_lists`], which turns an original and a changed sequence
//! into a rendering plan of [`DiffRegion`]s. Items are matched by identity
//! through a longest common subsequence; matched items whose content differs
//! become `Modified` regions. No item from either side is ever dropped.

use crate::lcs::{longest_common_subsequence, table_cells};
use serde::Serialize;
use suggest_model::Identified;

/// One region of a list diff
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiffRegion<T> {
    /// Items present and identical on both sides
    Unchanged {
        /// Items in original order
        items: Vec<T>,
    },

    /// One item present on both sides with differing content
    Modified {
        /// Item as it was
        original: T,
        /// Item as proposed
        changed: T,
    },

    /// Items only in the changed sequence
    Added {
        /// Items in changed order
        items: Vec<T>,
    },

    /// Items only in the original sequence
    Removed {
        /// Items in original order
        items: Vec<T>,
    },
}

/// Item totals per region kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionCounts {
    /// Unchanged items
    pub unchanged: usize,
    /// Modified pairs
    pub modified: usize,
    /// Added items
    pub added: usize,
    /// Removed items
    pub removed: usize,
}

/// Rendering plan for a list diff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListAlignment<T> {
    regions: Vec<DiffRegion<T>>,
    coarse: bool,
}

impl<T> ListAlignment<T> {
    /// Regions in rendering order
    #[inline]
    #[must_use]
    pub fn regions(&self) -> &[DiffRegion<T>] {
        &self.regions
    }

    /// Consume into regions
    #[inline]
    #[must_use]
    pub fn into_regions(self) -> Vec<DiffRegion<T>> {
        self.regions
    }

    /// Check if the size limit replaced matching with remove-all/add-all
    #[inline]
    #[must_use]
    pub fn is_coarse(&self) -> bool {
        self.coarse
    }

    /// Item totals per region kind
    #[must_use]
    pub fn counts(&self) -> RegionCounts {
        let mut counts = RegionCounts::default();
        for region in &self.regions {
            match region {
                DiffRegion::Unchanged { items } => counts.unchanged += items.len(),
                DiffRegion::Modified { .. } => counts.modified += 1,
                DiffRegion::Added { items } => counts.added += items.len(),
                DiffRegion::Removed { items } => counts.removed += items.len(),
            }
        }
        counts
    }

    /// Check if any item was added, removed or modified
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.regions
            .iter()
            .any(|r| !matches!(r, DiffRegion::Unchanged { .. }))
    }

    /// Original sequence reconstructed from the regions
    #[must_use]
    pub fn original_items(&self) -> Vec<&T> {
        let mut out = Vec::new();
        for region in &self.regions {
            match region {
                DiffRegion::Unchanged { items } | DiffRegion::Removed { items } => {
                    out.extend(items.iter());
                }
                DiffRegion::Modified { original, .. } => out.push(original),
                DiffRegion::Added { .. } => {}
            }
        }
        out
    }

    /// Changed sequence reconstructed from the regions
    #[must_use]
    pub fn changed_items(&self) -> Vec<&T> {
        let mut out = Vec::new();
        for region in &self.regions {
            match region {
                DiffRegion::Unchanged { items } | DiffRegion::Added { items } => {
                    out.extend(items.iter());
                }
                DiffRegion::Modified { changed, .. } => out.push(changed),
                DiffRegion::Removed { .. } => {}
            }
        }
        out
    }
}

/// Align two sequences by identity with default limits
#[must_use]
pub fn align_lists<T>(original: &[T], changed: &[T]) -> ListAlignment<T>
where
    T: Identified + PartialEq + Clone,
{
    align_lists_with(original, changed, &ListDiffConfig::default())
}

/// Align two sequences by identity
///
/// # Algorithm
/// 1. Short-circuit identical sequences to a single unchanged region
/// 2. Fall back to a coarse alignment if the table exceeds the limit
/// 3. Compute LCS with identity equality as the match predicate
/// 4. Walk both sequences: skipped originals are removed, skipped changed
///    items are added, each anchor is unchanged or modified by content
#[must_use]
pub fn align_lists_with<T>(
    original: &[T],
    changed: &[T],
    config: &ListDiffConfig,
) -> ListAlignment<T>
where
    T: Identified + PartialEq + Clone,
{
    if original == changed {
        let regions = if original.is_empty() {
            Vec::new()
        } else {
            vec![DiffRegion::Unchanged {
                items: original.to_vec(),
            }]
        };
        return ListAlignment {
            regions,
            coarse: false,
        };
    }

    let within_limit = table_cells(original.len(), changed.len())
        .is_some_and(|cells| cells <= config.max_cells);
    if !within_limit {
        tracing::debug!(
            original = original.len(),
            changed = changed.len(),
            limit = config.max_cells,
            "list alignment too large, using coarse regions"
        );
        let mut builder = RegionBuilder::default();
        builder.removed(original);
        builder.added(changed);
        return ListAlignment {
            regions: builder.regions,
            coarse: true,
        };
    }

    let anchors = longest_common_subsequence(original, changed, |a, b| a.id() == b.id());

    let mut builder = RegionBuilder::default();
    let (mut i, mut j) = (0, 0);
    for (anchor_i, anchor_j) in anchors {
        builder.removed(&original[i..anchor_i]);
        builder.added(&changed[j..anchor_j]);

        let (before, after) = (&original[anchor_i], &changed[anchor_j]);
        if before == after {
            builder.unchanged(before);
        } else {
            builder.modified(before, after);
        }

        i = anchor_i + 1;
        j = anchor_j + 1;
    }
    builder.removed(&original[i..]);
    builder.added(&changed[j..]);

    ListAlignment {
        regions: builder.regions,
        coarse: false,
    }
}

/// Appends items, coalescing adjacent regions of the same kind
struct RegionBuilder<T> {
    regions: Vec<DiffRegion<T>>,
}

impl<T> Default for RegionBuilder<T> {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
        }
    }
}

impl<T: Clone> RegionBuilder<T> {
    fn unchanged(&mut self, item: &T) {
        if let Some(DiffRegion::Unchanged { items }) = self.regions.last_mut() {
            items.push(item.clone());
        } else {
            self.regions.push(DiffRegion::Unchanged {
                items: vec![item.clone()],
            });
        }
    }

    fn modified(&mut self, original: &T, changed: &T) {
        self.regions.push(DiffRegion::Modified {
            original: original.clone(),
            changed: changed.clone(),
        });
    }

    fn added(&mut self, new_items: &[T]) {
        if new_items.is_empty() {
            return;
        }
        if let Some(DiffRegion::Added { items }) = self.regions.last_mut() {
            items.extend_from_slice(new_items);
        } else {
            self.regions.push(DiffRegion::Added {
                items: new_items.to_vec(),
            });
        }
    }

    fn removed(&mut self, old_items: &[T]) {
        if old_items.is_empty() {
            return;
        }
        if let Some(DiffRegion::Removed { items }) = self.regions.last_mut() {
            items.extend_from_slice(old_items);
        } else {
            self.regions.push(DiffRegion::Removed {
                items: old_items.to_vec(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use suggest_model::Entity;

    fn item(id: &str, title: &str) -> Entity {
        Entity::new(id).with_field("title", title)
    }

    #[test]
    fn empty_original_is_all_added() {
        let changed = vec![item("1", "a"), item("2", "b")];
        let alignment = align_lists(&[], &changed);
        assert_eq!(
            alignment.regions(),
            &[DiffRegion::Added {
                items: changed.clone()
            }]
        );
    }

    #[test]
    fn empty_changed_is_all_removed() {
        let original = vec![item("1", "a")];
        let alignment = align_lists(&original, &[]);
        assert_eq!(alignment.counts().removed, 1);
        assert_eq!(alignment.regions().len(), 1);
    }

    #[test]
    fn identical_lists_short_circuit() {
        let list = vec![item("1", "a"), item("2", "b")];
        let alignment = align_lists(&list, &list.clone());
        assert!(!alignment.has_changes());
        assert_eq!(
            alignment.regions(),
            &[DiffRegion::Unchanged {
                items: list.clone()
            }]
        );

        let empty: Vec<Entity> = Vec::new();
        assert!(align_lists(&empty, &empty).regions().is_empty());
    }

    #[test]
    fn modified_then_added() {
        let original = vec![item("1", "x")];
        let changed = vec![item("1", "x2"), item("2", "y")];
        let alignment = align_lists(&original, &changed);

        assert_eq!(
            alignment.regions(),
            &[
                DiffRegion::Modified {
                    original: item("1", "x"),
                    changed: item("1", "x2"),
                },
                DiffRegion::Added {
                    items: vec![item("2", "y")]
                },
            ]
        );
    }

    #[test]
    fn removal_in_middle_keeps_order() {
        let original = vec![item("1", "a"), item("2", "b"), item("3", "c")];
        let changed = vec![item("1", "a"), item("3", "c")];
        let alignment = align_lists(&original, &changed);

        assert_eq!(
            alignment.regions(),
            &[
                DiffRegion::Unchanged {
                    items: vec![item("1", "a")]
                },
                DiffRegion::Removed {
                    items: vec![item("2", "b")]
                },
                DiffRegion::Unchanged {
                    items: vec![item("3", "c")]
                },
            ]
        );
    }

    #[test]
    fn reorder_never_drops_items() {
        let original = vec![item("1", "a"), item("2", "b")];
        let changed = vec![item("2", "b"), item("1", "a")];
        let alignment = align_lists(&original, &changed);

        let counts = alignment.counts();
        assert_eq!(counts.unchanged, 1);
        assert_eq!(counts.removed, 1);
        assert_eq!(counts.added, 1);
        assert_eq!(alignment.original_items(), original.iter().collect::<Vec<_>>());
        assert_eq!(alignment.changed_items(), changed.iter().collect::<Vec<_>>());
    }

    #[test]
    fn limit_boundary_switches_to_coarse() {
        let original = vec![item("1", "a"), item("2", "b")];
        let changed = vec![item("1", "a2"), item("2", "b")];
        // (2 + 1) * (2 + 1) cells
        let exact = align_lists_with(&original, &changed, &ListDiffConfig { max_cells: 9 });
        assert!(!exact.is_coarse());
        assert_eq!(exact.counts().modified, 1);

        let coarse = align_lists_with(&original, &changed, &ListDiffConfig { max_cells: 8 });
        assert!(coarse.is_coarse());
        assert_eq!(
            coarse.regions(),
            &[
                DiffRegion::Removed {
                    items: original.clone()
                },
                DiffRegion::Added {
                    items: changed.clone()
                },
            ]
        );
        assert_eq!(coarse.original_items(), original.iter().collect::<Vec<_>>());
        assert_eq!(coarse.changed_items(), changed.iter().collect::<Vec<_>>());
    }

    #[test]
    fn identical_lists_ignore_limit() {
        let list = vec![item("1", "a")];
        let alignment = align_lists_with(&list, &list.clone(), &ListDiffConfig { max_cells: 0 });
        assert!(!alignment.is_coarse());
        assert!(!alignment.has_changes());
    }

    #[test]
    fn regions_serialize_tagged() {
        let alignment = align_lists(&[], &[item("1", "a")]);
        let value = serde_json::to_value(&alignment).unwrap();
        assert_eq!(value["regions"][0]["kind"], "added");
    }
}
