//! Longest common subsequence over arbitrary item pairs
//!
//! Classic O(n·m) dynamic-programming table. The table stores suffix lengths
//! so the forward walk that extracts the subsequence is deterministic for a
//! fixed input: matches are taken diagonally first, and on a tie the walk
//! advances the left sequence.

/// Number of table cells needed to align sequences of these lengths
///
/// Returns `None` on overflow.
#[inline]
#[must_use]
pub fn table_cells(left_len: usize, right_len: usize) -> Option<usize> {
    left_len.checked_add(1)?.checked_mul(right_len.checked_add(1)?)
}

/// Index pairs `(left, right)` of one longest common subsequence
///
/// Both index sequences are strictly increasing. Callers bound the input with
/// [`table_cells`]; a table that cannot be sized yields no pairs.
pub fn longest_common_subsequence<A, B, F>(left: &[A], right: &[B], eq: F) -> Vec<(usize, usize)>
where
    F: Fn(&A, &B) -> bool,
{
    let (n, m) = (left.len(), right.len());
    if n == 0 || m == 0 {
        return Vec::new();
    }
    let Some(cells) = table_cells(n, m) else {
        return Vec::new();
    };

    let width = m + 1;
    let mut table = vec![0u32; cells];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if eq(&left[i], &right[j]) {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[0] as usize);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if eq(&left[i], &right[j]) {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}
