//! ORDER BY and LIMIT/OFFSET
//!
//! Sorting is stable and multi-key: each key is compared with the shared
//! `compare`, ties fall through to the next key. A row missing the sort
//! column sorts as Null.
//!
//! `compare` is not transitive across columns that mix numbers and
//! non-numeric text, so rows are ordered with a merge sort that accepts any
//! comparator instead of `slice::sort_by`.

use std::cmp::Ordering;

use crate::planner::{Literal, SortDirection};
use crate::value::{compare, Row, Value};

use super::errors::{ExecutorError, ExecutorResult};

static NULL: Value = Value::Null;

/// One resolved sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column as stored in the rows being sorted
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts rows by `keys` in declared order. Stable.
    pub fn sort(rows: &mut [Row], keys: &[SortKey]) {
        if keys.is_empty() {
            return;
        }
        let order = Self::merge_sort((0..rows.len()).collect(), &mut |a, b| {
            Self::compare_rows(&rows[a], &rows[b], keys)
        });

        let mut taken: Vec<Option<Row>> = rows
            .iter_mut()
            .map(|row| Some(std::mem::take(row)))
            .collect();
        for (slot, index) in rows.iter_mut().zip(order) {
            *slot = taken[index].take().unwrap_or_default();
        }
    }

    /// Stable top-down merge sort over row indices
    fn merge_sort<F>(mut indices: Vec<usize>, cmp: &mut F) -> Vec<usize>
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        if indices.len() <= 1 {
            return indices;
        }
        let right = indices.split_off(indices.len() / 2);
        let left = Self::merge_sort(indices, cmp);
        let right = Self::merge_sort(right, cmp);

        let mut merged = Vec::with_capacity(left.len() + right.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            // Left wins ties
            if cmp(right[j], left[i]) == Ordering::Less {
                merged.push(right[j]);
                j += 1;
            } else {
                merged.push(left[i]);
                i += 1;
            }
        }
        merged.extend_from_slice(&left[i..]);
        merged.extend_from_slice(&right[j..]);
        merged
    }

    fn compare_rows(a: &Row, b: &Row, keys: &[SortKey]) -> Ordering {
        for key in keys {
            let a_val = a.get(&key.column).unwrap_or(&NULL);
            let b_val = b.get(&key.column).unwrap_or(&NULL);

            let ordering = match key.direction {
                SortDirection::Asc => compare(a_val, b_val),
                SortDirection::Desc => compare(a_val, b_val).reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// The OFFSET/LIMIT window applied after sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowWindow {
    pub offset: usize,
    /// `None` means no truncation
    pub limit: Option<usize>,
}

impl RowWindow {
    /// Validates LIMIT and OFFSET literals.
    ///
    /// Both must be integers. A negative OFFSET is clamped to 0; a negative
    /// LIMIT means no limit.
    pub fn from_literals(
        limit: Option<&Literal>,
        offset: Option<&Literal>,
    ) -> ExecutorResult<Self> {
        let offset = match offset {
            Some(literal) => Self::integer("OFFSET", literal)?.max(0) as usize,
            None => 0,
        };
        let limit = match limit {
            Some(literal) => usize::try_from(Self::integer("LIMIT", literal)?).ok(),
            None => None,
        };
        Ok(Self { offset, limit })
    }

    fn integer(clause: &str, literal: &Literal) -> ExecutorResult<i64> {
        match literal {
            Literal::Integer(n) => Ok(*n),
            other => Err(ExecutorError::invalid_limit(clause, other)),
        }
    }

    /// Returns true if this window can drop rows
    pub fn is_bounded(&self) -> bool {
        self.offset > 0 || self.limit.is_some()
    }

    /// Applies the window. An OFFSET at or past the end yields no rows.
    pub fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        if !self.is_bounded() {
            return rows;
        }
        if self.offset >= rows.len() {
            return Vec::new();
        }
        rows.into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}
