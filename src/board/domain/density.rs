//! Density audit over stored task positions.

use super::{Column, Position, Task};
use std::collections::BTreeMap;
use std::fmt;

/// A column whose positions are not exactly `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityViolation {
    /// Offending column.
    pub column: Column,
    /// Positions found in the column, sorted ascending.
    pub positions: Vec<Position>,
}

impl fmt::Display for DensityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranks: Vec<String> = self.positions.iter().map(ToString::to_string).collect();
        write!(
            f,
            "column {} holds positions [{}], expected 0..{}",
            self.column,
            ranks.join(", "),
            self.positions.len()
        )
    }
}

/// Returns every column whose positions contain a gap or a duplicate.
///
/// Columns are reported in board order; an empty result means the board is
/// dense.
#[must_use]
pub fn audit_density<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<DensityViolation> {
    let mut by_column: BTreeMap<Column, Vec<Position>> = BTreeMap::new();
    for task in tasks {
        by_column
            .entry(task.column())
            .or_default()
            .push(task.position());
    }

    by_column
        .into_iter()
        .filter_map(|(column, mut positions)| {
            positions.sort_unstable();
            let dense = positions
                .iter()
                .enumerate()
                .all(|(rank, position)| Position::after_last(rank) == *position);
            (!dense).then_some(DensityViolation { column, positions })
        })
        .collect()
}
