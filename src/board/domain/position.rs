//! Position arithmetic that keeps every column dense.
//!
//! Mutations never renumber a column wholesale. Each one is reduced to a
//! small set of [`PositionShift`]s: ranged `+1`/`-1` adjustments over the
//! tasks of one column. Adapters apply the shifts and the final placement of
//! the affected task inside one atomic unit, so the shifts here are the only
//! place positions are reasoned about.

use super::{Column, Position, Slot};

/// Direction a ranged shift moves its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Positions grow by one, opening a slot.
    Down,
    /// Positions shrink by one, closing a slot.
    Up,
}

impl ShiftDirection {
    /// Returns the signed position delta.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::Down => 1,
            Self::Up => -1,
        }
    }
}

/// Adjustment of every task in `column` whose position lies in
/// `from..=through` (or `from..` when `through` is `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionShift {
    /// Column the shift applies to.
    pub column: Column,
    /// First position affected.
    pub from: Position,
    /// Last position affected, inclusive; unbounded when `None`.
    pub through: Option<Position>,
    /// Direction of the adjustment.
    pub direction: ShiftDirection,
}

impl PositionShift {
    /// Returns whether a task at `slot` is affected by this shift.
    #[must_use]
    pub fn covers(&self, slot: Slot) -> bool {
        slot.column == self.column
            && slot.position >= self.from
            && self.through.is_none_or(|last| slot.position <= last)
    }

    /// Returns the position a covered task ends up at.
    #[must_use]
    pub const fn apply(&self, position: Position) -> Position {
        match self.direction {
            ShiftDirection::Down => position.next(),
            ShiftDirection::Up => position.previous(),
        }
    }
}

/// Shift closing the gap left by the task removed from `vacated`.
#[must_use]
pub const fn plan_removal(vacated: Slot) -> PositionShift {
    PositionShift {
        column: vacated.column,
        from: vacated.position.next(),
        through: None,
        direction: ShiftDirection::Up,
    }
}

/// Shifts relocating one task from `source` to `destination`.
///
/// Across columns the destination opens a slot at the target position and
/// the source closes the gap behind the task; the two columns are disjoint,
/// so the order of the shifts does not matter. Within a column the move is a
/// rotation of the range between the two positions. Moving a task onto its
/// own slot yields no shifts.
#[must_use]
pub fn plan_move(source: Slot, destination: Slot) -> Vec<PositionShift> {
    if source.column != destination.column {
        return vec![
            PositionShift {
                column: destination.column,
                from: destination.position,
                through: None,
                direction: ShiftDirection::Down,
            },
            plan_removal(source),
        ];
    }

    let column = source.column;
    match destination.position.cmp(&source.position) {
        std::cmp::Ordering::Equal => Vec::new(),
        std::cmp::Ordering::Greater => vec![PositionShift {
            column,
            from: source.position.next(),
            through: Some(destination.position),
            direction: ShiftDirection::Up,
        }],
        std::cmp::Ordering::Less => vec![PositionShift {
            column,
            from: destination.position,
            through: Some(source.position.previous()),
            direction: ShiftDirection::Down,
        }],
    }
}

/// Largest position a task may be moved to in a column holding
/// `occupants` other tasks: the slot just past the last one.
#[must_use]
pub fn last_insertable(occupants: usize) -> Position {
    Position::after_last(occupants)
}
