//! Domain model for the ordered task board.
//!
//! Tasks live in a fixed set of columns and hold a dense, zero-based position
//! within their column. The domain owns the position arithmetic; persistence
//! concerns stay outside of the domain boundary.

mod board;
mod column;
mod density;
mod error;
mod ids;
mod position;
mod task;

pub use board::{Board, Lane};
pub use column::{Column, Slot};
pub use density::{DensityViolation, audit_density};
pub use error::{BoardDomainError, ParseColumnError};
pub use ids::{Position, TaskId};
pub use position::{PositionShift, ShiftDirection, last_insertable, plan_move, plan_removal};
pub use task::{NewTask, PersistedTaskData, Task, TaskDetails, TaskRevision};
