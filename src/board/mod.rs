//! Ordered task board.
//!
//! Tasks are partitioned into a fixed set of columns and hold a dense,
//! zero-based position within their column. Create, delete, move, and bulk
//! reorder each run as one atomic unit that leaves every column's positions
//! exactly `0..n`. The module follows hexagonal architecture:
//!
//! - Domain types and position arithmetic in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
