//! Taskboard: an ordered task board store.
//!
//! This crate keeps tasks in status columns with dense, gap-free positions
//! and exposes create, update, delete, move, and bulk reorder operations that
//! preserve that density atomically.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`board`]: Columns, positions, and the board store
//! - [`config`]: `PostgreSQL` store settings

pub mod board;
pub mod config;
