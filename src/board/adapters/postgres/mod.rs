//! `PostgreSQL` adapters for board persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, DEFAULT_BOARD_LOCK_KEY, PostgresBoardRepository};
