//! In-memory adapter for the board repository port.

mod board;

pub use board::InMemoryBoardRepository;
