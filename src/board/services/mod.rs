//! Application services for board orchestration.

mod board;
mod requests;

pub use board::{BoardService, BoardServiceError, BoardServiceResult, ErrorKind};
pub use requests::{CreateTaskRequest, MoveTaskRequest, ReorderTasksRequest, UpdateTaskRequest};
