mod action;
mod rows;
mod state;

pub use action::Action;
pub use rows::{LogRow, log_rows, row_of_chunk, row_of_line};
pub use state::{AppState, Focus, UiState};
