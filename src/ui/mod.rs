//! Terminal UI: the match screen with the board, the command line, and the
//! play-again prompt.

mod app;
pub mod board_widget;
mod game_view;

pub use app::App;
