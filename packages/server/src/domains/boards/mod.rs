//! Boards domain - saved mood boards.

pub mod models;

pub use models::{BoardItemPlacement, SavedBoard, SavedBoardInput};
