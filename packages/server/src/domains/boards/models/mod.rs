pub mod saved_board;

pub use saved_board::*;
