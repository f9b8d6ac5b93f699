pub mod liked_item;

pub use liked_item::*;
