pub mod boards;
pub mod catalog;
pub mod imports;
pub mod palette;
pub mod suppliers;
