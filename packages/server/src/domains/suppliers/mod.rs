//! Suppliers domain - the businesses whose catalogs are imported.

pub mod models;

pub use models::{Supplier, SupplierCategory, SupplierInput};
