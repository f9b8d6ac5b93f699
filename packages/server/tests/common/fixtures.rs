//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use server_core::domains::catalog::{CatalogItem, CatalogItemInput};
use server_core::domains::suppliers::{Supplier, SupplierCategory, SupplierInput};
use sqlx::PgPool;
use uuid::Uuid;

/// Create an active supplier with a unique slug.
pub async fn create_test_supplier(pool: &PgPool, name: &str) -> Result<Supplier> {
    let input = SupplierInput {
        slug: format!("{}-{}", name.to_lowercase().replace(' ', "-"), Uuid::now_v7()),
        name: name.to_string(),
        logo_url: None,
        website_url: Some("https://supplier.example".to_string()),
        scrape_config: None,
        is_active: true,
        category: Some(SupplierCategory::BenchTop),
    };
    Supplier::create(&input, pool).await
}

/// Create a hand-entered catalog item for `supplier`.
pub async fn create_test_item(pool: &PgPool, supplier: &Supplier, name: &str) -> Result<CatalogItem> {
    let input = CatalogItemInput {
        name: name.to_string(),
        supplier_id: Some(supplier.id),
        color: Some("Warm grey".to_string()),
        material: Some("Laminate".to_string()),
        image_url: Some(format!("https://supplier.example/colour/{}.jpg", Uuid::now_v7())),
        ..Default::default()
    };
    CatalogItem::create(&input, pool).await
}

/// A supplier gallery page with one logo and `count` swatches.
pub fn gallery_html(count: usize) -> String {
    let swatches: String = (0..count)
        .map(|i| format!(r#"<img src="/swatch/{i}.jpg" alt="Finish {i}">"#))
        .collect();
    format!(r#"<html><body><img src="/logo.svg" alt="Brand Logo">{swatches}</body></html>"#)
}
