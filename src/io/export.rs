use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::InventoryService;
use crate::domain::{Product, SALE_DATE_FORMAT, Sale, format_cents};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
}

/// Exporter for writing inventory data to various formats
pub struct Exporter<'a> {
    service: &'a InventoryService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a InventoryService) -> Self {
        Self { service }
    }

    /// Export the product catalog to CSV format
    pub async fn export_products_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let products = self.service.list_products().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "name", "price", "quantity"])?;

        for product in &products {
            csv_writer.write_record([
                product.id.to_string(),
                product.name.clone(),
                format_cents(product.price_cents),
                product.quantity.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(products.len())
    }

    /// Export the sales summary (newest first) to CSV format.
    /// Sales of deleted products have an empty product column.
    pub async fn export_sales_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let summary = self.service.sales_summary().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "sale_id",
            "product_id",
            "product",
            "quantity_sold",
            "total",
            "sale_date",
        ])?;

        for entry in &summary {
            csv_writer.write_record([
                entry.sale_id.to_string(),
                entry.product_id.to_string(),
                entry.product_name.clone().unwrap_or_default(),
                entry.quantity_sold.to_string(),
                format_cents(entry.total_cents),
                entry.sale_date.format(SALE_DATE_FORMAT).to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(summary.len())
    }

    /// Export products and the full sale log as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            products: self.service.list_products().await?,
            sales: self.service.list_sales().await?,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;

        Ok(snapshot)
    }
}
