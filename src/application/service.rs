use anyhow::Context;
use tracing::{info, warn};

use crate::domain::{Cents, Product, ProductId, Sale, SaleSummary};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations for the inventory.
/// This is the primary interface for any client (CLI, interactive menu, export).
pub struct InventoryService {
    repo: Repository,
}

/// Result of a completed sale
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub product_name: String,
    /// Stock left after the sale
    pub remaining_stock: i64,
}

impl SaleReceipt {
    /// Total charged for the sale.
    pub fn total_cents(&self) -> Cents {
        self.sale.total_cents
    }
}

impl InventoryService {
    /// Create a new inventory service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open (or create) the database at the given path and ensure the schema exists.
    pub async fn open(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Close the store. Any further operation fails with a storage error.
    pub async fn close(&self) {
        self.repo.close().await;
    }

    // ========================
    // Product operations
    // ========================

    /// Add a new product to the catalog.
    pub async fn add_product(
        &self,
        name: &str,
        price_cents: Cents,
        quantity: i64,
    ) -> Result<Product, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Product name cannot be empty".to_string(),
            ));
        }
        validate_price(price_cents)?;
        validate_quantity(quantity)?;

        let mut product = Product::new(name, price_cents, quantity);
        self.repo.save_product(&mut product).await?;
        Ok(product)
    }

    /// List all products ordered by ID.
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.repo.list_products().await?)
    }

    /// Get a product by ID.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, AppError> {
        self.repo
            .get_product(id)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    /// Overwrite a product's price and stock.
    /// Returns false (and changes nothing) if the product doesn't exist.
    pub async fn update_product(
        &self,
        id: ProductId,
        price_cents: Cents,
        quantity: i64,
    ) -> Result<bool, AppError> {
        validate_price(price_cents)?;
        validate_quantity(quantity)?;
        Ok(self.repo.update_product(id, price_cents, quantity).await?)
    }

    /// Overwrite a product's stock only.
    /// Returns false (and changes nothing) if the product doesn't exist.
    pub async fn set_quantity(&self, id: ProductId, quantity: i64) -> Result<bool, AppError> {
        validate_quantity(quantity)?;
        Ok(self.repo.set_quantity(id, quantity).await?)
    }

    /// Delete a product. Its past sales stay in the log with a dangling reference.
    /// Returns false if the product doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<bool, AppError> {
        Ok(self.repo.delete_product(id).await?)
    }

    // ========================
    // Sale operations
    // ========================

    /// Sell `quantity` units of a product.
    ///
    /// The stock check, the stock decrement and the sale record run in one
    /// transaction: either both writes are committed or neither is.
    pub async fn sell(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<SaleReceipt, AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation(format!(
                "Sale quantity must be positive, got {}",
                quantity
            )));
        }

        let mut tx = self.repo.begin().await?;

        let product = Repository::get_product_on(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        if !product.has_stock_for(quantity) {
            warn!(
                product_id,
                available = product.quantity,
                requested = quantity,
                "Sale rejected: insufficient stock"
            );
            return Err(AppError::InsufficientStock {
                product_id,
                name: product.name,
                available: product.quantity,
                requested: quantity,
            });
        }

        let total_cents = product.total_for(quantity).ok_or_else(|| {
            AppError::Validation(format!(
                "Sale total overflows for {} x {}",
                quantity, product.price_cents
            ))
        })?;
        let remaining_stock = product.quantity - quantity;

        Repository::set_quantity_on(&mut *tx, product_id, remaining_stock).await?;
        let mut sale = Sale::new(product_id, quantity, total_cents);
        Repository::save_sale_on(&mut *tx, &mut sale).await?;

        tx.commit().await.context("Failed to commit sale")?;

        info!(
            sale_id = sale.id,
            product_id,
            quantity,
            total_cents,
            remaining_stock,
            "Sale recorded"
        );

        Ok(SaleReceipt {
            sale,
            product_name: product.name,
            remaining_stock,
        })
    }

    /// The raw sale log in insertion order.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        Ok(self.repo.list_sales().await?)
    }

    /// All sales with current product names, newest first.
    pub async fn sales_summary(&self) -> Result<Vec<SaleSummary>, AppError> {
        Ok(self.repo.sales_summary().await?)
    }
}

fn validate_price(price_cents: Cents) -> Result<(), AppError> {
    if price_cents < 0 {
        return Err(AppError::Validation(format!(
            "Price cannot be negative, got {}",
            price_cents
        )));
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity < 0 {
        return Err(AppError::Validation(format!(
            "Quantity cannot be negative, got {}",
            quantity
        )));
    }
    Ok(())
}
