use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnection, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::domain::{Cents, Product, ProductId, SALE_DATE_FORMAT, Sale, SaleSummary};

use super::MIGRATION_001_INITIAL;

const PRODUCT_COLUMNS: &str = "id, name, price_cents, quantity";
const SALE_COLUMNS: &str = "id, product_id, quantity_sold, total_cents, sale_date";

/// Repository for persisting and querying products and sales.
///
/// Most operations run directly on the pool. The `*_on` variants take an
/// explicit connection so several writes can share one transaction.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    /// The store is single-user, so the pool holds one connection.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database {}", database_url))?;
        Ok(Self::new(pool))
    }

    /// Create the products and sales tables if they don't exist yet.
    pub async fn create_schema(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to create schema")?;
        Ok(())
    }

    /// Connect and ensure the schema exists.
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Close the underlying pool. Later calls fail with a storage error.
    pub async fn close(&self) {
        debug!("Closing database");
        self.pool.close().await;
    }

    /// Start a transaction for grouping `*_on` calls.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    // ========================
    // Product operations
    // ========================

    /// Insert a new product and assign its identity.
    pub async fn save_product(&self, product: &mut Product) -> Result<()> {
        debug!(name = %product.name, price_cents = product.price_cents, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, quantity)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.quantity)
        .execute(&self.pool)
        .await
        .context("Failed to save product")?;

        product.id = result.last_insert_rowid();
        Ok(())
    }

    /// List all products ordered by identity.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list products")?;

        rows.iter().map(Self::row_to_product).collect()
    }

    /// Get a product by ID.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::get_product_on(&mut *conn, id).await
    }

    /// Get a product by ID on the given connection.
    pub async fn get_product_on(
        conn: &mut SqliteConnection,
        id: ProductId,
    ) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch product")?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    /// Overwrite price and quantity. Returns false if no such product exists.
    pub async fn update_product(
        &self,
        id: ProductId,
        price_cents: Cents,
        quantity: i64,
    ) -> Result<bool> {
        debug!(id, price_cents, quantity, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET price_cents = ?, quantity = ?
            WHERE id = ?
            "#,
        )
        .bind(price_cents)
        .bind(quantity)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update product")?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product. Sales referencing it are left untouched.
    /// Returns false if no such product exists.
    pub async fn delete_product(&self, id: ProductId) -> Result<bool> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete product")?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the stock level only. Returns false if no such product exists.
    pub async fn set_quantity(&self, id: ProductId, quantity: i64) -> Result<bool> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::set_quantity_on(&mut *conn, id, quantity).await
    }

    /// Overwrite the stock level on the given connection.
    pub async fn set_quantity_on(
        conn: &mut SqliteConnection,
        id: ProductId,
        quantity: i64,
    ) -> Result<bool> {
        debug!(id, quantity, "Setting stock");

        let result = sqlx::query("UPDATE products SET quantity = ? WHERE id = ?")
            .bind(quantity)
            .bind(id)
            .execute(&mut *conn)
            .await
            .context("Failed to update product quantity")?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_product(row: &SqliteRow) -> Result<Product> {
        Ok(Product {
            id: row.try_get("id").context("Invalid product id")?,
            name: row.try_get("name").context("Invalid product name")?,
            price_cents: row.try_get("price_cents").context("Invalid product price")?,
            quantity: row.try_get("quantity").context("Invalid product quantity")?,
        })
    }

    // ========================
    // Sale operations
    // ========================

    /// Append a sale stamped with the current local time.
    pub async fn record_sale(
        &self,
        product_id: ProductId,
        quantity_sold: i64,
        total_cents: Cents,
    ) -> Result<Sale> {
        anyhow::ensure!(
            quantity_sold > 0,
            "Sale quantity must be positive, got {}",
            quantity_sold
        );

        let mut sale = Sale::new(product_id, quantity_sold, total_cents);
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::save_sale_on(&mut *conn, &mut sale).await?;
        Ok(sale)
    }

    /// Append a sale on the given connection and assign its identity.
    pub async fn save_sale_on(conn: &mut SqliteConnection, sale: &mut Sale) -> Result<()> {
        debug!(
            product_id = sale.product_id,
            quantity_sold = sale.quantity_sold,
            total_cents = sale.total_cents,
            "Recording sale"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO sales (product_id, quantity_sold, total_cents, sale_date)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(sale.product_id)
        .bind(sale.quantity_sold)
        .bind(sale.total_cents)
        .bind(sale.sale_date_string())
        .execute(&mut *conn)
        .await
        .context("Failed to record sale")?;

        sale.id = result.last_insert_rowid();
        Ok(())
    }

    /// List the raw sale log in insertion order.
    pub async fn list_sales(&self) -> Result<Vec<Sale>> {
        let rows = sqlx::query(&format!("SELECT {} FROM sales ORDER BY id", SALE_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list sales")?;

        rows.iter().map(Self::row_to_sale).collect()
    }

    /// All sales joined with the current product name, newest first.
    /// Sales recorded within the same second keep their insertion order, latest first.
    pub async fn sales_summary(&self) -> Result<Vec<SaleSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id AS sale_id, s.product_id, p.name AS product_name,
                   s.quantity_sold, s.total_cents, s.sale_date
            FROM sales s
            LEFT JOIN products p ON p.id = s.product_id
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch sales summary")?;

        debug!(count = rows.len(), "Sales summary fetched");

        rows.iter().map(Self::row_to_summary).collect()
    }

    fn row_to_summary(row: &SqliteRow) -> Result<SaleSummary> {
        let sale_date: String = row.try_get("sale_date")?;
        Ok(SaleSummary {
            sale_id: row.try_get("sale_id")?,
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            quantity_sold: row.try_get("quantity_sold")?,
            total_cents: row.try_get("total_cents")?,
            sale_date: parse_sale_date(&sale_date)?,
        })
    }

    fn row_to_sale(row: &SqliteRow) -> Result<Sale> {
        let sale_date: String = row.try_get("sale_date")?;
        Ok(Sale {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            quantity_sold: row.try_get("quantity_sold")?,
            total_cents: row.try_get("total_cents")?,
            sale_date: parse_sale_date(&sale_date)?,
        })
    }
}

fn parse_sale_date(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, SALE_DATE_FORMAT)
        .with_context(|| format!("Invalid sale_date timestamp: {}", value))
}
