// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use stockbook::application::InventoryService;
use stockbook::domain::Product;
use stockbook::storage::Repository;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(InventoryService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = InventoryService::open(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a bare repository with a temporary database
pub async fn test_repository() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let repo = Repository::init(&format!("sqlite:{}?mode=rwc", db_path.display())).await?;
    Ok((repo, temp_dir))
}

/// Test fixture: a small grocery catalog
pub struct StandardProducts;

impl StandardProducts {
    /// Milk 2.50 x 10, Bread 1.20 x 5, Eggs 3.00 x 0
    pub async fn create(service: &InventoryService) -> Result<Vec<Product>> {
        Ok(vec![
            service.add_product("Milk", 250, 10).await?,
            service.add_product("Bread", 120, 5).await?,
            service.add_product("Eggs", 300, 0).await?,
        ])
    }
}
