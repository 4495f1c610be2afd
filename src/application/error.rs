use thiserror::Error;

use crate::domain::{PriceError, ProductId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error(
        "Not enough stock for '{name}' (#{product_id}): have {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<PriceError> for AppError {
    fn from(err: PriceError) -> Self {
        AppError::Validation(err.to_string())
    }
}
