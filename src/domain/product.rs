use serde::{Deserialize, Serialize};

use super::Cents;

pub type ProductId = i64;

/// A product on sale. Stock is the number of units currently available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in cents
    pub price_cents: Cents,
    /// Units in stock (never negative)
    pub quantity: i64,
}

impl Product {
    /// Create a new product. The identity is assigned by the repository on save.
    pub fn new(name: impl Into<String>, price_cents: Cents, quantity: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price_cents,
            quantity,
        }
    }

    /// Returns true if `requested` units can be taken from stock.
    pub fn has_stock_for(&self, requested: i64) -> bool {
        requested <= self.quantity
    }

    /// Price of `quantity` units at the current unit price, or `None` on overflow.
    pub fn total_for(&self, quantity: i64) -> Option<Cents> {
        self.price_cents.checked_mul(quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_is_unsaved() {
        let product = Product::new("Milk", 250, 10);
        assert_eq!(product.id, 0);
        assert_eq!(product.name, "Milk");
        assert_eq!(product.price_cents, 250);
        assert_eq!(product.quantity, 10);
    }

    #[test]
    fn test_has_stock_for() {
        let product = Product::new("Milk", 250, 10);
        assert!(product.has_stock_for(3));
        assert!(product.has_stock_for(10));
        assert!(!product.has_stock_for(11));
    }

    #[test]
    fn test_total_for() {
        let product = Product::new("Milk", 250, 10);
        assert_eq!(product.total_for(3), Some(750));
        assert_eq!(product.total_for(0), Some(0));

        let pricey = Product::new("Gold", i64::MAX, 1);
        assert_eq!(pricey.total_for(2), None);
    }
}
