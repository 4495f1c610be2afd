use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::{Cents, ProductId};

pub type SaleId = i64;

/// Storage and display format of sale timestamps.
pub const SALE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A recorded sale. Sales are immutable and only ever appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// Product sold. May point at a product that has since been deleted.
    pub product_id: ProductId,
    pub quantity_sold: i64,
    /// Unit price at the time of sale times `quantity_sold`
    pub total_cents: Cents,
    /// Local wall-clock time, second resolution
    pub sale_date: NaiveDateTime,
}

impl Sale {
    /// Create a new sale stamped with the current local time.
    /// The identity is assigned by the repository on save.
    ///
    /// # Panics
    ///
    /// Panics if `quantity_sold` is not positive. Callers taking untrusted
    /// input check it first, as `Repository::record_sale` and
    /// `InventoryService::sell` do.
    pub fn new(product_id: ProductId, quantity_sold: i64, total_cents: Cents) -> Self {
        assert!(quantity_sold > 0, "Sale quantity must be positive");
        Self {
            id: 0,
            product_id,
            quantity_sold,
            total_cents,
            sale_date: now_to_second(),
        }
    }

    pub fn with_sale_date(mut self, sale_date: NaiveDateTime) -> Self {
        self.sale_date = sale_date;
        self
    }

    pub fn sale_date_string(&self) -> String {
        self.sale_date.format(SALE_DATE_FORMAT).to_string()
    }
}

/// A sale joined with the product's current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSummary {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    /// `None` when the product has been deleted since the sale
    pub product_name: Option<String>,
    pub quantity_sold: i64,
    pub total_cents: Cents,
    pub sale_date: NaiveDateTime,
}

fn now_to_second() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
