// Export of inventory and sales data to CSV and JSON.

mod export;

pub use export::*;
