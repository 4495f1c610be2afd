mod repository;

pub use repository::*;

/// SQL for the products and sales tables. Safe to run repeatedly.
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
