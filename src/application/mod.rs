// Application layer - use cases over the repository.
// The CLI and the interactive menu both go through InventoryService.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
