mod money;
mod product;
mod sale;

pub use money::*;
pub use product::*;
pub use sale::*;
