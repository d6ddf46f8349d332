//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod product;
pub mod validation;

pub use product::{Product, ProductId, ProductInput};
pub use validation::ValidationError;
