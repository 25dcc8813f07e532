//! Domain models with validation at construction
//!
//! Invalid input returns a `WishError`, not a panic.

pub mod validation;
pub mod wish;

pub use validation::{OwnerEmail, WishTitle};
pub use wish::{store_now, NewWish, Wish, WishStats};
