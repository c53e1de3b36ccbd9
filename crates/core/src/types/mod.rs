//! Core value types for Pantry.
//!
//! Type-safe wrappers for ids, emails, amounts and difficulty levels.

pub mod difficulty;
pub mod email;
pub mod id;
pub mod quantity;

pub use difficulty::{Difficulty, UnknownDifficulty};
pub use email::{Email, EmailError};
pub use id::*;
pub use quantity::{Quantity, QuantityError};
