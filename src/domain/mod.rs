//! Domain value objects and types.
//!
//! Phone numbers are the one piece of contact data that must be validated before
//! anything is sent; everything else is passed through as the caller supplied it.

pub mod phone;

pub use phone::{mask_phone_number, normalize, NormalizedNumber};
