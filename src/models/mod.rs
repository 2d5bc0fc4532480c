//! Data models supplied by the caller.

pub mod contact;

pub use contact::ContactRecord;
