//! Shared helpers for the encoders
pub mod enums;
pub mod validate;

pub use enums::*;
