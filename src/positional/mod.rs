//! Positional encoding implementations
mod positional;
pub use positional::PositionalEncoding;

pub mod auto;
pub use auto::{auto_angle_rates, encode_1d};

pub mod grid;
pub use grid::{encode_nd, SeqLength};

pub mod vanilla;
pub use vanilla::{encode_reference, reference_angle_rates};

mod sinusoidal;
pub use sinusoidal::{GridPositionalEncoding, SinusoidalPositionalEncoding};
