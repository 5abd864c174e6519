//! Sinusoidal positional encodings.
//!
//! [`positional::encode_1d`] derives a geometric frequency schedule whose last
//! sin/cos pair spans exactly half a period over the sequence, and
//! [`positional::encode_nd`] composes it per axis into grid and volume
//! encodings. [`positional::encode_reference`] is the classical fixed-base
//! schedule.
pub mod config;
pub use config::EncodingConfig;

pub mod error;
pub use error::{EncodingError, Result};

pub mod positional;
pub use positional::{
    auto_angle_rates, encode_1d, encode_nd, encode_reference, reference_angle_rates,
    GridPositionalEncoding, PositionalEncoding, SeqLength, SinusoidalPositionalEncoding,
};

pub mod utils;
pub use utils::EncodingType;
