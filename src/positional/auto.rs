//! Sinusoidal encoding with automatically scaled frequencies.
//!
//! The schedule is geometric across channel pairs and anchored so that the
//! last sin/cos pair covers exactly half a period over the sequence:
//! `cos` reads `1` at position `0` and `-1` at position `seq_len - 1`.
//!
//! ```text
//! expo      = 1 - 2 / d_model
//! auto_rate = (PI / (seq_len - 1)) ^ (-1 / expo)
//! rate(i)   = auto_rate ^ (-2 * floor(i / 2) / d_model)
//! ```
use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::Result;
use crate::utils::validate::{ensure_positive, ensure_positive_even};

/// Phase swept by the last pair between the first and last position.
pub const HALF_PERIOD: f64 = PI;

/// Per-channel angle rates of the auto-scaled schedule, in double precision.
///
/// Both channels of a pair share one rate. With a single position every
/// angle is zero, so the rates are returned as zeros.
pub fn auto_angle_rates(seq_len: usize, d_model: usize) -> Result<Array1<f64>> {
    ensure_positive("seq_len", seq_len)?;
    ensure_positive_even("d_model", d_model)?;

    if seq_len == 1 {
        return Ok(Array1::zeros(d_model));
    }
    Ok(angle_rates(seq_len, d_model))
}

fn angle_rates(seq_len: usize, d_model: usize) -> Array1<f64> {
    let lm1 = (seq_len - 1) as f64;
    let last_rate = HALF_PERIOD / lm1;

    // A single pair is pinned directly by the half-period constraint.
    if d_model == 2 {
        return Array1::from_elem(2, last_rate);
    }

    let d = d_model as f64;
    let expo = 1.0 - 2.0 / d;
    let auto_rate = last_rate.powf(-1.0 / expo);
    debug!(seq_len, d_model, auto_rate, "derived auto-scaled decay base");

    Array1::from_shape_fn(d_model, |i| {
        let pair = (i / 2) as f64;
        auto_rate.powf(-(2.0 * pair) / d)
    })
}

/// 1-D positional encoding of shape `(seq_len, d_model)`.
///
/// Even channels hold `sin(p * rate)`, odd channels `cos(p * rate)`.
/// Everything is computed in `f64` and cast to `f32` on the way out.
/// A single-position sequence yields an all-zero row.
pub fn encode_1d(seq_len: usize, d_model: usize) -> Result<Array2<f32>> {
    ensure_positive("seq_len", seq_len)?;
    ensure_positive_even("d_model", d_model)?;

    if seq_len == 1 {
        return Ok(Array2::zeros((1, d_model)));
    }

    let rates = angle_rates(seq_len, d_model);
    let encoding = Array2::from_shape_fn((seq_len, d_model), |(pos, i)| {
        let angle = pos as f64 * rates[i];
        let value = if i % 2 == 0 { angle.sin() } else { angle.cos() };
        value as f32
    });

    debug!(seq_len, d_model, "built auto-scaled positional encoding");
    Ok(encoding)
}
