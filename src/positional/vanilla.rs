use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::Result;
use crate::utils::validate::{ensure_positive, ensure_positive_even};

/// Fixed base of the classical schedule
pub const BASE: f64 = 10000.0;

/// Per-channel rates `BASE ^ (-2j / emb_dim)` with `j = floor(i / 2)`
pub fn reference_angle_rates(emb_dim: usize) -> Result<Array1<f64>> {
    ensure_positive_even("emb_dim", emb_dim)?;
    Ok(rates(emb_dim))
}

fn rates(emb_dim: usize) -> Array1<f64> {
    let d = emb_dim as f64;
    Array1::from_shape_fn(emb_dim, |i| {
        let pair = (i / 2) as f64;
        1.0 / BASE.powf((2.0 * pair) / d)
    })
}

/// Classical sinusoidal positional encoding (Vaswani et al., 2017).
///
/// Shape `(seq_length, emb_dim)`; even channels are sine, odd are cosine.
pub fn encode_reference(seq_length: usize, emb_dim: usize) -> Result<Array2<f32>> {
    ensure_positive("seq_length", seq_length)?;
    ensure_positive_even("emb_dim", emb_dim)?;

    let rates = rates(emb_dim);
    let encoding = Array2::from_shape_fn((seq_length, emb_dim), |(pos, i)| {
        let angle = pos as f64 * rates[i];
        let value = if i % 2 == 0 { angle.sin() } else { angle.cos() };
        value as f32
    });

    debug!(seq_length, emb_dim, "built reference positional encoding");
    Ok(encoding)
}
