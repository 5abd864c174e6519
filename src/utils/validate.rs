//! Argument checks shared by every encoder. All of them run before any
//! array is allocated.
use crate::error::{EncodingError, Result};

pub fn ensure_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(EncodingError::invalid(format!(
            "{} must be a positive integer, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Embedding sizes must hold whole sin/cos pairs
pub fn ensure_positive_even(name: &str, value: usize) -> Result<()> {
    if value == 0 || value % 2 != 0 {
        return Err(EncodingError::invalid(format!(
            "{} must be a positive even integer, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Splits `emb_dim` evenly across `space_dim` axes and checks each share is even.
pub fn split_embedding(emb_dim: usize, space_dim: usize) -> Result<usize> {
    ensure_positive("space_dim", space_dim)?;
    ensure_positive("emb_dim", emb_dim)?;
    if emb_dim % space_dim != 0 {
        return Err(EncodingError::invalid(format!(
            "emb_dim ({}) must be divisible by space_dim ({})",
            emb_dim, space_dim
        )));
    }
    let sub_dim = emb_dim / space_dim;
    if sub_dim % 2 != 0 {
        return Err(EncodingError::invalid(format!(
            "emb_dim / space_dim must be even for sin/cos pairs, got {}",
            sub_dim
        )));
    }
    Ok(sub_dim)
}
