//! N-dimensional encodings built from per-axis 1-D encodings.
//!
//! Each of the `space_dim` axes gets `emb_dim / space_dim` channels. Axis `a`
//! owns channels `[a * sub_dim, (a + 1) * sub_dim)`, which vary along axis `a`
//! only and repeat across every other axis.
use ndarray::{concatenate, ArrayD, ArrayViewD, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{EncodingError, Result};
use crate::positional::auto::encode_1d;
use crate::utils::validate::{ensure_positive, split_embedding};

/// Sequence length for every spatial axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeqLength {
    /// Same length replicated across all axes
    Uniform(usize),
    /// One length per axis
    PerAxis(Vec<usize>),
}

impl SeqLength {
    /// Expands into exactly `space_dim` positive axis lengths.
    pub fn resolve(&self, space_dim: usize) -> Result<Vec<usize>> {
        match self {
            SeqLength::Uniform(len) => {
                ensure_positive("seq_length", *len)?;
                Ok(vec![*len; space_dim])
            }
            SeqLength::PerAxis(lengths) => {
                if lengths.len() != space_dim {
                    return Err(EncodingError::invalid(format!(
                        "seq_length has {} axes but space_dim is {}",
                        lengths.len(),
                        space_dim
                    )));
                }
                if let Some(bad) = lengths.iter().position(|&len| len == 0) {
                    return Err(EncodingError::invalid(format!(
                        "all seq_length elements must be positive, axis {} is 0",
                        bad
                    )));
                }
                Ok(lengths.clone())
            }
        }
    }
}

impl From<usize> for SeqLength {
    fn from(len: usize) -> Self {
        SeqLength::Uniform(len)
    }
}

impl From<Vec<usize>> for SeqLength {
    fn from(lengths: Vec<usize>) -> Self {
        SeqLength::PerAxis(lengths)
    }
}

impl From<&[usize]> for SeqLength {
    fn from(lengths: &[usize]) -> Self {
        SeqLength::PerAxis(lengths.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for SeqLength {
    fn from(lengths: [usize; N]) -> Self {
        SeqLength::PerAxis(lengths.to_vec())
    }
}

impl From<(usize, usize)> for SeqLength {
    fn from((h, w): (usize, usize)) -> Self {
        SeqLength::PerAxis(vec![h, w])
    }
}

impl From<(usize, usize, usize)> for SeqLength {
    fn from((d, h, w): (usize, usize, usize)) -> Self {
        SeqLength::PerAxis(vec![d, h, w])
    }
}

/// N-D positional encoding of shape `(1, L1, ..., L_space_dim, emb_dim)`.
///
/// # Arguments
/// * `seq_length` - one length for all axes, or one per axis
/// * `emb_dim` - total channels, divisible by `space_dim` into even shares
/// * `space_dim` - number of spatial axes (2 for images, 3 for volumes)
pub fn encode_nd(
    seq_length: impl Into<SeqLength>,
    emb_dim: usize,
    space_dim: usize,
) -> Result<ArrayD<f32>> {
    ensure_positive("space_dim", space_dim)?;
    let lengths = seq_length.into().resolve(space_dim)?;
    let sub_dim = split_embedding(emb_dim, space_dim)?;

    let mut full_shape = lengths.clone();
    full_shape.push(sub_dim);

    let mut per_axis = Vec::with_capacity(space_dim);
    for (axis, &len) in lengths.iter().enumerate() {
        let pe = encode_1d(len, sub_dim)?;

        // (1, ..., len at `axis`, ..., 1, sub_dim)
        let mut shape = vec![1; space_dim + 1];
        shape[axis] = len;
        shape[space_dim] = sub_dim;
        trace!(axis, len, ?shape, "reshaped axis encoding");

        per_axis.push(pe.into_shape_with_order(IxDyn(&shape))?);
    }

    let views = per_axis
        .iter()
        .map(|pe| {
            pe.broadcast(IxDyn(&full_shape)).ok_or_else(|| {
                EncodingError::DimensionMismatch(format!(
                    "cannot broadcast {:?} to {:?}",
                    pe.shape(),
                    full_shape
                ))
            })
        })
        .collect::<Result<Vec<ArrayViewD<f32>>>>()?;

    let encoding = concatenate(Axis(space_dim), &views)?.insert_axis(Axis(0));
    debug!(shape = ?encoding.shape(), emb_dim, space_dim, "built grid positional encoding");
    Ok(encoding)
}
