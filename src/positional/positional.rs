use ndarray::Array3;

use crate::error::Result;

/// Trait for encodings applied to token embeddings
#[typetag::serde]
pub trait PositionalEncoding {
    /// Adds the encoding to input embeddings.
    /// Input shape: (batch_size, seq_len, embedding_dim)
    fn forward(&self, input: &Array3<f32>) -> Result<Array3<f32>>;

    /// Longest sequence the encoding covers
    fn max_len(&self) -> usize;

    fn dim(&self) -> usize;
}
