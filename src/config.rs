use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{EncodingError, Result};
use crate::positional::{
    encode_nd, encode_reference, GridPositionalEncoding, PositionalEncoding, SeqLength,
    SinusoidalPositionalEncoding,
};
use crate::utils::validate::{ensure_positive, split_embedding};
use crate::utils::EncodingType;

/// Configuration for a positional encoding table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingConfig {
    #[serde(default)]
    pub kind: EncodingType,
    pub seq_length: SeqLength, // one length, or one per spatial axis
    pub emb_dim: usize,        // total channels across all axes
    #[serde(default = "default_space_dim")]
    pub space_dim: usize, // 1 for sequences, 2 for images, 3 for volumes
}

fn default_space_dim() -> usize {
    1
}

impl EncodingConfig {
    pub fn new(
        kind: EncodingType,
        seq_length: impl Into<SeqLength>,
        emb_dim: usize,
        space_dim: usize,
    ) -> Self {
        Self {
            kind,
            seq_length: seq_length.into(),
            emb_dim,
            space_dim,
        }
    }

    /// Parses a JSON config. Malformed values such as `5.0` or `-3` for a
    /// length are rejected as invalid arguments.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EncodingError::invalid(format!("malformed encoding config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| EncodingError::invalid(format!("cannot serialize encoding config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("space_dim", self.space_dim)?;
        self.seq_length.resolve(self.space_dim)?;
        split_embedding(self.emb_dim, self.space_dim)?;

        if self.kind == EncodingType::Vanilla && self.space_dim != 1 {
            return Err(EncodingError::invalid(format!(
                "vanilla encoding supports space_dim 1 only, got {}",
                self.space_dim
            )));
        }
        Ok(())
    }

    /// Builds the batched table: `(1, L1, ..., Ln, emb_dim)`.
    pub fn encode(&self) -> Result<ArrayD<f32>> {
        self.validate()?;
        match self.kind {
            EncodingType::Auto => encode_nd(self.seq_length.clone(), self.emb_dim, self.space_dim),
            EncodingType::Vanilla => {
                let len = self.seq_length.resolve(1)?[0];
                Ok(encode_reference(len, self.emb_dim)?
                    .into_dyn()
                    .insert_axis(Axis(0)))
            }
        }
    }

    /// Boxed 1-D encoding for adding to `(batch, seq, dim)` embeddings.
    pub fn build_positional_encoding(&self) -> Result<Box<dyn PositionalEncoding>> {
        self.validate()?;
        if self.space_dim != 1 {
            return Err(EncodingError::invalid(format!(
                "1-D positional encoding needs space_dim 1, got {}",
                self.space_dim
            )));
        }
        let max_len = self.seq_length.resolve(1)?[0];
        Ok(Box::new(SinusoidalPositionalEncoding::new(
            self.kind,
            max_len,
            self.emb_dim,
        )?))
    }

    /// Grid encoding for adding to `(batch, L1, ..., Ln, emb_dim)` inputs.
    /// Only the auto schedule extends to grids.
    pub fn build_grid_encoding(&self) -> Result<GridPositionalEncoding> {
        self.validate()?;
        if self.kind != EncodingType::Auto {
            return Err(EncodingError::invalid(format!(
                "grid encoding needs the auto schedule, got {:?}",
                self.kind
            )));
        }
        GridPositionalEncoding::new(self.seq_length.clone(), self.emb_dim, self.space_dim)
    }
}
