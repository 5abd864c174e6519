use ndarray::{s, Array2, Array3, ArrayD};
use serde::{Deserialize, Serialize};

use crate::error::{EncodingError, Result};
use crate::positional::{encode_1d, encode_nd, encode_reference, PositionalEncoding, SeqLength};
use crate::utils::EncodingType;

/// Serialized form of [`SinusoidalPositionalEncoding`]. The table itself is
/// rebuilt on load so it always matches `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinusoidalParams {
    pub kind: EncodingType,
    pub max_len: usize,
    pub d_model: usize,
}

/// Precomputed sinusoidal table for sequences up to `max_len`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SinusoidalParams", into = "SinusoidalParams")]
pub struct SinusoidalPositionalEncoding {
    kind: EncodingType,
    encoding: Array2<f32>,
}

impl SinusoidalPositionalEncoding {
    /// The auto schedule is anchored on `max_len`, so shorter inputs read a
    /// prefix of this table rather than a table of their own length.
    pub fn new(kind: EncodingType, max_len: usize, d_model: usize) -> Result<Self> {
        let encoding = match kind {
            EncodingType::Auto => encode_1d(max_len, d_model)?,
            EncodingType::Vanilla => encode_reference(max_len, d_model)?,
        };
        Ok(Self { kind, encoding })
    }

    pub fn kind(&self) -> EncodingType {
        self.kind
    }

    pub fn encoding(&self) -> &Array2<f32> {
        &self.encoding
    }
}

impl TryFrom<SinusoidalParams> for SinusoidalPositionalEncoding {
    type Error = EncodingError;

    fn try_from(params: SinusoidalParams) -> Result<Self> {
        Self::new(params.kind, params.max_len, params.d_model)
    }
}

impl From<SinusoidalPositionalEncoding> for SinusoidalParams {
    fn from(pe: SinusoidalPositionalEncoding) -> Self {
        Self {
            kind: pe.kind,
            max_len: pe.encoding.nrows(),
            d_model: pe.encoding.ncols(),
        }
    }
}

#[typetag::serde]
impl PositionalEncoding for SinusoidalPositionalEncoding {
    fn forward(&self, input: &Array3<f32>) -> Result<Array3<f32>> {
        let (_, seq_len, dim) = input.dim();
        if dim != self.dim() {
            return Err(EncodingError::DimensionMismatch(format!(
                "Input dimension {} doesn't match encoding dimension {}",
                dim,
                self.dim()
            )));
        }
        if seq_len > self.max_len() {
            return Err(EncodingError::DimensionMismatch(format!(
                "Sequence length {} exceeds maximum length {}",
                seq_len,
                self.max_len()
            )));
        }

        let encoding = self.encoding.slice(s![..seq_len, ..]);
        let mut output = input.to_owned();
        for mut batch in output.outer_iter_mut() {
            batch += &encoding;
        }

        Ok(output)
    }

    fn max_len(&self) -> usize {
        self.encoding.nrows()
    }

    fn dim(&self) -> usize {
        self.encoding.ncols()
    }
}

/// Serialized form of [`GridPositionalEncoding`]: one length per axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridParams {
    pub seq_length: Vec<usize>,
    pub emb_dim: usize,
}

/// Grid encoding for `(batch, L1, ..., Ln, emb_dim)` inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridParams", into = "GridParams")]
pub struct GridPositionalEncoding {
    lengths: Vec<usize>,
    emb_dim: usize,
    encoding: ArrayD<f32>,
}

impl GridPositionalEncoding {
    pub fn new(
        seq_length: impl Into<SeqLength>,
        emb_dim: usize,
        space_dim: usize,
    ) -> Result<Self> {
        let lengths = seq_length.into().resolve(space_dim)?;
        let encoding = encode_nd(lengths.clone(), emb_dim, space_dim)?;
        Ok(Self {
            lengths,
            emb_dim,
            encoding,
        })
    }

    pub fn space_dim(&self) -> usize {
        self.lengths.len()
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn encoding(&self) -> &ArrayD<f32> {
        &self.encoding
    }

    /// Adds the encoding to every batch entry of `input`.
    pub fn forward(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        if input.ndim() != self.encoding.ndim()
            || input.shape()[1..] != self.encoding.shape()[1..]
        {
            return Err(EncodingError::DimensionMismatch(format!(
                "Input shape {:?} doesn't match encoding shape {:?}",
                input.shape(),
                self.encoding.shape()
            )));
        }
        Ok(input + &self.encoding)
    }
}

impl TryFrom<GridParams> for GridPositionalEncoding {
    type Error = EncodingError;

    fn try_from(params: GridParams) -> Result<Self> {
        let space_dim = params.seq_length.len();
        Self::new(params.seq_length, params.emb_dim, space_dim)
    }
}

impl From<GridPositionalEncoding> for GridParams {
    fn from(grid: GridPositionalEncoding) -> Self {
        Self {
            seq_length: grid.lengths,
            emb_dim: grid.emb_dim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array3, ArrayD, Axis, IxDyn};

    #[test]
    fn test_forward_adds_encoding() {
        let pe = SinusoidalPositionalEncoding::new(EncodingType::Auto, 16, 8).unwrap();
        let input = Array3::<f32>::ones((2, 10, 8));
        let output = pe.forward(&input).unwrap();

        assert_eq!(output.shape(), &[2, 10, 8]);
        for b in 0..2 {
            for t in 0..10 {
                for j in 0..8 {
                    let expected = 1.0 + pe.encoding()[[t, j]];
                    assert_abs_diff_eq!(output[[b, t, j]], expected, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_vanilla_table() {
        let pe = SinusoidalPositionalEncoding::new(EncodingType::Vanilla, 4, 2).unwrap();
        assert_eq!(pe.kind(), EncodingType::Vanilla);
        assert_abs_diff_eq!(pe.encoding()[[1, 0]], 1f32.sin(), epsilon = 1e-6);
    }

    #[test]
    fn test_forward_rejects_mismatched_input() {
        let pe = SinusoidalPositionalEncoding::new(EncodingType::Auto, 4, 8).unwrap();
        let too_long = Array3::<f32>::zeros((1, 5, 8));
        let wrong_dim = Array3::<f32>::zeros((1, 4, 6));
        assert!(matches!(pe.forward(&too_long), Err(EncodingError::DimensionMismatch(_))));
        assert!(matches!(pe.forward(&wrong_dim), Err(EncodingError::DimensionMismatch(_))));
    }

    #[test]
    fn test_boxed_encoding_serializes() {
        let pe: Box<dyn PositionalEncoding> =
            Box::new(SinusoidalPositionalEncoding::new(EncodingType::Auto, 3, 4).unwrap());
        let json = serde_json::to_string(&pe).unwrap();
        let restored: Box<dyn PositionalEncoding> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.max_len(), 3);
        assert_eq!(restored.dim(), 4);
        let zeros = Array3::<f32>::zeros((1, 3, 4));
        assert_eq!(restored.forward(&zeros).unwrap(), pe.forward(&zeros).unwrap());
    }

    #[test]
    fn test_deserialize_rebuilds_table_for_kind() {
        let json = r#"{"kind": "vanilla", "max_len": 5, "d_model": 4}"#;
        let pe: SinusoidalPositionalEncoding = serde_json::from_str(json).unwrap();
        assert_eq!(pe.encoding(), &encode_reference(5, 4).unwrap());
    }

    #[test]
    fn test_deserialize_rejects_invalid_tables() {
        // odd channel count
        let odd = r#"{"kind": "auto", "max_len": 5, "d_model": 3}"#;
        assert!(serde_json::from_str::<SinusoidalPositionalEncoding>(odd).is_err());
        // raw tables are not accepted
        let raw = r#"{"kind": "auto", "encoding": {"v": 1, "dim": [1, 2], "data": [0.0, 1.0]}}"#;
        assert!(serde_json::from_str::<SinusoidalPositionalEncoding>(raw).is_err());
    }

    #[test]
    fn test_grid_forward_broadcasts_over_batch() {
        let grid = GridPositionalEncoding::new((3, 4), 8, 2).unwrap();
        assert_eq!(grid.space_dim(), 2);
        assert_eq!(grid.lengths(), &[3, 4]);

        let input = ArrayD::<f32>::zeros(IxDyn(&[5, 3, 4, 8]));
        let output = grid.forward(&input).unwrap();
        assert_eq!(output.shape(), &[5, 3, 4, 8]);
        let table = grid.encoding().index_axis(Axis(0), 0);
        for b in 0..5 {
            assert_eq!(output.index_axis(Axis(0), b), table);
        }

        let wrong = ArrayD::<f32>::zeros(IxDyn(&[5, 4, 3, 8]));
        assert!(grid.forward(&wrong).is_err());
    }

    #[test]
    fn test_grid_serde_round_trip() {
        let grid = GridPositionalEncoding::new(vec![2, 3, 4], 12, 3).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let restored: GridPositionalEncoding = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.space_dim(), 3);
        assert_eq!(restored.encoding(), grid.encoding());
    }

    #[test]
    fn test_grid_deserialize_rejects_flat_tables() {
        let flat = r#"{"encoding": {"v": 1, "dim": [2], "data": [0.0, 1.0]}}"#;
        assert!(serde_json::from_str::<GridPositionalEncoding>(flat).is_err());

        let no_axes = r#"{"seq_length": [], "emb_dim": 4}"#;
        assert!(serde_json::from_str::<GridPositionalEncoding>(no_axes).is_err());
        let odd_share = r#"{"seq_length": [4, 4], "emb_dim": 6}"#;
        assert!(serde_json::from_str::<GridPositionalEncoding>(odd_share).is_err());
    }
}
