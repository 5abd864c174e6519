use ndarray::ShapeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),
}

impl EncodingError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        EncodingError::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EncodingError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, EncodingError>;
