use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingType {
    /// Geometric schedule anchored so the last pair spans a half-period
    Auto,
    /// Fixed base-10000 schedule (Vaswani et al., 2017)
    Vanilla,
}

impl Default for EncodingType {
    fn default() -> Self {
        Self::Auto
    }
}
