use crate::array::ResidualArray;
use crate::coded::Coded;
use crate::error::PascError;

/// Lossless residual codec.
pub trait Encoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn encode(&self, residual: &ResidualArray, start: usize) -> Result<Coded, PascError>;

    /// Rebuilds the residual as unsigned words of `coded.bits()` width.
    fn decode(&self, coded: &Coded) -> Result<ResidualArray, PascError>;
}
