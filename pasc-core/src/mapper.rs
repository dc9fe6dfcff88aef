use crate::array::{FloatArray, IntegerArray};
use crate::buffer::DType;
use crate::error::PascError;

/// Bijective transform between floats and same-width integers.
///
/// `revmap(map(x)) == x` for every value `map` accepts.
pub trait Mapper: Send + Sync {
    fn name(&self) -> &'static str;

    /// Integer dtype produced for inputs of `float`.
    fn integer_dtype(&self, float: DType) -> Result<DType, PascError>;

    fn map(&self, input: &FloatArray) -> Result<IntegerArray, PascError>;

    /// Accepts any integer dtype of the right width; the bits are what count.
    fn revmap(&self, input: &IntegerArray) -> Result<FloatArray, PascError>;
}
