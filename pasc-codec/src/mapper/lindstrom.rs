use super::{float_patterns, floats_from_patterns};
use pasc_bits::mask;
use pasc_core::{Buffer, DType, FloatArray, IntegerArray, Mapper, PascError};

/// Order-preserving map after Lindstrom and Isenburg: negative values are
/// fully inverted, non-negative values get their sign bit flipped.
///
/// Bijective on every bit pattern, NaNs included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lindstrom;

fn forward(bits: u64, width: u32) -> u64 {
    let sign = 1u64 << (width - 1);
    if bits & sign != 0 {
        !bits & mask(width)
    } else {
        bits ^ sign
    }
}

fn backward(value: u64, width: u32) -> u64 {
    let sign = 1u64 << (width - 1);
    if value & sign != 0 {
        value ^ sign
    } else {
        !value & mask(width)
    }
}

impl Mapper for Lindstrom {
    fn name(&self) -> &'static str {
        "Lindstrom"
    }

    fn integer_dtype(&self, float: DType) -> Result<DType, PascError> {
        if !float.is_float() {
            return Err(PascError::type_mismatch("Lindstrom", "float dtype", float));
        }
        DType::unsigned_of_width(float.bits())
    }

    fn map(&self, input: &FloatArray) -> Result<IntegerArray, PascError> {
        let (patterns, width) = float_patterns("Lindstrom", input)?;
        let mapped: Vec<u64> = patterns.iter().map(|&b| forward(b, width)).collect();
        let buffer = Buffer::from_integer_bits(DType::unsigned_of_width(width)?, &mapped)?;
        IntegerArray::new(buffer, input.shape().to_vec())
    }

    fn revmap(&self, input: &IntegerArray) -> Result<FloatArray, PascError> {
        let width = input.bits();
        let values = input.buffer().integer_bits().ok_or_else(|| {
            PascError::type_mismatch("Lindstrom", "integer dtype", input.dtype())
        })?;
        let patterns: Vec<u64> = values.iter().map(|&v| backward(v, width)).collect();
        floats_from_patterns("Lindstrom", &patterns, width, input.shape())
    }
}
