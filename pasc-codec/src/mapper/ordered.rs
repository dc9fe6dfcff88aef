use super::{float_patterns, floats_from_patterns};
use pasc_bits::mask;
use pasc_core::{Buffer, DType, FloatArray, IntegerArray, Mapper, PascError};
use tracing::debug;

/// Order-preserving map into unsigned integers.
///
/// Positive values and `+0.0` are offset by `2^(w-1)`; everything else is
/// complemented. The canonical positive NaN therefore decodes to a tiny
/// denormal ([`NAN_STAND_IN_F32`] / [`NAN_STAND_IN_F64`]), which `revmap`
/// turns back into NaN. Inputs that would be confused with that pattern are
/// rejected by `map`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ordered;

/// `5.8774704e-39`: what `revmap` sees for a mapped `f32` NaN.
pub const NAN_STAND_IN_F32: u64 = 0x003F_FFFF;
/// The `f64` counterpart of [`NAN_STAND_IN_F32`].
pub const NAN_STAND_IN_F64: u64 = 0x0007_FFFF_FFFF_FFFF;

fn stand_in(width: u32) -> u64 {
    if width == 32 {
        NAN_STAND_IN_F32
    } else {
        NAN_STAND_IN_F64
    }
}

fn canonical_nan(width: u32) -> u64 {
    if width == 32 {
        f32::NAN.to_bits() as u64
    } else {
        f64::NAN.to_bits()
    }
}

fn is_nan(bits: u64, width: u32) -> bool {
    let mantissa = if width == 32 { 23 } else { 52 };
    let exponent = mask(width - 1) & !mask(mantissa);
    bits & exponent == exponent && bits & mask(mantissa) != 0
}

fn forward(bits: u64, width: u32) -> u64 {
    let sign = 1u64 << (width - 1);
    if bits & sign == 0 && !is_nan(bits, width) {
        bits + sign
    } else {
        !bits & mask(width)
    }
}

fn backward(value: u64, width: u32) -> u64 {
    let sign = 1u64 << (width - 1);
    let value = value & mask(width);
    let bits = if value >= sign {
        value - sign
    } else {
        !value & mask(width)
    };
    if bits == stand_in(width) {
        canonical_nan(width)
    } else {
        bits
    }
}

impl Mapper for Ordered {
    fn name(&self) -> &'static str {
        "Ordered"
    }

    fn integer_dtype(&self, float: DType) -> Result<DType, PascError> {
        if !float.is_float() {
            return Err(PascError::type_mismatch("Ordered", "float dtype", float));
        }
        DType::unsigned_of_width(float.bits())
    }

    fn map(&self, input: &FloatArray) -> Result<IntegerArray, PascError> {
        let (patterns, width) = float_patterns("Ordered", input)?;
        let mapped = patterns
            .iter()
            .enumerate()
            .map(|(index, &bits)| {
                let value = forward(bits, width);
                if backward(value, width) != bits {
                    return Err(PascError::NonCanonicalValue { index, bits });
                }
                Ok(value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let buffer = Buffer::from_integer_bits(DType::unsigned_of_width(width)?, &mapped)?;
        IntegerArray::new(buffer, input.shape().to_vec())
    }

    fn revmap(&self, input: &IntegerArray) -> Result<FloatArray, PascError> {
        let width = input.bits();
        let values = input.buffer().integer_bits().ok_or_else(|| {
            PascError::type_mismatch("Ordered", "integer dtype", input.dtype())
        })?;
        let patterns: Vec<u64> = values.iter().map(|&v| backward(v, width)).collect();
        let substituted = patterns
            .iter()
            .filter(|&&bits| bits == canonical_nan(width))
            .count();
        if substituted > 0 {
            debug!(substituted, "Ordered: NaN stand-ins restored");
        }
        floats_from_patterns("Ordered", &patterns, width, input.shape())
    }
}
