use crate::buffer::Element;
use num_traits::{PrimInt, WrappingAdd, WrappingSub};
use std::fmt;

/// Fixed-width integer the generic stages compute in.
///
/// Arithmetic wraps at the word width so that every stage stays bijective.
pub trait Word:
    PrimInt + WrappingAdd + WrappingSub + Element + Default + fmt::Debug + fmt::Display
{
    const BITS: u32;

    /// Raw bit pattern, zero-extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Inverse of [`Word::to_bits`]; bits above the width are dropped.
    fn from_bits(bits: u64) -> Self;

    /// `|self - other|` as an unsigned magnitude at word width.
    fn abs_diff_bits(self, other: Self) -> u64 {
        if self > other {
            self.wrapping_sub(&other).to_bits()
        } else {
            other.wrapping_sub(&self).to_bits()
        }
    }
}

macro_rules! impl_word {
    ($ty:ty, $unsigned:ty) => {
        impl Word for $ty {
            const BITS: u32 = <$ty>::BITS;

            #[inline]
            fn to_bits(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $unsigned as $ty
            }
        }
    };
}

impl_word!(i32, u32);
impl_word!(i64, u64);
impl_word!(u32, u32);
impl_word!(u64, u64);

/// Run `$body` with `$w` bound to the [`Word`] type matching `$dtype`.
///
/// Float dtypes yield [`PascError::TypeMismatch`](crate::PascError) tagged with `$stage`.
#[macro_export]
macro_rules! with_word {
    ($dtype:expr, $stage:expr, |$w:ident| $body:expr) => {{
        match $dtype {
            $crate::DType::I32 => {
                type $w = i32;
                $body
            }
            $crate::DType::I64 => {
                type $w = i64;
                $body
            }
            $crate::DType::U32 => {
                type $w = u32;
                $body
            }
            $crate::DType::U64 => {
                type $w = u64;
                $body
            }
            other => Err($crate::PascError::type_mismatch(
                $stage,
                "integer dtype",
                other,
            )),
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DType, PascError};

    #[test]
    fn test_bits_roundtrip_signed() {
        assert_eq!((-1i32).to_bits(), 0xFFFF_FFFF);
        assert_eq!(i32::from_bits(0xFFFF_FFFF), -1);
        assert_eq!(i64::from_bits(u64::MAX), -1);
        assert_eq!(u32::from_bits(0x1_0000_0001), 1);
    }

    #[test]
    fn test_abs_diff_spans_full_range() {
        assert_eq!(i32::MAX.abs_diff_bits(i32::MIN), u32::MAX as u64);
        assert_eq!(3u32.abs_diff_bits(10), 7);
        assert_eq!((-5i64).abs_diff_bits(5), 10);
    }

    fn width_of(dtype: DType) -> Result<u32, PascError> {
        with_word!(dtype, "test", |W| Ok(<W as Word>::BITS))
    }

    #[test]
    fn test_with_word_dispatch() {
        assert_eq!(width_of(DType::I32).unwrap(), 32);
        assert_eq!(width_of(DType::U64).unwrap(), 64);
        assert!(matches!(
            width_of(DType::F32),
            Err(PascError::TypeMismatch { .. })
        ));
    }
}
