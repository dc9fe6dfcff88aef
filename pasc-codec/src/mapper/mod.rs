//! Float ↔ integer mappers.

mod lindstrom;
mod ordered;
mod raw;

pub use lindstrom::Lindstrom;
pub use ordered::{Ordered, NAN_STAND_IN_F32, NAN_STAND_IN_F64};
pub use raw::{Raw, RawBinary};

use pasc_core::{Buffer, DType, FloatArray, IntegerArray, Mapper, PascError};
use serde::{Deserialize, Serialize};

/// Mapper selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapperKind {
    #[default]
    Raw,
    RawBinary,
    Ordered,
    Lindstrom,
}

impl MapperKind {
    pub const ALL: [MapperKind; 4] = [
        MapperKind::Raw,
        MapperKind::RawBinary,
        MapperKind::Ordered,
        MapperKind::Lindstrom,
    ];

    fn mapper(&self) -> &'static dyn Mapper {
        match self {
            MapperKind::Raw => &Raw,
            MapperKind::RawBinary => &RawBinary,
            MapperKind::Ordered => &Ordered,
            MapperKind::Lindstrom => &Lindstrom,
        }
    }
}

impl Mapper for MapperKind {
    fn name(&self) -> &'static str {
        self.mapper().name()
    }

    fn integer_dtype(&self, float: DType) -> Result<DType, PascError> {
        self.mapper().integer_dtype(float)
    }

    fn map(&self, input: &FloatArray) -> Result<IntegerArray, PascError> {
        self.mapper().map(input)
    }

    fn revmap(&self, input: &IntegerArray) -> Result<FloatArray, PascError> {
        self.mapper().revmap(input)
    }
}

/// IEEE bit patterns of `input`, zero-extended, together with the float width.
fn float_patterns(stage: &str, input: &FloatArray) -> Result<(Vec<u64>, u32), PascError> {
    match input.buffer() {
        Buffer::F32(v) => Ok((v.iter().map(|x| x.to_bits() as u64).collect(), 32)),
        Buffer::F64(v) => Ok((v.iter().map(|x| x.to_bits()).collect(), 64)),
        other => Err(PascError::type_mismatch(stage, "float dtype", other.dtype())),
    }
}

fn floats_from_patterns(
    stage: &str,
    patterns: &[u64],
    width: u32,
    shape: &[usize],
) -> Result<FloatArray, PascError> {
    let buffer = match width {
        32 => Buffer::F32(patterns.iter().map(|&b| f32::from_bits(b as u32)).collect()),
        64 => Buffer::F64(patterns.iter().map(|&b| f64::from_bits(b)).collect()),
        other => {
            return Err(PascError::type_mismatch(
                stage,
                "32- or 64-bit integers",
                format!("{}-bit", other),
            ))
        }
    };
    FloatArray::new(buffer, shape.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch() {
        let input = FloatArray::flat(vec![1.25f32, -7.0, 0.0]).unwrap();
        for kind in MapperKind::ALL {
            let mapped = kind.map(&input).unwrap();
            assert_eq!(mapped.dtype(), kind.integer_dtype(DType::F32).unwrap());
            assert_eq!(kind.revmap(&mapped).unwrap(), input, "{}", kind.name());
        }
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&MapperKind::Lindstrom).unwrap();
        assert_eq!(json, "\"Lindstrom\"");
        let back: MapperKind = serde_json::from_str("\"RawBinary\"").unwrap();
        assert_eq!(back, MapperKind::RawBinary);
    }
}
