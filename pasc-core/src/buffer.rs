use crate::error::PascError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    F32,
    F64,
    I32,
    I64,
    U32,
    U64,
}

impl DType {
    pub fn bits(&self) -> u32 {
        match self {
            DType::F32 | DType::I32 | DType::U32 => 32,
            DType::F64 | DType::I64 | DType::U64 => 64,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Float dtype of the given width.
    pub fn float_of_width(bits: u32) -> Result<Self, PascError> {
        match bits {
            32 => Ok(DType::F32),
            64 => Ok(DType::F64),
            other => Err(PascError::UnsupportedBitWidth(other)),
        }
    }

    /// Unsigned integer dtype of the given width.
    pub fn unsigned_of_width(bits: u32) -> Result<Self, PascError> {
        match bits {
            32 => Ok(DType::U32),
            64 => Ok(DType::U64),
            other => Err(PascError::UnsupportedBitWidth(other)),
        }
    }

    /// Signed integer dtype of the given width.
    pub fn signed_of_width(bits: u32) -> Result<Self, PascError> {
        match bits {
            32 => Ok(DType::I32),
            64 => Ok(DType::I64),
            other => Err(PascError::UnsupportedBitWidth(other)),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
        };
        f.write_str(name)
    }
}

/// Flat, typed numeric storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

impl Buffer {
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
            Buffer::I32(_) => DType::I32,
            Buffer::I64(_) => DType::I64,
            Buffer::U32(_) => DType::U32,
            Buffer::U64(_) => DType::U64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(v) => v.len(),
            Buffer::F64(v) => v.len(),
            Buffer::I32(v) => v.len(),
            Buffer::I64(v) => v.len(),
            Buffer::U32(v) => v.len(),
            Buffer::U64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the payload in bytes.
    pub fn nbytes(&self) -> usize {
        self.len() * (self.dtype().bits() as usize / 8)
    }

    /// Raw bit patterns of an integer buffer, zero-extended to 64 bits.
    pub fn integer_bits(&self) -> Option<Vec<u64>> {
        match self {
            Buffer::I32(v) => Some(v.iter().map(|&x| x as u32 as u64).collect()),
            Buffer::I64(v) => Some(v.iter().map(|&x| x as u64).collect()),
            Buffer::U32(v) => Some(v.iter().map(|&x| x as u64).collect()),
            Buffer::U64(v) => Some(v.clone()),
            Buffer::F32(_) | Buffer::F64(_) => None,
        }
    }

    /// Rebuild an integer buffer of `dtype` from raw bit patterns.
    ///
    /// Bits above the dtype width are dropped.
    pub fn from_integer_bits(dtype: DType, bits: &[u64]) -> Result<Buffer, PascError> {
        Ok(match dtype {
            DType::I32 => Buffer::I32(bits.iter().map(|&b| b as u32 as i32).collect()),
            DType::I64 => Buffer::I64(bits.iter().map(|&b| b as i64).collect()),
            DType::U32 => Buffer::U32(bits.iter().map(|&b| b as u32).collect()),
            DType::U64 => Buffer::U64(bits.to_vec()),
            other => {
                return Err(PascError::type_mismatch(
                    "Buffer",
                    "integer dtype",
                    other,
                ))
            }
        })
    }

    /// Reinterpret an integer buffer as another integer dtype of the same width.
    pub fn cast_bits(&self, dtype: DType) -> Result<Buffer, PascError> {
        if dtype == self.dtype() {
            return Ok(self.clone());
        }
        match self.integer_bits() {
            Some(bits) if dtype.is_integer() && dtype.bits() == self.dtype().bits() => {
                Buffer::from_integer_bits(dtype, &bits)
            }
            _ => Err(PascError::type_mismatch(
                "Buffer",
                format!("{}-bit integer dtype", self.dtype().bits()),
                dtype,
            )),
        }
    }

    /// Copy of the elements at `indices`, in that order.
    pub fn gather(&self, indices: &[usize]) -> Buffer {
        fn pick<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i]).collect()
        }
        match self {
            Buffer::F32(v) => Buffer::F32(pick(v, indices)),
            Buffer::F64(v) => Buffer::F64(pick(v, indices)),
            Buffer::I32(v) => Buffer::I32(pick(v, indices)),
            Buffer::I64(v) => Buffer::I64(pick(v, indices)),
            Buffer::U32(v) => Buffer::U32(pick(v, indices)),
            Buffer::U64(v) => Buffer::U64(pick(v, indices)),
        }
    }

    /// Inverse of [`Buffer::gather`]: element `k` lands at `indices[k]`.
    ///
    /// `indices` must be a permutation of `0..len`.
    pub fn scatter(&self, indices: &[usize]) -> Buffer {
        fn place<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
            let mut out = values.to_vec();
            for (&v, &i) in values.iter().zip(indices) {
                out[i] = v;
            }
            out
        }
        match self {
            Buffer::F32(v) => Buffer::F32(place(v, indices)),
            Buffer::F64(v) => Buffer::F64(place(v, indices)),
            Buffer::I32(v) => Buffer::I32(place(v, indices)),
            Buffer::I64(v) => Buffer::I64(place(v, indices)),
            Buffer::U32(v) => Buffer::U32(place(v, indices)),
            Buffer::U64(v) => Buffer::U64(place(v, indices)),
        }
    }
}

/// Scalar types that can live in a [`Buffer`].
pub trait Element: Copy + Send + Sync + 'static {
    const DTYPE: DType;

    fn slice(buffer: &Buffer) -> Option<&[Self]>;

    fn into_buffer(values: Vec<Self>) -> Buffer;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            fn slice(buffer: &Buffer) -> Option<&[Self]> {
                match buffer {
                    Buffer::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_buffer(values: Vec<Self>) -> Buffer {
                Buffer::$variant(values)
            }
        }
    };
}

impl_element!(f32, F32);
impl_element!(f64, F64);
impl_element!(i32, I32);
impl_element!(i64, I64);
impl_element!(u32, U32);
impl_element!(u64, U64);
