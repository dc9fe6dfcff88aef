use crate::buffer::{Buffer, DType, Element};
use crate::error::PascError;
use std::marker::PhantomData;

/// Role tag of a semantic array: which dtypes it may hold.
pub trait ArrayKind {
    const NAME: &'static str;

    fn accepts(dtype: DType) -> bool;
}

/// Input grid of `f32`/`f64` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Float;

/// Output of a mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer;

/// Output of a subtractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Residual;

/// Predictor outputs placed back at their original coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction;

impl ArrayKind for Float {
    const NAME: &'static str = "FloatArray";

    fn accepts(dtype: DType) -> bool {
        dtype.is_float()
    }
}

macro_rules! integer_kind {
    ($kind:ty, $name:literal) => {
        impl ArrayKind for $kind {
            const NAME: &'static str = $name;

            fn accepts(dtype: DType) -> bool {
                dtype.is_integer()
            }
        }
    };
}

integer_kind!(Integer, "IntegerArray");
integer_kind!(Residual, "ResidualArray");
integer_kind!(Prediction, "PredictionArray");

/// `∏shape`, or `None` if the product overflows `usize`.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Typed buffer plus shape, tagged with its pipeline role.
///
/// Construction checks the dtype against the role and `len == ∏shape`;
/// after that the array is an immutable value.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<K: ArrayKind> {
    buffer: Buffer,
    shape: Vec<usize>,
    kind: PhantomData<K>,
}

pub type FloatArray = Array<Float>;
pub type IntegerArray = Array<Integer>;
pub type ResidualArray = Array<Residual>;
pub type PredictionArray = Array<Prediction>;

impl<K: ArrayKind> Array<K> {
    pub fn new(buffer: Buffer, shape: Vec<usize>) -> Result<Self, PascError> {
        let dtype = buffer.dtype();
        if !K::accepts(dtype) {
            let expected = if K::accepts(DType::F32) {
                "float dtype"
            } else {
                "integer dtype"
            };
            return Err(PascError::type_mismatch(K::NAME, expected, dtype));
        }
        let expected_len = element_count(&shape).ok_or_else(|| {
            PascError::ShapeMismatch(format!("{}: shape {:?} overflows usize", K::NAME, shape))
        })?;
        if expected_len != buffer.len() {
            return Err(PascError::ShapeMismatch(format!(
                "{}: shape {:?} holds {} elements, buffer has {}",
                K::NAME,
                shape,
                expected_len,
                buffer.len()
            )));
        }
        Ok(Self {
            buffer,
            shape,
            kind: PhantomData,
        })
    }

    pub fn from_vec<T: Element>(values: Vec<T>, shape: Vec<usize>) -> Result<Self, PascError> {
        Self::new(T::into_buffer(values), shape)
    }

    /// One-dimensional array over `values`.
    pub fn flat<T: Element>(values: Vec<T>) -> Result<Self, PascError> {
        let len = values.len();
        Self::from_vec(values, vec![len])
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    pub fn bits(&self) -> u32 {
        self.dtype().bits()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn nbytes(&self) -> usize {
        self.buffer.nbytes()
    }

    /// Borrow the elements as `T`, failing if `T` is not the stored dtype.
    pub fn as_slice<T: Element>(&self) -> Result<&[T], PascError> {
        T::slice(&self.buffer)
            .ok_or_else(|| PascError::type_mismatch(K::NAME, T::DTYPE.to_string(), self.dtype()))
    }

    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    pub fn into_parts(self) -> (Buffer, Vec<usize>) {
        (self.buffer, self.shape)
    }
}

impl FloatArray {
    /// Elementwise equality where NaN matches NaN.
    pub fn eq_nan_aware(&self, other: &FloatArray) -> bool {
        if self.shape != other.shape {
            return false;
        }
        match (&self.buffer, &other.buffer) {
            (Buffer::F32(a), Buffer::F32(b)) => a
                .iter()
                .zip(b)
                .all(|(x, y)| x == y || (x.is_nan() && y.is_nan())),
            (Buffer::F64(a), Buffer::F64(b)) => a
                .iter()
                .zip(b)
                .all(|(x, y)| x == y || (x.is_nan() && y.is_nan())),
            _ => false,
        }
    }
}
