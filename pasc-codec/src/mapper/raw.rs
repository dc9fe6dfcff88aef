use pasc_core::{Buffer, DType, FloatArray, IntegerArray, Mapper, PascError};

macro_rules! raw_mapper {
    ($(#[$doc:meta])* $name:ident, $label:literal, $to_bytes:ident, $from_bytes:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Mapper for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn integer_dtype(&self, float: DType) -> Result<DType, PascError> {
                if !float.is_float() {
                    return Err(PascError::type_mismatch($label, "float dtype", float));
                }
                DType::signed_of_width(float.bits())
            }

            fn map(&self, input: &FloatArray) -> Result<IntegerArray, PascError> {
                let buffer = match input.buffer() {
                    Buffer::F32(v) => {
                        Buffer::I32(v.iter().map(|x| i32::$from_bytes(x.$to_bytes())).collect())
                    }
                    Buffer::F64(v) => {
                        Buffer::I64(v.iter().map(|x| i64::$from_bytes(x.$to_bytes())).collect())
                    }
                    other => {
                        return Err(PascError::type_mismatch($label, "float dtype", other.dtype()))
                    }
                };
                IntegerArray::new(buffer, input.shape().to_vec())
            }

            fn revmap(&self, input: &IntegerArray) -> Result<FloatArray, PascError> {
                let signed = DType::signed_of_width(input.bits())?;
                let buffer = match input.buffer().cast_bits(signed)? {
                    Buffer::I32(v) => {
                        Buffer::F32(v.iter().map(|x| f32::$from_bytes(x.$to_bytes())).collect())
                    }
                    Buffer::I64(v) => {
                        Buffer::F64(v.iter().map(|x| f64::$from_bytes(x.$to_bytes())).collect())
                    }
                    other => {
                        return Err(PascError::type_mismatch($label, "integer dtype", other.dtype()))
                    }
                };
                FloatArray::new(buffer, input.shape().to_vec())
            }
        }
    };
}

raw_mapper!(
    /// Reinterpret the float bits as a same-width signed integer, host byte order.
    Raw,
    "Raw",
    to_ne_bytes,
    from_ne_bytes
);

raw_mapper!(
    /// Like [`Raw`] but goes through big-endian bytes, independent of the host.
    RawBinary,
    "Raw Binary",
    to_be_bytes,
    from_be_bytes
);
