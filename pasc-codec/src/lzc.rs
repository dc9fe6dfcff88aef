use pasc_bits::{leading_zeros, lzc_field_width, mask, BitReader, BitWriter};
use pasc_core::{Buffer, Coded, DType, Encoder, PascError, ResidualArray};
use tracing::trace;

/// Leading-zero-count codec.
///
/// Every residual is split into its leading-zero count, written as a fixed
/// width field to the lzc stream, and the bits below its highest set bit,
/// appended to the noise stream. The highest set bit itself is implicit. A
/// zero residual has `lzc == bits` and no noise.
///
/// Both streams are MSB-first and left-padded with zeros to a whole byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LzcEncoder;

/// Noise bits carried by a value with `lzc` leading zeros.
#[inline]
fn noise_len(lzc: u32, bits: u32) -> u32 {
    if lzc >= bits {
        0
    } else {
        bits - lzc - 1
    }
}

impl Encoder for LzcEncoder {
    fn name(&self) -> &'static str {
        "LZC"
    }

    fn encode(&self, residual: &ResidualArray, start: usize) -> Result<Coded, PascError> {
        let bits = residual.bits();
        let values = residual.buffer().integer_bits().ok_or_else(|| {
            PascError::type_mismatch(self.name(), "integer dtype", residual.dtype())
        })?;
        let field = lzc_field_width(bits);
        let lzcs: Vec<u32> = values.iter().map(|&v| leading_zeros(v, bits)).collect();

        let mut lzc_stream = BitWriter::with_left_pad(lzcs.len() * field as usize);
        for &lzc in &lzcs {
            lzc_stream.write_bits(lzc as u64, field);
        }

        let noise_total: usize = lzcs.iter().map(|&lzc| noise_len(lzc, bits) as usize).sum();
        let mut noise_stream = BitWriter::with_left_pad(noise_total);
        for (&value, &lzc) in values.iter().zip(&lzcs) {
            let n = noise_len(lzc, bits);
            noise_stream.write_bits(value & mask(n), n);
        }

        let lzc_bytes = lzc_stream.finish();
        let noise_bytes = noise_stream.finish();
        trace!(
            elements = values.len(),
            lzc_bytes = lzc_bytes.bytes.len(),
            noise_bytes = noise_bytes.bytes.len(),
            "lzc encode"
        );
        Coded::new(
            lzc_bytes.bytes,
            lzc_bytes.pad,
            noise_bytes.bytes,
            noise_bytes.pad,
            start,
            bits,
            residual.shape().to_vec(),
        )
    }

    fn decode(&self, coded: &Coded) -> Result<ResidualArray, PascError> {
        let bits = coded.bits();
        let field = lzc_field_width(bits);
        let n = coded.len();

        let expected_bits = n.checked_mul(field as usize).ok_or_else(|| {
            PascError::MalformedStream(format!("{} lzc fields overflow the bit count", n))
        })?;
        let mut lzc_stream = BitReader::new(coded.lzc(), coded.lzc_pad())?;
        if lzc_stream.remaining() != expected_bits {
            return Err(PascError::MalformedStream(format!(
                "lzc stream holds {} bits, expected {} fields of {} bits",
                lzc_stream.remaining(),
                n,
                field
            )));
        }
        let mut noise_stream = BitReader::new(coded.noise(), coded.noise_pad())?;

        let mut values = Vec::with_capacity(n);
        for index in 0..n {
            let lzc = lzc_stream.read_bits(field)? as u32;
            if lzc > bits {
                return Err(PascError::MalformedStream(format!(
                    "leading-zero count {} at element {} exceeds {} bits",
                    lzc, index, bits
                )));
            }
            if lzc == bits {
                values.push(0);
                continue;
            }
            let len = noise_len(lzc, bits);
            let noise = noise_stream.read_bits(len).map_err(|_| {
                PascError::MalformedStream(format!(
                    "noise stream ends inside element {} of {}",
                    index, n
                ))
            })?;
            values.push((1u64 << len) | noise);
        }
        if noise_stream.remaining() != 0 {
            return Err(PascError::MalformedStream(format!(
                "{} unread noise bits",
                noise_stream.remaining()
            )));
        }

        let buffer = Buffer::from_integer_bits(DType::unsigned_of_width(bits)?, &values)?;
        ResidualArray::new(buffer, coded.shape().to_vec())
    }
}
