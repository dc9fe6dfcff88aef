use thiserror::Error;

/// Errors raised by the bit cursors and mode validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    #[error("Bit stream exhausted: requested {requested} bits, {available} available")]
    UnexpectedEnd { requested: u32, available: usize },
    #[error("Invalid pad of {pad} bits for a stream of {len} bytes")]
    InvalidPad { pad: u8, len: usize },
    #[error("Invalid bit mode: {count} bits of a {width}-bit word")]
    InvalidMode { count: u32, width: u32 },
}

/// Low `n` bits set. `mask(64)` is all ones.
#[inline]
pub fn mask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Number of zero bits to prepend so that `total_bits` lands on a byte boundary.
#[inline]
pub fn left_pad(total_bits: usize) -> u8 {
    ((8 - total_bits % 8) % 8) as u8
}

/// Leading-zero count of `value` read as a `width`-bit unsigned integer.
///
/// Returns `width` for zero. Bits above `width` are ignored.
#[inline]
pub fn leading_zeros(value: u64, width: u32) -> u32 {
    let value = value & mask(width);
    value.leading_zeros() - (64 - width)
}

/// Smallest field width able to hold every count in `0..=width`.
///
/// 6 bits for 32-bit words, 7 bits for 64-bit words.
#[inline]
pub fn lzc_field_width(width: u32) -> u32 {
    u32::BITS - width.leading_zeros()
}

/// Bytes of a left-padded bit stream together with the pad count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaddedBytes {
    pub bytes: Vec<u8>,
    pub pad: u8,
}

/// MSB-first bit writer.
///
/// Created with the final stream length so the zero pad can be emitted up
/// front: the pad sits on the left of the first byte, never at the tail.
#[derive(Debug)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u8,
    filled: u32,
    pad: u8,
}

impl BitWriter {
    /// Writer for a stream that will hold exactly `total_bits` payload bits.
    pub fn with_left_pad(total_bits: usize) -> Self {
        let pad = left_pad(total_bits);
        let mut writer = Self {
            bytes: Vec::with_capacity((total_bits + pad as usize) / 8),
            acc: 0,
            filled: 0,
            pad,
        };
        writer.write_bits(0, pad as u32);
        writer
    }

    /// Append the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, mut count: u32) {
        debug_assert!(count <= 64);
        while count > 0 {
            let space = 8 - self.filled;
            let take = space.min(count);
            let chunk = (value >> (count - take)) & mask(take);
            self.acc |= (chunk as u8) << (space - take);
            self.filled += take;
            count -= take;
            if self.filled == 8 {
                self.bytes.push(self.acc);
                self.acc = 0;
                self.filled = 0;
            }
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u64, 1);
    }

    /// Bits written so far, pad included.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.filled as usize
    }

    /// Flush the stream. A trailing partial byte (only possible when fewer bits
    /// were written than announced) is zero-filled on the right.
    pub fn finish(mut self) -> PaddedBytes {
        if self.filled > 0 {
            self.bytes.push(self.acc);
        }
        PaddedBytes {
            bytes: self.bytes,
            pad: self.pad,
        }
    }
}

/// MSB-first bit reader over a left-padded byte stream.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Reader positioned after the leading `pad` zero bits.
    pub fn new(bytes: &'a [u8], pad: u8) -> Result<Self, BitError> {
        if pad > 7 || (bytes.is_empty() && pad != 0) {
            return Err(BitError::InvalidPad {
                pad,
                len: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            pos: pad as usize,
        })
    }

    /// Payload bits not consumed yet.
    pub fn remaining(&self) -> usize {
        self.bytes.len() * 8 - self.pos
    }

    /// Read `count` bits (at most 64) as an unsigned integer.
    pub fn read_bits(&mut self, mut count: u32) -> Result<u64, BitError> {
        debug_assert!(count <= 64);
        if count as usize > self.remaining() {
            return Err(BitError::UnexpectedEnd {
                requested: count,
                available: self.remaining(),
            });
        }
        let mut value = 0u64;
        while count > 0 {
            let byte = self.bytes[self.pos / 8];
            let avail = 8 - (self.pos % 8) as u32;
            let take = avail.min(count);
            let chunk = (byte as u64 >> (avail - take)) & mask(take);
            value = (value << take) | chunk;
            self.pos += take as usize;
            count -= take;
        }
        Ok(value)
    }

    pub fn read_bit(&mut self) -> Result<bool, BitError> {
        Ok(self.read_bits(1)? == 1)
    }
}
