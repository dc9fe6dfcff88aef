//! # pasc-format
//!
//! The `PSC` wire format: one or more [`Coded`] variables sharing a shape,
//! serialized into a self-describing blob.
//!
//! ```text
//! "PSC" version:u8(ascii digit) ndim:u8 dims:[u32; ndim] nvars:u8
//! nvars × {
//!     info:u8    bit7 = 32-bit words, bit6 = start is zero, bit5 = writer was little-endian
//!     pad:u8     bits 5-7 = lzc pad, bits 0-2 = noise pad
//!     start:u32  only when bit6 is clear
//!     lzc_len:u32 noise_len:u32
//!     lzc bytes, noise bytes
//! }
//! ```
//!
//! Multi-byte fields are little-endian on every host.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use pasc_core::{Coded, PascError};
use std::io::{self, Cursor, Read, Write};
use thiserror::Error;
use tracing::{debug, warn};

pub const MAGIC: &[u8; 3] = b"PSC";

const FLAG_32_BIT: u8 = 1 << 7;
const FLAG_ZERO_START: u8 = 1 << 6;
const FLAG_LITTLE_ENDIAN: u8 = 1 << 5;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Pasc(#[from] PascError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn host_flag() -> u8 {
    if cfg!(target_endian = "little") {
        FLAG_LITTLE_ENDIAN
    } else {
        0
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32, PascError> {
    u32::try_from(value).map_err(|_| {
        PascError::InvalidParameter(format!("{} of {} does not fit in u32", what, value))
    })
}

fn to_u8(value: usize, what: &str) -> Result<u8, PascError> {
    u8::try_from(value).map_err(|_| {
        PascError::InvalidParameter(format!("{} of {} does not fit in one byte", what, value))
    })
}

/// Check that `coded` can be written as one blob; returns the common shape and version.
///
/// Every field that goes on the wire is checked here, so a rejected set writes nothing.
fn check_variables(coded: &[Coded]) -> Result<(&[usize], u8), PascError> {
    let first = coded.first().ok_or_else(|| {
        PascError::InvalidParameter("a PSC blob holds at least one variable".to_string())
    })?;
    to_u8(coded.len(), "variable count")?;
    to_u8(first.shape().len(), "dimension count")?;
    if first.version() > 9 {
        return Err(PascError::InvalidParameter(format!(
            "format version {} is not a single digit",
            first.version()
        )));
    }
    for &dim in first.shape() {
        to_u32(dim, "dimension")?;
    }
    for c in coded {
        to_u32(c.start(), "start index")?;
        to_u32(c.lzc().len(), "lzc stream length")?;
        to_u32(c.noise().len(), "noise stream length")?;
    }
    for (i, c) in coded.iter().enumerate().skip(1) {
        if c.shape() != first.shape() {
            return Err(PascError::ShapeMismatch(format!(
                "variable {} has shape {:?}, variable 0 has {:?}",
                i,
                c.shape(),
                first.shape()
            )));
        }
        if c.version() != first.version() {
            return Err(PascError::InvalidParameter(format!(
                "variable {} has format version {}, variable 0 has {}",
                i,
                c.version(),
                first.version()
            )));
        }
    }
    Ok((first.shape(), first.version()))
}

/// Write `coded` as one blob. Returns the number of bytes written.
pub fn write_to<W: Write>(writer: &mut W, coded: &[Coded]) -> Result<usize, FormatError> {
    let (shape, version) = check_variables(coded)?;
    let mut written = 0usize;

    writer.write_all(MAGIC)?;
    writer.write_u8(b'0' + version)?;
    writer.write_u8(shape.len() as u8)?;
    for &dim in shape {
        writer.write_u32::<LittleEndian>(to_u32(dim, "dimension")?)?;
    }
    writer.write_u8(coded.len() as u8)?;
    written += MAGIC.len() + 3 + 4 * shape.len();

    for c in coded {
        let mut info = host_flag();
        if c.bits() == 32 {
            info |= FLAG_32_BIT;
        }
        if c.start() == 0 {
            info |= FLAG_ZERO_START;
        }
        writer.write_u8(info)?;
        writer.write_u8((c.lzc_pad() << 5) | c.noise_pad())?;
        written += 2;
        if c.start() != 0 {
            writer.write_u32::<LittleEndian>(to_u32(c.start(), "start index")?)?;
            written += 4;
        }
        writer.write_u32::<LittleEndian>(to_u32(c.lzc().len(), "lzc stream length")?)?;
        writer.write_u32::<LittleEndian>(to_u32(c.noise().len(), "noise stream length")?)?;
        writer.write_all(c.lzc())?;
        writer.write_all(c.noise())?;
        written += 8 + c.lzc().len() + c.noise().len();
    }
    debug!(variables = coded.len(), bytes = written, "wrote PSC blob");
    Ok(written)
}

/// Serialize `coded` into a fresh buffer.
pub fn to_bytes(coded: &[Coded]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    write_to(&mut out, coded)?;
    Ok(out)
}

fn truncated(what: &str) -> impl FnOnce(io::Error) -> FormatError + '_ {
    move |err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            PascError::MalformedStream(format!("blob ends inside the {}", what)).into()
        } else {
            err.into()
        }
    }
}

fn read_stream<R: Read>(reader: &mut R, len: u32, what: &str) -> Result<Vec<u8>, FormatError> {
    let mut bytes = Vec::new();
    reader.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len as usize {
        return Err(PascError::MalformedStream(format!(
            "{} declares {} bytes, only {} available",
            what,
            len,
            bytes.len()
        ))
        .into());
    }
    Ok(bytes)
}

/// Read one blob from `reader`.
pub fn read_from<R: Read>(reader: &mut R) -> Result<Vec<Coded>, FormatError> {
    let mut magic = [0u8; 3];
    reader.read_exact(&mut magic).map_err(truncated("magic"))?;
    if &magic != MAGIC {
        return Err(PascError::MalformedStream(format!("bad magic {:?}", magic)).into());
    }
    let digit = reader.read_u8().map_err(truncated("version"))?;
    if !digit.is_ascii_digit() {
        return Err(PascError::MalformedStream(format!("bad version byte {:#04x}", digit)).into());
    }
    let version = digit - b'0';

    let ndim = reader.read_u8().map_err(truncated("header"))?;
    let shape = (0..ndim)
        .map(|_| {
            reader
                .read_u32::<LittleEndian>()
                .map(|d| d as usize)
                .map_err(truncated("shape"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let nvars = reader.read_u8().map_err(truncated("header"))?;
    if nvars == 0 {
        return Err(PascError::MalformedStream("blob declares no variables".to_string()).into());
    }

    let mut coded = Vec::with_capacity(nvars as usize);
    for var in 0..nvars {
        let info = reader.read_u8().map_err(truncated("variable header"))?;
        let pad = reader.read_u8().map_err(truncated("variable header"))?;
        if info & FLAG_LITTLE_ENDIAN != host_flag() {
            warn!(variable = var, "PSC blob was written on a host of different byte order");
        }
        let start = if info & FLAG_ZERO_START != 0 {
            0
        } else {
            reader
                .read_u32::<LittleEndian>()
                .map_err(truncated("start index"))? as usize
        };
        let lzc_len = reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("stream lengths"))?;
        let noise_len = reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("stream lengths"))?;
        let lzc = read_stream(reader, lzc_len, "lzc stream")?;
        let noise = read_stream(reader, noise_len, "noise stream")?;
        let bits = if info & FLAG_32_BIT != 0 { 32 } else { 64 };
        let c = Coded::new(lzc, pad >> 5, noise, pad & 0x07, start, bits, shape.clone())?
            .with_version(version);
        coded.push(c);
    }
    debug!(variables = coded.len(), ?shape, "read PSC blob");
    Ok(coded)
}

/// Parse a complete blob. Trailing bytes are rejected.
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<Coded>, FormatError> {
    let mut cursor = Cursor::new(bytes);
    let coded = read_from(&mut cursor)?;
    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(PascError::MalformedStream(format!(
            "{} trailing bytes after the last variable",
            bytes.len() - consumed
        ))
        .into());
    }
    Ok(coded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(start: usize, bits: u32) -> Coded {
        Coded::new(vec![0x0F, 0xA0], 4, vec![0x01], 6, start, bits, vec![2, 3]).unwrap()
    }

    #[test]
    fn test_exact_layout() {
        let bytes = to_bytes(&[sample(0, 32)]).unwrap();
        let mut expected = b"PSC1".to_vec();
        expected.push(2);
        expected.extend_from_slice(&[2, 0, 0, 0, 3, 0, 0, 0]);
        expected.push(1);
        expected.push(FLAG_32_BIT | FLAG_ZERO_START | host_flag());
        expected.push((4 << 5) | 6);
        expected.extend_from_slice(&[2, 0, 0, 0, 1, 0, 0, 0]);
        expected.extend_from_slice(&[0x0F, 0xA0, 0x01]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_start_field_only_when_nonzero() {
        let zero = to_bytes(&[sample(0, 64)]).unwrap();
        let nonzero = to_bytes(&[sample(5, 64)]).unwrap();
        assert_eq!(nonzero.len(), zero.len() + 4);
        assert_eq!(from_bytes(&nonzero).unwrap(), vec![sample(5, 64)]);
    }

    #[test]
    fn test_write_rejects_bad_sets() {
        assert!(to_bytes(&[]).is_err());

        let other_shape =
            Coded::new(vec![], 0, vec![], 0, 0, 32, vec![6]).unwrap();
        let err = to_bytes(&[sample(0, 32), other_shape]).unwrap_err();
        assert!(matches!(err, FormatError::Pasc(PascError::ShapeMismatch(_))));

        let newer = sample(0, 32).with_version(2);
        assert!(to_bytes(&[sample(0, 32), newer]).is_err());

        let too_many = vec![sample(0, 32); 256];
        assert!(to_bytes(&too_many).is_err());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_rejected_set_leaves_sink_empty() {
        let far_start = Coded::new(vec![1], 0, vec![], 0, u32::MAX as usize + 1, 32, vec![1]).unwrap();
        let mut sink = Vec::new();
        let err = write_to(&mut sink, &[sample(0, 32), far_start]).unwrap_err();
        assert!(matches!(err, FormatError::Pasc(PascError::InvalidParameter(_))));
        assert!(sink.is_empty());

        let wide = Coded::new(vec![], 0, vec![], 0, 0, 32, vec![u32::MAX as usize + 1, 0]).unwrap();
        let mut sink = Vec::new();
        assert!(write_to(&mut sink, &[wide]).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_read_rejects_oversized_shape() {
        let mut bytes = b"PSC1".to_vec();
        bytes.push(2);
        bytes.extend_from_slice(&[0xFF; 8]);
        bytes.push(1);
        bytes.push(FLAG_32_BIT | FLAG_ZERO_START);
        bytes.push(0);
        bytes.extend_from_slice(&[0; 8]);
        let err = from_bytes(&bytes).unwrap_err();
        assert!(
            matches!(err, FormatError::Pasc(PascError::MalformedStream(_))),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_read_rejects_truncation() {
        let bytes = to_bytes(&[sample(3, 32), sample(0, 64)]).unwrap();
        for cut in 0..bytes.len() {
            let err = from_bytes(&bytes[..cut]).unwrap_err();
            assert!(
                matches!(err, FormatError::Pasc(PascError::MalformedStream(_))),
                "cut at {} gave {:?}",
                cut,
                err
            );
        }
        let mut extra = bytes.clone();
        extra.push(0);
        assert!(from_bytes(&extra).is_err());
    }

    #[test]
    fn test_read_rejects_bad_header() {
        let mut bytes = to_bytes(&[sample(0, 32)]).unwrap();
        bytes[0] = b'X';
        assert!(from_bytes(&bytes).is_err());

        let mut bytes = to_bytes(&[sample(0, 32)]).unwrap();
        bytes[3] = b'v';
        assert!(from_bytes(&bytes).is_err());
    }
}
