use crate::array::element_count;
use crate::error::PascError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format version written by this crate.
pub const FORMAT_VERSION: u8 = 1;

/// One compressed variable: the lzc and noise streams plus what is needed to
/// rebuild the residual array from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coded {
    lzc: Vec<u8>,
    noise: Vec<u8>,
    lzc_pad: u8,
    noise_pad: u8,
    start: usize,
    bits: u32,
    shape: Vec<usize>,
    version: u8,
}

impl Coded {
    pub fn new(
        lzc: Vec<u8>,
        lzc_pad: u8,
        noise: Vec<u8>,
        noise_pad: u8,
        start: usize,
        bits: u32,
        shape: Vec<usize>,
    ) -> Result<Self, PascError> {
        if bits != 32 && bits != 64 {
            return Err(PascError::UnsupportedBitWidth(bits));
        }
        // every element may carry up to `bits` bits, so that total must stay addressable
        let max_bits = element_count(&shape).and_then(|n| n.checked_mul(bits as usize));
        if max_bits.is_none() {
            return Err(PascError::MalformedStream(format!(
                "shape {:?} is too large to address",
                shape
            )));
        }
        for (name, pad, bytes) in [("lzc", lzc_pad, &lzc), ("noise", noise_pad, &noise)] {
            if pad > 7 || (bytes.is_empty() && pad != 0) {
                return Err(PascError::MalformedStream(format!(
                    "{} pad of {} bits over {} bytes",
                    name,
                    pad,
                    bytes.len()
                )));
            }
        }
        Ok(Self {
            lzc,
            noise,
            lzc_pad,
            noise_pad,
            start,
            bits,
            shape,
            version: FORMAT_VERSION,
        })
    }

    /// Override the recorded format version (as read back from a blob).
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn lzc(&self) -> &[u8] {
        &self.lzc
    }

    pub fn noise(&self) -> &[u8] {
        &self.noise
    }

    pub fn lzc_pad(&self) -> u8 {
        self.lzc_pad
    }

    pub fn noise_pad(&self) -> u8 {
        self.noise_pad
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Number of encoded elements. Construction guarantees it does not overflow.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Payload size: both streams, excluding headers.
    pub fn nbytes(&self) -> usize {
        self.lzc.len() + self.noise.len()
    }

    /// `nbytes` relative to an uncompressed payload of `original_nbytes`.
    pub fn compression_ratio(&self, original_nbytes: usize) -> f64 {
        if original_nbytes == 0 {
            return 0.0;
        }
        self.nbytes() as f64 / original_nbytes as f64
    }
}

impl fmt::Display for Coded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coded object: Size ~{}", self.nbytes())
    }
}
