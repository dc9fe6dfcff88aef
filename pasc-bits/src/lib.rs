//! # pasc-bits
//!
//! Bit-level building blocks for the pasc compression framework.
//!
//! - [`BitWriter`] / [`BitReader`]: MSB-first cursors over byte buffers. Streams
//!   are left-padded with zero bits up to the next byte boundary, and the pad
//!   count travels next to the bytes.
//! - [`leading_zeros`] / [`lzc_field_width`]: fixed-width leading-zero counts.
//! - [`context`]: pure bit transforms (Select/Fold/Shift/Xor/Split) and the
//!   composed [`ContextHash`] used for context-addressed prediction.

pub mod bitstream;
pub mod context;

pub use bitstream::{
    leading_zeros, left_pad, lzc_field_width, mask, BitError, BitReader, BitWriter, PaddedBytes,
};
pub use context::{xor_all, ContextHash, Direction, Fold, HashStage, Mode, Select, Shift, Split};
