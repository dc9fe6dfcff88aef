//! # pasc-codec
//!
//! Stage implementations for the pasc pipeline.
//!
//! Key types:
//! - [`MapperKind`]: [`Raw`], [`RawBinary`], [`Ordered`] and [`Lindstrom`] float ↔ integer maps
//! - [`LinearSequencer`]: straight-line traversal in a [`TraversalOrder`], rotated to a start index
//! - [`SubtractorKind`]: [`Xor`] and [`Fpd`] residual formation
//! - [`LzcEncoder`]: leading-zero-count + noise bit streams

pub mod lzc;
pub mod mapper;
pub mod sequencer;
pub mod subtractor;

pub use lzc::LzcEncoder;
pub use mapper::{Lindstrom, MapperKind, Ordered, Raw, RawBinary};
pub use sequencer::{LinearSequencer, TraversalOrder};
pub use subtractor::{Fpd, SubtractorKind, Xor};
