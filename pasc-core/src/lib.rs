//! # pasc-core
//!
//! Core types and stage contracts for pasc's prediction-based lossless compression.
//!
//! Data flows through five stages, each behind its own trait:
//! - [`Mapper`]: bijective float ↔ integer transform
//! - [`Sequencer`]: deterministic traversal order ([`Sequence`]) over a shape
//! - [`Predictor`]: causal `predict()` / `update(value)` state machine
//! - [`Subtractor`]: prediction ⊖ truth → residual, and its elementwise inverse
//! - [`Encoder`]: residuals ↔ [`Coded`] bit streams
//!
//! The semantic arrays ([`FloatArray`], [`IntegerArray`], [`ResidualArray`],
//! [`PredictionArray`]) wrap a typed [`Buffer`] plus a shape and enforce their
//! dtype at construction. Generic stages run over [`Word`] (`i32`, `i64`, `u32`, `u64`).

pub mod array;
pub mod buffer;
pub mod coded;
pub mod encoder;
pub mod error;
pub mod mapper;
pub mod predictor;
pub mod sequence;
pub mod sequencer;
pub mod subtractor;
pub mod word;

pub use array::{
    element_count, Array, ArrayKind, Float, FloatArray, Integer, IntegerArray, Prediction, PredictionArray,
    Residual, ResidualArray,
};
pub use buffer::{Buffer, DType, Element};
pub use coded::{Coded, FORMAT_VERSION};
pub use encoder::Encoder;
pub use error::PascError;
pub use mapper::Mapper;
pub use predictor::Predictor;
pub use sequence::{is_permutation, roll, Sequence};
pub use sequencer::Sequencer;
pub use subtractor::Subtractor;
pub use word::Word;
