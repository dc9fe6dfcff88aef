//! # pasc-predict
//!
//! Causal predictors over fixed-width integer words.
//!
//! Key types:
//! - [`LastValue`], [`Stride`], [`TwoStride`], [`StrideConfidence`]: delta-based predictors
//! - [`Akumuli`]: hash-addressed last-value cache
//! - [`FiniteContext`]: last-value table addressed by a [`pasc_bits::ContextHash`]
//! - [`LastBest`], [`MostRight`]: ensembles choosing among member predictors
//! - [`PredictorKind`]: serde-friendly recipe that builds any of the above

pub mod akumuli;
pub mod context;
pub mod ensemble;
pub mod kind;
pub mod stride;

pub use akumuli::Akumuli;
pub use context::FiniteContext;
pub use ensemble::{LastBest, MostRight};
pub use kind::PredictorKind;
pub use stride::{LastValue, Stride, StrideConfidence, TwoStride};
