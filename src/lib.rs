//! # pasc
//!
//! Prediction-based lossless compression of 32/64-bit floating-point grids.
//!
//! A [`Workflow`] chains a mapper, a sequencer, a predictor, a subtractor and
//! the LZC encoder. [`format`] turns the resulting [`Coded`] objects into the
//! `PSC` wire blob.
//!
//! ```no_run
//! use pasc::{FloatArray, Workflow, WorkflowConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = FloatArray::from_vec(vec![0.5f32; 64], vec![8, 8])?;
//! let workflow = Workflow::from_config(&WorkflowConfig::default())?;
//! let coded = workflow.compress(&grid, 0, false)?;
//! let blob = pasc::format::to_bytes(&[coded])?;
//! let back = pasc::format::from_bytes(&blob)?;
//! assert!(workflow.decompress(&back[0])?.eq_nan_aware(&grid));
//! # Ok(())
//! # }
//! ```

pub use pasc_bits as bits;
pub use pasc_codec as codec;
pub use pasc_format as format;
pub use pasc_predict as predict;
pub use pasc_workflow as workflow;

pub use pasc_codec::{LinearSequencer, LzcEncoder, MapperKind, SubtractorKind, TraversalOrder};
pub use pasc_core::{
    Buffer, Coded, DType, Encoder, FloatArray, IntegerArray, Mapper, PascError, Predictor,
    ResidualArray, Sequence, Sequencer, Subtractor, Word,
};
pub use pasc_format::FormatError;
pub use pasc_predict::PredictorKind;
pub use pasc_workflow::{CancelToken, JobError, ParallelWorkflow, Workflow, WorkflowConfig};
