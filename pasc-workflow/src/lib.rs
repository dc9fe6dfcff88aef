//! # pasc-workflow
//!
//! Orchestration of the five pipeline stages.
//!
//! Key types:
//! - [`Workflow`]: one mapper, sequencer, predictor, subtractor and encoder; `compress` / `decompress`
//! - [`WorkflowConfig`]: serde description of a workflow, loadable from JSON
//! - [`Feeder`]: drives a predictor over a [`pasc_core::Sequence`] and places predictions back
//! - [`ParallelWorkflow`]: fans independent jobs across a rayon pool with per-job error isolation

pub mod feeder;
pub mod parallel;
pub mod workflow;

pub use feeder::Feeder;
pub use parallel::{CancelToken, JobError, ParallelWorkflow};
pub use workflow::{Workflow, WorkflowConfig};
