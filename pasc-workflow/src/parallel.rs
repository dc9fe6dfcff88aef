//! Job-level fan-out of independent workflows over a rayon pool.
//!
//! Each job owns its result slot. A failing or panicking job never aborts its
//! siblings, and cancelling only affects jobs that have not started yet.

use crate::workflow::Workflow;
use pasc_core::{Coded, Encoder, FloatArray, Mapper, PascError, Sequencer, Subtractor};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Why a job produced no output.
#[derive(Debug, Error, PartialEq)]
pub enum JobError {
    #[error(transparent)]
    Failed(#[from] PascError),

    #[error("job cancelled before it started")]
    Cancelled,

    #[error("job panicked: {0}")]
    Panicked(String),
}

/// Shared flag that stops not-yet-started jobs.
///
/// The flag stays set until [`CancelToken::reset`]; every later batch on the
/// same pool is cancelled up front until then.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Clear the flag so the pool accepts work again.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct ParallelWorkflow {
    pool: ThreadPool,
    cancel: CancelToken,
}

impl ParallelWorkflow {
    /// Pool with `threads` workers, or rayon's default when `None`.
    pub fn new(threads: Option<usize>) -> Result<Self, PascError> {
        let mut builder = ThreadPoolBuilder::new();
        if let Some(threads) = threads {
            if threads == 0 {
                return Err(PascError::InvalidParameter(
                    "thread count must be at least 1".to_string(),
                ));
            }
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| PascError::InvalidParameter(format!("thread pool: {}", e)))?;
        Ok(Self {
            pool,
            cancel: CancelToken::default(),
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Compress the shared `input` once per workflow.
    ///
    /// Results come back keyed, in the order of `jobs`.
    pub fn compress_all<K, M, S, D, E>(
        &self,
        jobs: &[(K, Workflow<M, S, D, E>)],
        input: &FloatArray,
        start: usize,
        use_feeder: bool,
    ) -> Vec<(K, Result<Coded, JobError>)>
    where
        K: Clone + Send + Sync,
        M: Mapper,
        S: Sequencer,
        D: Subtractor,
        E: Encoder,
    {
        self.run(jobs, |workflow| workflow.compress(input, start, use_feeder))
    }

    /// Decompress each coded object with its paired workflow.
    pub fn decompress_all<K, M, S, D, E>(
        &self,
        jobs: &[(K, Workflow<M, S, D, E>, Coded)],
    ) -> Vec<(K, Result<FloatArray, JobError>)>
    where
        K: Clone + Send + Sync,
        M: Mapper,
        S: Sequencer,
        D: Subtractor,
        E: Encoder,
    {
        let paired: Vec<(K, (&Workflow<M, S, D, E>, &Coded))> = jobs
            .iter()
            .map(|(key, workflow, coded)| (key.clone(), (workflow, coded)))
            .collect();
        self.run(&paired, |(workflow, coded)| workflow.decompress(coded))
    }

    fn run<K, J, T, F>(&self, jobs: &[(K, J)], job: F) -> Vec<(K, Result<T, JobError>)>
    where
        K: Clone + Send + Sync,
        J: Sync,
        T: Send,
        F: Fn(&J) -> Result<T, PascError> + Sync,
    {
        self.pool.install(|| {
            jobs.par_iter()
                .enumerate()
                .map(|(index, (key, payload))| {
                    if self.cancel.is_cancelled() {
                        return (key.clone(), Err(JobError::Cancelled));
                    }
                    let result = match catch_unwind(AssertUnwindSafe(|| job(payload))) {
                        Ok(result) => result.map_err(JobError::from),
                        Err(panic) => Err(JobError::Panicked(panic_message(panic.as_ref()))),
                    };
                    match &result {
                        Ok(_) => info!(job = index, "job finished"),
                        Err(e) => warn!(job = index, error = %e, "job failed"),
                    }
                    (key.clone(), result)
                })
                .collect()
        })
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
