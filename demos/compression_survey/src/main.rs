use anyhow::{bail, Context, Result};
use pasc::{
    FloatArray, MapperKind, ParallelWorkflow, PredictorKind, SubtractorKind, Workflow,
    WorkflowConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Temperature-like field: smooth in both axes, a little sensor noise.
fn synthetic_field(rows: usize, cols: usize, seed: u64) -> Result<FloatArray> {
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<f32> = (0..rows * cols)
        .map(|i| {
            let (r, c) = ((i / cols) as f32, (i % cols) as f32);
            280.0 + 15.0 * (r * 0.02).sin() * (c * 0.03).cos() + rng.gen_range(-0.05f32..0.05)
        })
        .collect();
    Ok(FloatArray::from_vec(values, vec![rows, cols])?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Running pasc compression survey");

    let field = synthetic_field(256, 512, 2024)?;
    let predictors = [
        PredictorKind::LastValue,
        PredictorKind::Stride,
        PredictorKind::TwoStride,
        PredictorKind::stride_confidence7(),
        PredictorKind::akumuli(),
        PredictorKind::FiniteContext {
            order: 2,
            table_bits: 16,
        },
        PredictorKind::LastBest(vec![PredictorKind::LastValue, PredictorKind::TwoStride]),
    ];

    let mut jobs = Vec::new();
    for mapper in MapperKind::ALL {
        for predictor in &predictors {
            for subtractor in SubtractorKind::ALL {
                let workflow = Workflow::from_config(&WorkflowConfig {
                    mapper,
                    predictor: predictor.clone(),
                    subtractor,
                    ..WorkflowConfig::default()
                })?;
                jobs.push((workflow.to_string(), workflow));
            }
        }
    }

    let survey = ParallelWorkflow::new(None)?;
    println!(
        "{} workflows over a {:?} float32 grid on {} threads",
        jobs.len(),
        field.shape(),
        survey.threads()
    );

    let started = Instant::now();
    let compressed = survey.compress_all(&jobs, &field, 0, false);
    let elapsed = started.elapsed();

    let mut ratios = Vec::with_capacity(jobs.len());
    let mut roundtrip = Vec::with_capacity(jobs.len());
    for ((name, coded), (_, workflow)) in compressed.into_iter().zip(&jobs) {
        let coded = coded.with_context(|| format!("compressing with {}", name))?;
        ratios.push((workflow.compression_ratio(&field, &coded), name.clone()));
        roundtrip.push((name, workflow.clone(), coded));
    }

    for (name, restored) in survey.decompress_all(&roundtrip) {
        let restored = restored.with_context(|| format!("decompressing with {}", name))?;
        if !restored.eq_nan_aware(&field) {
            bail!("{} did not round-trip", name);
        }
    }

    ratios.sort_by(|a, b| a.0.total_cmp(&b.0));
    println!("\n{:>8}  workflow", "ratio");
    for (ratio, name) in &ratios {
        println!("{:>8.4}  {}", ratio, name);
    }
    println!(
        "\nAll {} round trips verified ({:.2}s compress)",
        ratios.len(),
        elapsed.as_secs_f64()
    );
    Ok(())
}
