//! Batch accumulation across worker threads

// crate modules
use crate::accumulator::LetAccumulator;
use crate::config::LetConfig;
use crate::error::Result;
use crate::sample::StepSample;

// lettools modules
use lettools_physics::StoppingPower;

// external crates
use log::debug;
use rayon::prelude::*;

/// Accumulate a batch of steps with one private accumulator per worker
///
/// The samples are split into `workers` contiguous chunks (at least one).
/// Each chunk is accumulated on the rayon thread pool by its own
/// [LetAccumulator], and the workers are merged in chunk order before
/// returning. The physics capability is shared by reference.
///
/// Results match serial accumulation up to floating point summation order.
/// Any error from a worker is returned, and under the default
/// [LookupFailurePolicy::Abort](crate::LookupFailurePolicy::Abort) nothing is
/// returned for the batch.
///
/// ```rust
/// # use lettools_accumulator::{accumulate_parallel, LetConfig, StepSample};
/// # use lettools_physics::{Material, StoppingPowerTable};
/// let mut physics = StoppingPowerTable::new();
/// physics.add_material(Material::new("G4_WATER", 1.0)).unwrap();
/// physics.add_curve("proton", "G4_WATER", &[(0.0, 4.0)]).unwrap();
///
/// let config = LetConfig::builder().resolution([4, 1, 1]).build();
/// let samples: Vec<StepSample> = (0..1000)
///     .map(|i| StepSample::new(1.0, 1.0, "proton", "G4_WATER").with_voxel(i % 4))
///     .collect();
///
/// let accumulator = accumulate_parallel(&config, &physics, &samples, 8).unwrap();
/// assert_eq!(accumulator.edep_grid().values(), &[250.0; 4]);
/// assert_eq!(accumulator.stats().recorded, 1000);
/// ```
pub fn accumulate_parallel<'p, P>(
    config: &LetConfig,
    physics: &'p P,
    samples: &[StepSample],
    workers: usize,
) -> Result<LetAccumulator<&'p P>>
where
    P: StoppingPower + Sync,
{
    let workers = workers.max(1);
    let chunk_size = samples.len().div_ceil(workers).max(1);
    debug!(
        "Accumulating {} steps over {} chunks of up to {chunk_size}",
        samples.len(),
        samples.len().div_ceil(chunk_size)
    );

    let partials = samples
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut worker = LetAccumulator::new(config.clone(), physics)?;
            for sample in chunk {
                worker.on_step(sample)?;
            }
            Ok(worker)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut total = LetAccumulator::new(config.clone(), physics)?;
    for worker in &partials {
        total.merge(worker)?;
    }
    Ok(total)
}
