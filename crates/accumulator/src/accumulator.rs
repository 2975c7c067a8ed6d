//! The LET accumulator and its lifecycle

// crate modules
use crate::config::{LetConfig, LookupFailurePolicy};
use crate::error::{Error, Result};
use crate::sample::StepSample;
use crate::stats::AccumulatorStats;

// lettools modules
use lettools_grid::{GridGeometry, GridWriter, VoxelGrid};
use lettools_physics::StoppingPower;
use lettools_utils::{f, ValueExt};

// external crates
use itertools::izip;
use log::{debug, info, trace, warn};

/// Charge conversion applied to every LET contribution
///
/// Fixed at `1.6e-19` rather than the CODATA value.
pub const ELEMENTARY_CHARGE: f64 = 1.6e-19;

/// Where the accumulator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// Grids allocated, nothing started yet
    Constructed,
    /// Runs, events or steps are being processed
    ///
    /// Finalising borrows the accumulator mutably and always returns here,
    /// so it has no state of its own.
    Accumulating,
}

/// What happened to a step passed to [on_step()](LetAccumulator::on_step)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Added to the LET and Edep grids
    Recorded,
    /// Weighted energy deposit was exactly zero
    ZeroDeposit,
    /// Voxel index was negative or past the end of the grid
    OutsideGrid,
    /// Physics lookup failed and the policy is to skip
    LookupSkipped,
}

/// Dose-averaged LET accumulator over a voxel grid
///
/// Owns three grids with an identical geometry:
///
/// | Grid  | Contents                                          |
/// | ----- | ------------------------------------------------- |
/// | LET   | `sum(edep * weight * dedx / (density * 1.6e-19))` |
/// | Edep  | `sum(edep * weight)`                              |
/// | Final | `LET / Edep`, zero where nothing was deposited    |
///
/// The physics capability is a generic parameter, so anything implementing
/// [StoppingPower] works, including references and `Arc`s shared between
/// worker accumulators.
///
/// LET and Edep are never cleared by run or event boundaries, only by an
/// explicit [reset()](LetAccumulator::reset).
#[derive(Debug)]
pub struct LetAccumulator<P: StoppingPower> {
    config: LetConfig,
    physics: P,
    let_grid: VoxelGrid,
    edep_grid: VoxelGrid,
    final_grid: VoxelGrid,
    state: AccumulatorState,
    stats: AccumulatorStats,
}

impl<P: StoppingPower> LetAccumulator<P> {
    /// Validate the configuration and allocate zeroed grids
    pub fn new(config: LetConfig, physics: P) -> Result<Self> {
        let geometry = config.geometry()?;

        info!("Allocating LET grids: {geometry}");
        info!("Final LET will be written to {}", config.output_path.display());

        if config.restricted {
            warn!(
                "Restricted LET requested (cut {}), unrestricted LET will be computed",
                config.delta_restricted
            );
        }

        let let_grid = VoxelGrid::allocate(geometry);
        let edep_grid = let_grid.clone();
        let final_grid = let_grid.clone();

        Ok(Self {
            config,
            physics,
            let_grid,
            edep_grid,
            final_grid,
            state: AccumulatorState::Constructed,
            stats: AccumulatorStats::default(),
        })
    }

    /// Hook for the start of a run
    ///
    /// Grids are deliberately left alone so that several runs contribute to
    /// one output.
    pub fn on_run_start(&mut self, run_id: u64) {
        debug!("Run {run_id} started, grids kept from previous runs");
        self.stats.runs += 1;
        self.state = AccumulatorState::Accumulating;
    }

    /// Hook for the start of an event, no effect on the grids
    pub fn on_event_start(&mut self, event_id: u64) {
        trace!("Event {event_id} started");
        self.stats.events += 1;
        self.state = AccumulatorState::Accumulating;
    }

    /// Accumulate a single step
    ///
    /// Both physics lookups happen before any grid is touched, so a failed
    /// lookup never leaves LET and Edep out of step with each other. Whether
    /// that failure is returned or skipped depends on the
    /// [LookupFailurePolicy].
    pub fn on_step(&mut self, sample: &StepSample) -> Result<StepOutcome> {
        self.state = AccumulatorState::Accumulating;

        let outcome = self.process_step(sample);
        if let Ok(o) = &outcome {
            self.stats.record(*o);
        }
        outcome
    }

    fn process_step(&mut self, sample: &StepSample) -> Result<StepOutcome> {
        let weighted = sample.weighted_edep();
        if weighted == 0.0 {
            trace!("Dropped step with zero deposit");
            return Ok(StepOutcome::ZeroDeposit);
        }

        let index = match sample.grid_index() {
            Some(i) if i < self.let_grid.len() => i,
            _ => {
                trace!("Dropped step outside the grid (voxel {})", sample.voxel_index);
                return Ok(StepOutcome::OutsideGrid);
            }
        };

        let contribution = match self.let_contribution(sample, weighted) {
            Ok(value) => value,
            Err(e) => match self.config.lookup_failure {
                LookupFailurePolicy::Abort => return Err(e),
                LookupFailurePolicy::Skip => {
                    warn!("Skipped step: {e}");
                    return Ok(StepOutcome::LookupSkipped);
                }
            },
        };

        trace!(
            "{}",
            f!(
                "voxel {index}: let += {}, edep += {}",
                contribution.sci(5, 2),
                weighted.sci(5, 2)
            )
        );
        self.let_grid.add_value(index, contribution);
        self.edep_grid.add_value(index, weighted);
        Ok(StepOutcome::Recorded)
    }

    /// LET numerator contribution for one step
    fn let_contribution(&self, sample: &StepSample, weighted: f64) -> Result<f64> {
        let energy = sample.mean_energy();
        let lookup_error = |source| Error::PhysicsLookup {
            energy,
            particle: sample.particle.clone(),
            material: sample.material.clone(),
            source,
        };

        let dedx = self
            .physics
            .electronic_dedx(energy, &sample.particle, &sample.material)
            .map_err(lookup_error)?;

        let density = self
            .physics
            .density(&sample.material)
            .map_err(lookup_error)?;

        Ok(weighted * (dedx / (density * ELEMENTARY_CHARGE)))
    }

    /// Reduce LET and Edep into the final grid without writing anything
    ///
    /// Every voxel is overwritten. Voxels with no deposit are set to zero
    /// rather than NaN.
    pub fn compute_final(&mut self) {
        izip!(
            self.final_grid.iter_mut(),
            self.let_grid.iter(),
            self.edep_grid.iter()
        )
        .for_each(|(value, l, e)| *value = if *e != 0.0 { l / e } else { 0.0 });
    }

    /// Compute the final grid and write it to the configured output path
    ///
    /// LET and Edep are kept, so accumulation may continue afterwards. A
    /// failed write is returned but leaves every grid intact, so it is safe
    /// to try again.
    pub fn finalize<W>(&mut self, writer: &W) -> Result<&VoxelGrid>
    where
        W: GridWriter + ?Sized,
    {
        self.compute_final();

        info!("Finalising LET: {}", self.stats);
        let result = self.final_grid.write(&self.config.output_path, writer);
        self.state = AccumulatorState::Accumulating;

        result?;
        info!("Written LET to {}", self.config.output_path.display());
        Ok(&self.final_grid)
    }

    /// Zero the LET and Edep grids
    ///
    /// The final grid keeps whatever the last finalisation produced.
    pub fn reset(&mut self) {
        debug!("Resetting LET and Edep grids");
        self.let_grid.fill(0.0);
        self.edep_grid.fill(0.0);
    }

    /// Add the grids and counts of another accumulator to this one
    ///
    /// Intended for combining per-worker accumulators once every worker has
    /// finished. Nothing is changed if the geometries differ.
    pub fn merge<Q: StoppingPower>(&mut self, other: &LetAccumulator<Q>) -> Result<()> {
        self.let_grid.check_same_geometry(&other.let_grid)?;
        self.edep_grid.check_same_geometry(&other.edep_grid)?;

        self.let_grid.merge(&other.let_grid)?;
        self.edep_grid.merge(&other.edep_grid)?;
        self.stats.merge(&other.stats);

        if self.state == AccumulatorState::Constructed {
            self.state = AccumulatorState::Accumulating;
        }
        Ok(())
    }

    /// Configuration the accumulator was built from
    pub fn config(&self) -> &LetConfig {
        &self.config
    }

    /// Geometry shared by all three grids
    pub fn geometry(&self) -> &GridGeometry {
        self.let_grid.geometry()
    }

    /// The physics capability used for lookups
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// LET numerator grid
    pub fn let_grid(&self) -> &VoxelGrid {
        &self.let_grid
    }

    /// Energy deposit grid
    pub fn edep_grid(&self) -> &VoxelGrid {
        &self.edep_grid
    }

    /// Dose-averaged LET from the most recent reduction
    pub fn final_grid(&self) -> &VoxelGrid {
        &self.final_grid
    }

    /// Current lifecycle state
    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Counts of runs, events and steps so far
    pub fn stats(&self) -> &AccumulatorStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettools_physics::{Error as PhysicsError, Result as PhysicsResult};
    use rstest::{fixture, rstest};

    /// dE/dx equal to the kinetic energy, unit density for water only
    #[derive(Debug)]
    struct LinearPhysics;

    impl StoppingPower for LinearPhysics {
        fn electronic_dedx(&self, energy: f64, _: &str, _: &str) -> PhysicsResult<f64> {
            Ok(energy)
        }

        fn density(&self, material: &str) -> PhysicsResult<f64> {
            match material {
                "G4_WATER" => Ok(1.0),
                _ => Err(PhysicsError::UnknownMaterial(material.to_string())),
            }
        }
    }

    #[fixture]
    fn accumulator() -> LetAccumulator<LinearPhysics> {
        let config = LetConfig::builder().resolution([3, 1, 1]).build();
        LetAccumulator::new(config, LinearPhysics).unwrap()
    }

    fn step(edep: f64, voxel: i64) -> StepSample {
        StepSample::new(edep, 1.0, "proton", "G4_WATER")
            .with_energies(3.0, 1.0)
            .with_voxel(voxel)
    }

    #[rstest]
    fn starts_constructed(accumulator: LetAccumulator<LinearPhysics>) {
        assert_eq!(accumulator.state(), AccumulatorState::Constructed);
        assert_eq!(accumulator.geometry().n_voxels(), 3);
        assert_eq!(accumulator.final_grid().sum(), 0.0);
    }

    #[rstest]
    fn mean_energy_is_used(mut accumulator: LetAccumulator<LinearPhysics>) {
        accumulator.on_step(&step(1.0, 1)).unwrap();
        let expected = 2.0 / ELEMENTARY_CHARGE;
        assert_eq!(accumulator.let_grid().get(1), Some(expected));
        assert_eq!(accumulator.edep_grid().get(1), Some(1.0));
    }

    #[rstest]
    #[case(3)]
    #[case(1000)]
    #[case(-7)]
    fn outside_grid(mut accumulator: LetAccumulator<LinearPhysics>, #[case] voxel: i64) {
        let outcome = accumulator.on_step(&step(1.0, voxel)).unwrap();
        assert_eq!(outcome, StepOutcome::OutsideGrid);
        assert_eq!(accumulator.edep_grid().sum(), 0.0);
        assert_eq!(accumulator.stats().outside_grid, 1);
    }

    #[rstest]
    fn zero_weight_is_zero_deposit(mut accumulator: LetAccumulator<LinearPhysics>) {
        let mut sample = step(1.0, 0);
        sample.weight = 0.0;
        assert_eq!(accumulator.on_step(&sample).unwrap(), StepOutcome::ZeroDeposit);
    }

    #[rstest]
    fn unknown_density_aborts(mut accumulator: LetAccumulator<LinearPhysics>) {
        let mut sample = step(1.0, 0);
        sample.material = "G4_AIR".to_string();

        let result = accumulator.on_step(&sample);
        assert!(matches!(result, Err(Error::PhysicsLookup { .. })));
        assert_eq!(accumulator.let_grid().sum(), 0.0);
        assert_eq!(accumulator.stats().steps(), 0);
    }

    #[rstest]
    fn lifecycle_counts(mut accumulator: LetAccumulator<LinearPhysics>) {
        accumulator.on_run_start(0);
        accumulator.on_event_start(0);
        accumulator.on_event_start(1);
        assert_eq!(accumulator.state(), AccumulatorState::Accumulating);
        assert_eq!(accumulator.stats().runs, 1);
        assert_eq!(accumulator.stats().events, 2);
    }

    #[rstest]
    fn finalize_returns_to_accumulating(mut accumulator: LetAccumulator<LinearPhysics>) {
        struct Discard;
        impl GridWriter for Discard {
            fn write(&self, _: &VoxelGrid, _: &std::path::Path) -> lettools_grid::Result<()> {
                Ok(())
            }
        }

        accumulator.finalize(&Discard).unwrap();
        assert_eq!(accumulator.state(), AccumulatorState::Accumulating);
    }

    #[rstest]
    fn restricted_does_not_change_result() {
        let plain = LetConfig::builder().build();
        let restricted = LetConfig::builder().restricted(0.5).build();

        let mut a = LetAccumulator::new(plain, LinearPhysics).unwrap();
        let mut b = LetAccumulator::new(restricted, LinearPhysics).unwrap();
        a.on_step(&step(2.0, 0)).unwrap();
        b.on_step(&step(2.0, 0)).unwrap();

        assert_eq!(a.let_grid(), b.let_grid());
    }
}
