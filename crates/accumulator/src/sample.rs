//! Per-step quantities handed over by the transport code

// lettools modules
use lettools_grid::GridGeometry;

// external crates
use nalgebra::Vector3;

/// Everything the accumulator needs to know about one tracked step
///
/// The voxel index is signed so that the transport side can report "not in
/// the grid" as any negative value, which is how most navigators flag a
/// failed lookup. Samples start outside the grid until a voxel is set with
/// [with_voxel()](StepSample::with_voxel) or resolved from a position with
/// [locate()](StepSample::locate).
///
/// ```rust
/// # use lettools_accumulator::StepSample;
/// # use lettools_grid::GridGeometry;
/// let geometry = GridGeometry::new([2, 2, 2], [1.0; 3], [0.0; 3]).unwrap();
///
/// let step = StepSample::new(0.5, 2.0, "proton", "G4_WATER")
///     .with_energies(100.0, 98.0)
///     .locate(&geometry, [0.5, 0.5, 0.5]);
///
/// assert_eq!(step.voxel_index, 7);
/// assert_eq!(step.weighted_edep(), 1.0);
/// assert_eq!(step.mean_energy(), 99.0);
///
/// let stray = step.clone().locate(&geometry, [0.0, 0.0, 5.0]);
/// assert_eq!(stray.voxel_index, -1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StepSample {
    /// Flattened voxel index, negative if outside the grid
    pub voxel_index: i64,
    /// Energy deposited along the step
    pub edep: f64,
    /// Statistical weight of the track
    pub weight: f64,
    /// Kinetic energy at the start of the step
    pub pre_kinetic_energy: f64,
    /// Kinetic energy at the end of the step
    pub post_kinetic_energy: f64,
    /// Particle name, e.g. `proton`
    pub particle: String,
    /// Name of the material the step happened in
    pub material: String,
}

impl StepSample {
    /// New sample outside the grid with zero kinetic energy
    pub fn new(
        edep: f64,
        weight: f64,
        particle: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        Self {
            voxel_index: -1,
            edep,
            weight,
            pre_kinetic_energy: 0.0,
            post_kinetic_energy: 0.0,
            particle: particle.into(),
            material: material.into(),
        }
    }

    /// Set the pre- and post-step kinetic energies
    pub fn with_energies(mut self, pre: f64, post: f64) -> Self {
        self.pre_kinetic_energy = pre;
        self.post_kinetic_energy = post;
        self
    }

    /// Set the flattened voxel index directly
    pub fn with_voxel(mut self, index: i64) -> Self {
        self.voxel_index = index;
        self
    }

    /// Resolve the voxel index from a position, `-1` if outside the grid
    pub fn locate(mut self, geometry: &GridGeometry, position: impl Into<Vector3<f64>>) -> Self {
        self.voxel_index = geometry
            .voxel_index(&position.into())
            .and_then(|i| i64::try_from(i).ok())
            .unwrap_or(-1);
        self
    }

    /// Deposit scaled by the statistical weight
    pub fn weighted_edep(&self) -> f64 {
        self.edep * self.weight
    }

    /// Kinetic energy used for the stopping power lookup
    pub fn mean_energy(&self) -> f64 {
        (self.pre_kinetic_energy + self.post_kinetic_energy) / 2.0
    }

    /// The voxel index as a grid index, `None` if negative
    pub fn grid_index(&self) -> Option<usize> {
        usize::try_from(self.voxel_index).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1, None)]
    #[case(i64::MIN, None)]
    #[case(0, Some(0))]
    #[case(42, Some(42))]
    fn grid_index(#[case] voxel: i64, #[case] expected: Option<usize>) {
        let sample = StepSample::new(1.0, 1.0, "proton", "G4_WATER").with_voxel(voxel);
        assert_eq!(sample.grid_index(), expected);
    }

    #[rstest]
    fn defaults_to_outside() {
        let sample = StepSample::new(1.0, 1.0, "proton", "G4_WATER");
        assert_eq!(sample.voxel_index, -1);
        assert_eq!(sample.mean_energy(), 0.0);
    }

    #[rstest]
    fn negative_weight_is_not_special() {
        let sample = StepSample::new(2.0, -0.5, "e-", "G4_AIR");
        assert_eq!(sample.weighted_edep(), -1.0);
    }
}
