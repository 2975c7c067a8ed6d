//! Module for dense voxel grid data and implementations

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::geometry::GridGeometry;
use crate::writer::GridWriter;

// lettools modules
use lettools_utils::{f, TripletExt, ValueExt};

// external crates
use log::debug;

/// Dense 3D array of `f64` values addressed by a flattened voxel index
///
/// The [GridGeometry] is fixed when the grid is allocated and every value
/// starts at zero. Values are then only changed in place, either all at once
/// with [fill()](VoxelGrid::fill) or one voxel at a time with
/// [add_value()](VoxelGrid::add_value).
///
/// ```rust
/// # use lettools_grid::{GridGeometry, VoxelGrid};
/// let geometry = GridGeometry::new([3, 1, 1], [1.5, 0.5, 0.5], [0.0; 3]).unwrap();
/// let mut grid = VoxelGrid::allocate(geometry);
///
/// // Anything outside the index range is ignored and reported as a no-op
/// assert!(grid.add_value(1, 4.0));
/// assert!(!grid.add_value(3, 1.0));
/// assert_eq!(grid.values(), &[0.0, 4.0, 0.0]);
///
/// // Zero everything again
/// grid.fill(0.0);
/// assert_eq!(grid.sum(), 0.0);
/// ```
///
/// Grids of the same geometry are safe to iterate in lockstep, since index
/// `i` always refers to the same physical voxel.
///
/// ```rust
/// # use lettools_grid::{GridGeometry, VoxelGrid};
/// # let geometry = GridGeometry::new([3, 1, 1], [1.5, 0.5, 0.5], [0.0; 3]).unwrap();
/// let mut a = VoxelGrid::allocate(geometry.clone());
/// let mut b = VoxelGrid::allocate(geometry);
/// a.fill(2.0);
/// b.fill(3.0);
///
/// let product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
/// assert_eq!(product, 18.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    geometry: GridGeometry,
    values: Vec<f64>,
}

impl VoxelGrid {
    /// Allocate a zero-filled grid for the given geometry
    pub fn allocate(geometry: GridGeometry) -> Self {
        let values = vec![0.0; geometry.n_voxels()];
        Self { geometry, values }
    }

    /// Validate a geometry and allocate a zero-filled grid for it
    ///
    /// Convenience for [GridGeometry::new()] followed by
    /// [allocate()](VoxelGrid::allocate).
    pub fn new(resolution: [i32; 3], half_size: [f64; 3], position: [f64; 3]) -> Result<Self> {
        let geometry = GridGeometry::new(resolution, half_size, position)?;
        Ok(Self::allocate(geometry))
    }

    /// Shape and placement of the grid
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Number of voxels in the grid
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a valid geometry, included for completeness
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set every voxel to `value`
    pub fn fill(&mut self, value: f64) {
        self.values.iter_mut().for_each(|v| *v = value);
    }

    /// Add `delta` to the voxel at `index`
    ///
    /// Returns `false` without touching the grid if the index is outside the
    /// range of this grid.
    pub fn add_value(&mut self, index: usize, delta: f64) -> bool {
        match self.values.get_mut(index) {
            Some(value) => {
                *value += delta;
                true
            }
            None => {
                debug!(
                    "Ignored value for voxel {index}, grid only has {} voxels",
                    self.values.len()
                );
                false
            }
        }
    }

    /// Value of the voxel at `index`, if it exists
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// All voxel values in flattened index order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over voxel values in flattened index order
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    /// Mutably iterate over voxel values in flattened index order
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, f64> {
        self.values.iter_mut()
    }

    /// Sum of every voxel value
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest voxel value, ignoring any NaN
    ///
    /// ```rust
    /// # use lettools_grid::VoxelGrid;
    /// let mut grid = VoxelGrid::new([2, 1, 1], [1.0; 3], [0.0; 3]).unwrap();
    /// grid.add_value(0, -3.0);
    /// grid.add_value(1, f64::NAN);
    /// assert_eq!(grid.maximum(), -3.0);
    /// ```
    pub fn maximum(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of voxels holding a non-zero value
    pub fn non_zero_count(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Make sure another grid describes exactly the same voxels
    pub fn check_same_geometry(&self, other: &VoxelGrid) -> Result<()> {
        if self.geometry != other.geometry {
            return Err(Error::GeometryMismatch {
                expected: self.geometry.to_string(),
                found: other.geometry.to_string(),
            });
        }
        Ok(())
    }

    /// Element-wise addition of another grid with an identical geometry
    ///
    /// Used to combine grids that were filled independently, for example by
    /// separate worker threads.
    ///
    /// ```rust
    /// # use lettools_grid::VoxelGrid;
    /// let mut a = VoxelGrid::new([2, 1, 1], [1.0; 3], [0.0; 3]).unwrap();
    /// let mut b = a.clone();
    /// a.add_value(0, 1.0);
    /// b.add_value(0, 2.0);
    /// b.add_value(1, 5.0);
    ///
    /// a.merge(&b).unwrap();
    /// assert_eq!(a.values(), &[3.0, 5.0]);
    /// ```
    pub fn merge(&mut self, other: &VoxelGrid) -> Result<()> {
        self.check_same_geometry(other)?;
        self.values
            .iter_mut()
            .zip(other.values.iter())
            .for_each(|(a, b)| *a += b);
        Ok(())
    }

    /// Write the grid to `path` with the given writer
    pub fn write<W>(&self, path: impl AsRef<Path>, writer: &W) -> Result<()>
    where
        W: GridWriter + ?Sized,
    {
        writer.write(self, path.as_ref())
    }
}

impl<'a> IntoIterator for &'a VoxelGrid {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl std::fmt::Display for VoxelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [nx, ny, nz] = self.geometry.resolution();
        let mut s = "VoxelGrid {\n".to_string();
        s += &f!("    voxels: {} ({nx}x{ny}x{nz})\n", self.len());
        s += &f!("    half-size: {}\n", self.geometry.half_size().triplet());
        s += &f!("    position: {}\n", self.geometry.position().triplet());
        s += &f!("    non-zero: {}\n", self.non_zero_count());
        s += &f!("    sum: {}\n}}", self.sum().sci(5, 2));
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn grid() -> VoxelGrid {
        VoxelGrid::new([2, 2, 1], [1.0; 3], [0.0; 3]).unwrap()
    }

    #[rstest]
    fn allocated_with_zeros(grid: VoxelGrid) {
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|v| *v == 0.0));
    }

    #[rstest]
    fn add_value_accumulates(mut grid: VoxelGrid) {
        assert!(grid.add_value(3, 1.5));
        assert!(grid.add_value(3, 2.5));
        assert_eq!(grid.get(3), Some(4.0));
        assert_eq!(grid.non_zero_count(), 1);
    }

    #[rstest]
    fn add_value_out_of_range_is_noop(mut grid: VoxelGrid) {
        let before = grid.clone();
        assert!(!grid.add_value(4, 1.0));
        assert!(!grid.add_value(usize::MAX, 1.0));
        assert_eq!(grid, before);
    }

    #[rstest]
    fn merge_rejects_other_geometry(mut grid: VoxelGrid) {
        let other = VoxelGrid::new([2, 2, 1], [1.0; 3], [0.0, 0.0, 1.0]).unwrap();
        assert!(matches!(
            grid.merge(&other),
            Err(Error::GeometryMismatch { .. })
        ));
        assert_eq!(grid.sum(), 0.0);
    }

    #[rstest]
    fn display_summary(mut grid: VoxelGrid) {
        grid.add_value(0, 2.0);
        let s = grid.to_string();
        assert!(s.contains("voxels: 4 (2x2x1)"));
        assert!(s.contains("non-zero: 1"));
        assert!(s.contains("sum: 2.00000e+00"));
    }
}
