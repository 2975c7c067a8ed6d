//! Module for grid geometry and voxel indexing

// crate modules
use crate::error::{Error, Result};

// lettools modules
use lettools_utils::{f, TripletExt};

// external crates
use nalgebra::Vector3;
use serde::Serialize;

/// Shape and placement of a regular voxel grid
///
/// A grid is defined by the number of voxels along each axis (`resolution`),
/// the half-extent of the box it covers (`half_size`), and the position of the
/// box centre (`position`). Every voxel along an axis has the same width of
/// `2 * half_size / resolution`.
///
/// ## Indexing
///
/// Voxels are flattened with x varying fastest:
///
/// ```text
/// index = i + j * nx + k * nx * ny
/// ```
///
/// This is the natural ordering for image formats (MetaImage, VTK cell data),
/// so no re-ordering is needed on output.
///
/// ```rust
/// # use lettools_grid::GridGeometry;
/// let geometry = GridGeometry::new([4, 3, 2], [2.0, 1.5, 1.0], [0.0; 3]).unwrap();
///
/// assert_eq!(geometry.n_voxels(), 24);
/// assert_eq!(geometry.ijk_to_index(1, 2, 1), 1 + 2 * 4 + 1 * 12);
/// assert_eq!(geometry.index_to_ijk(21), (1, 2, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridGeometry {
    /// Number of voxels along each axis
    resolution: [usize; 3],
    /// Half-extent of the grid along each axis
    half_size: Vector3<f64>,
    /// Centre of the grid
    position: Vector3<f64>,
}

impl GridGeometry {
    /// Validate and build a new grid geometry
    ///
    /// Fails if any resolution axis is less than 1 or the total voxel count
    /// is too large to allocate, if any half-size axis is not positive and
    /// finite, or if the position is not finite.
    ///
    /// ```rust
    /// # use lettools_grid::GridGeometry;
    /// assert!(GridGeometry::new([10, 10, 10], [5.0; 3], [0.0; 3]).is_ok());
    /// assert!(GridGeometry::new([10, 0, 10], [5.0; 3], [0.0; 3]).is_err());
    /// assert!(GridGeometry::new([10, 10, 10], [5.0, -1.0, 5.0], [0.0; 3]).is_err());
    /// ```
    pub fn new(resolution: [i32; 3], half_size: [f64; 3], position: [f64; 3]) -> Result<Self> {
        if resolution.iter().any(|n| *n < 1) {
            return Err(Error::InvalidResolution { resolution });
        }

        // the values buffer must also fit in a single allocation
        let max_voxels = isize::MAX as usize / std::mem::size_of::<f64>();
        let n_voxels = resolution
            .iter()
            .try_fold(1_usize, |acc, n| acc.checked_mul(*n as usize))
            .filter(|n| *n <= max_voxels);
        if n_voxels.is_none() {
            return Err(Error::TooManyVoxels { resolution });
        }

        if half_size.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            return Err(Error::InvalidHalfSize { half_size });
        }

        if position.iter().any(|p| !p.is_finite()) {
            return Err(Error::InvalidPosition { position });
        }

        Ok(Self {
            resolution: resolution.map(|n| n as usize),
            half_size: Vector3::from(half_size),
            position: Vector3::from(position),
        })
    }

    /// Number of voxels along each axis
    pub fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    /// Half-extent of the grid along each axis
    pub fn half_size(&self) -> &Vector3<f64> {
        &self.half_size
    }

    /// Centre of the grid
    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    /// Total number of voxels, `nx * ny * nz`
    pub fn n_voxels(&self) -> usize {
        self.resolution.iter().product()
    }

    /// Width of a single voxel along each axis
    ///
    /// ```rust
    /// # use lettools_grid::GridGeometry;
    /// # use nalgebra::Vector3;
    /// let geometry = GridGeometry::new([10, 4, 1], [5.0, 2.0, 0.5], [0.0; 3]).unwrap();
    /// assert_eq!(geometry.voxel_size(), Vector3::new(1.0, 1.0, 1.0));
    /// ```
    pub fn voxel_size(&self) -> Vector3<f64> {
        Vector3::new(
            2.0 * self.half_size.x / self.resolution[0] as f64,
            2.0 * self.half_size.y / self.resolution[1] as f64,
            2.0 * self.half_size.z / self.resolution[2] as f64,
        )
    }

    /// Volume of a single voxel
    pub fn voxel_volume(&self) -> f64 {
        self.voxel_size().product()
    }

    /// Corner of the grid with the smallest coordinates
    pub fn lower_corner(&self) -> Vector3<f64> {
        self.position - self.half_size
    }

    /// Corner of the grid with the largest coordinates
    pub fn upper_corner(&self) -> Vector3<f64> {
        self.position + self.half_size
    }

    /// Voxel boundaries along one axis (0 = x, 1 = y, 2 = z)
    ///
    /// There are always `resolution + 1` boundaries.
    ///
    /// ```rust
    /// # use lettools_grid::GridGeometry;
    /// let geometry = GridGeometry::new([2, 1, 1], [1.0; 3], [5.0, 0.0, 0.0]).unwrap();
    /// assert_eq!(geometry.axis_bounds(0), vec![4.0, 5.0, 6.0]);
    /// assert_eq!(geometry.axis_bounds(1), vec![-1.0, 1.0]);
    /// ```
    pub fn axis_bounds(&self, axis: usize) -> Vec<f64> {
        let lower = self.lower_corner()[axis];
        let width = self.voxel_size()[axis];
        (0..=self.resolution[axis])
            .map(|i| lower + i as f64 * width)
            .collect()
    }

    /// Find the flattened voxel index from (i,j,k) indices
    pub fn ijk_to_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [nx, ny, _] = self.resolution;
        i + j * nx + k * nx * ny
    }

    /// Find the (i,j,k) indices for a flattened voxel index
    ///
    /// The reverse of [ijk_to_index()](GridGeometry::ijk_to_index).
    pub fn index_to_ijk(&self, index: usize) -> (usize, usize, usize) {
        let [nx, ny, _] = self.resolution;
        let k = index / (nx * ny);
        let j = (index - k * nx * ny) / nx;
        let i = index - k * nx * ny - j * nx;
        (i, j, k)
    }

    /// Resolve a position to the flattened index of the voxel containing it
    ///
    /// Voxels are half-open, so a point exactly on the upper face of the grid
    /// is outside. Returns `None` for anything outside the grid, including
    /// non-finite coordinates.
    ///
    /// ```rust
    /// # use lettools_grid::GridGeometry;
    /// # use nalgebra::Vector3;
    /// let geometry = GridGeometry::new([2, 2, 2], [1.0; 3], [0.0; 3]).unwrap();
    ///
    /// assert_eq!(geometry.voxel_index(&Vector3::new(-0.5, -0.5, -0.5)), Some(0));
    /// assert_eq!(geometry.voxel_index(&Vector3::new(0.5, 0.5, 0.5)), Some(7));
    /// assert_eq!(geometry.voxel_index(&Vector3::new(1.0, 0.0, 0.0)), None);
    /// assert_eq!(geometry.voxel_index(&Vector3::new(0.0, -1.5, 0.0)), None);
    /// ```
    pub fn voxel_index(&self, point: &Vector3<f64>) -> Option<usize> {
        let local = point - self.lower_corner();
        let size = self.voxel_size();

        let mut ijk = [0_usize; 3];
        for axis in 0..3 {
            let extent = 2.0 * self.half_size[axis];
            // negated comparison so that NaN is also rejected
            if !(local[axis] >= 0.0 && local[axis] < extent) {
                return None;
            }
            // rounding can push a point just under the upper face into n
            let idx = (local[axis] / size[axis]).floor() as usize;
            ijk[axis] = idx.min(self.resolution[axis] - 1);
        }

        Some(self.ijk_to_index(ijk[0], ijk[1], ijk[2]))
    }

    /// Centre coordinates of a voxel, `None` if the index is out of range
    ///
    /// ```rust
    /// # use lettools_grid::GridGeometry;
    /// # use nalgebra::Vector3;
    /// let geometry = GridGeometry::new([2, 1, 1], [1.0; 3], [0.0; 3]).unwrap();
    /// assert_eq!(geometry.voxel_centre(1), Some(Vector3::new(0.5, 0.0, 0.0)));
    /// assert_eq!(geometry.voxel_centre(2), None);
    /// ```
    pub fn voxel_centre(&self, index: usize) -> Option<Vector3<f64>> {
        if index >= self.n_voxels() {
            return None;
        }

        let (i, j, k) = self.index_to_ijk(index);
        let size = self.voxel_size();
        let offset = Vector3::new(
            (i as f64 + 0.5) * size.x,
            (j as f64 + 0.5) * size.y,
            (k as f64 + 0.5) * size.z,
        );

        Some(self.lower_corner() + offset)
    }
}

impl std::fmt::Display for GridGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [nx, ny, nz] = self.resolution;
        let s = f!(
            "{nx}x{ny}x{nz} voxels, half-size {}, position {}",
            self.half_size.triplet(),
            self.position.triplet()
        );
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn offset_grid() -> GridGeometry {
        // 4x2x1 voxels of 0.5 x 1.0 x 2.0, centred on (10, 0, -1)
        GridGeometry::new([4, 2, 1], [1.0, 1.0, 1.0], [10.0, 0.0, -1.0]).unwrap()
    }

    #[rstest]
    #[case([0, 1, 1])]
    #[case([1, -4, 1])]
    #[case([1, 1, 0])]
    fn rejects_non_positive_resolution(#[case] resolution: [i32; 3]) {
        let result = GridGeometry::new(resolution, [1.0; 3], [0.0; 3]);
        assert!(matches!(result, Err(Error::InvalidResolution { .. })));
    }

    #[rstest]
    #[case([i32::MAX; 3])]
    #[case([i32::MAX, i32::MAX, 1])]
    #[case([1 << 20, 1 << 20, 1 << 20])]
    fn rejects_unallocatable_resolution(#[case] resolution: [i32; 3]) {
        let result = GridGeometry::new(resolution, [1.0; 3], [0.0; 3]);
        assert!(matches!(result, Err(Error::TooManyVoxels { .. })));
    }

    #[rstest]
    #[case([0.0, 1.0, 1.0])]
    #[case([1.0, f64::NAN, 1.0])]
    #[case([1.0, 1.0, f64::INFINITY])]
    fn rejects_bad_half_size(#[case] half_size: [f64; 3]) {
        let result = GridGeometry::new([1, 1, 1], half_size, [0.0; 3]);
        assert!(matches!(result, Err(Error::InvalidHalfSize { .. })));
    }

    #[rstest]
    fn index_round_trip(offset_grid: GridGeometry) {
        for index in 0..offset_grid.n_voxels() {
            let (i, j, k) = offset_grid.index_to_ijk(index);
            assert_eq!(offset_grid.ijk_to_index(i, j, k), index);
        }
    }

    #[rstest]
    #[case([9.1, -0.5, -1.0], Some(0))]
    #[case([9.6, -0.5, -1.0], Some(1))]
    #[case([10.9, 0.5, -0.1], Some(7))]
    #[case([8.9, 0.0, -1.0], None)]
    #[case([11.0, 0.0, -1.0], None)]
    #[case([10.0, 0.0, 0.5], None)]
    fn resolves_positions(
        offset_grid: GridGeometry,
        #[case] point: [f64; 3],
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(offset_grid.voxel_index(&Vector3::from(point)), expected);
    }

    #[rstest]
    fn centres_resolve_to_their_own_voxel(offset_grid: GridGeometry) {
        for index in 0..offset_grid.n_voxels() {
            let centre = offset_grid.voxel_centre(index).unwrap();
            assert_eq!(offset_grid.voxel_index(&centre), Some(index));
        }
    }

    #[rstest]
    fn nan_position_is_outside(offset_grid: GridGeometry) {
        let point = Vector3::new(f64::NAN, 0.0, -1.0);
        assert_eq!(offset_grid.voxel_index(&point), None);
    }

    #[rstest]
    fn voxel_volume(offset_grid: GridGeometry) {
        assert_eq!(offset_grid.voxel_volume(), 1.0);
        assert_eq!(offset_grid.axis_bounds(0), vec![9.0, 9.5, 10.0, 10.5, 11.0]);
    }
}
