// standard library
use std::path::PathBuf;

// crate modules
use crate::config::{LetConfig, LookupFailurePolicy};

/// Builder implementation for LetConfig
///
/// The fields of [LetConfig] are left public for direct use but the module
/// also implements a builder for chained setter calls. Any number of
/// parameters can be set this way (including none).
///
/// To get the final [LetConfig] from the builder, call
/// [build()](LetConfigBuilder::build).
///
/// ```rust
/// # use lettools_accumulator::{LetConfig, LookupFailurePolicy};
/// let config = LetConfig::builder()
///     .resolution([60, 60, 120])
///     .half_size([30.0, 30.0, 60.0])
///     .position([0.0, 0.0, 60.0])
///     .output_path("output/let.vtk")
///     .lookup_failure(LookupFailurePolicy::Skip)
///     .build();
///
/// assert_eq!(config.resolution, [60, 60, 120]);
/// assert!(!config.restricted);
/// ```
#[derive(Debug)]
pub struct LetConfigBuilder {
    resolution: [i32; 3],
    half_size: [f64; 3],
    position: [f64; 3],
    output_path: PathBuf,
    restricted: bool,
    delta_restricted: f64,
    lookup_failure: LookupFailurePolicy,
}

impl LetConfigBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [LetConfig] type
    ///
    /// Nothing is validated here, the geometry is checked when the
    /// accumulator is created.
    pub fn build(self) -> LetConfig {
        LetConfig {
            resolution: self.resolution,
            half_size: self.half_size,
            position: self.position,
            output_path: self.output_path,
            restricted: self.restricted,
            delta_restricted: self.delta_restricted,
            lookup_failure: self.lookup_failure,
        }
    }

    /// Number of voxels along each axis
    pub fn resolution(mut self, resolution: [i32; 3]) -> Self {
        self.resolution = resolution;
        self
    }

    /// Half-extent of the grid along each axis
    pub fn half_size(mut self, half_size: [f64; 3]) -> Self {
        self.half_size = half_size;
        self
    }

    /// Centre of the grid
    pub fn position(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }

    /// Output file for the final grid
    ///
    /// The extension decides the format when written with a
    /// [FileWriter](lettools_grid::FileWriter):
    /// - `.mhd` MetaImage (default)
    /// - `.vtk` legacy VTK
    /// - `.vtr` XML VTK
    /// - `.json`
    /// - `.txt`
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Request restricted LET with a delta-ray energy cut
    ///
    /// Accepted for compatibility with existing macros, but the unrestricted
    /// value is always computed.
    pub fn restricted(mut self, delta_restricted: f64) -> Self {
        self.restricted = true;
        self.delta_restricted = delta_restricted;
        self
    }

    /// Handling of failed physics lookups
    pub fn lookup_failure(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_failure = policy;
        self
    }
}

impl Default for LetConfigBuilder {
    fn default() -> Self {
        let config = LetConfig::default();
        Self {
            resolution: config.resolution,
            half_size: config.half_size,
            position: config.position,
            output_path: config.output_path,
            restricted: config.restricted,
            delta_restricted: config.delta_restricted,
            lookup_failure: config.lookup_failure,
        }
    }
}
