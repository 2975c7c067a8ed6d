//! Accumulator configuration

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// crate modules
use crate::builder::LetConfigBuilder;
use crate::error::Result;

// lettools modules
use lettools_grid::GridGeometry;
use lettools_utils::{f, TripletExt};

// external crates
use serde::{Deserialize, Serialize};

/// What to do when a stopping power or density lookup fails for a step
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupFailurePolicy {
    /// Return the error to the caller
    #[default]
    Abort,
    /// Log a warning and drop the step
    Skip,
}

impl std::fmt::Display for LookupFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Abort => "Abort",
            Self::Skip => "Skip",
        };
        write!(f, "{s}")
    }
}

/// Everything needed to set up a [LetAccumulator](crate::LetAccumulator)
///
/// Fields are public for direct use, but [LetConfig::builder()] is usually
/// more convenient. Any field missing from a JSON file takes its default.
///
/// ```rust
/// # use lettools_accumulator::{LetConfig, LookupFailurePolicy};
/// let json = r#"{
///     "resolution": [100, 100, 50],
///     "half_size": [50.0, 50.0, 25.0],
///     "output_path": "output/let.mhd",
///     "lookup_failure": "skip"
/// }"#;
///
/// let config: LetConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.position, [0.0; 3]);
/// assert_eq!(config.lookup_failure, LookupFailurePolicy::Skip);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetConfig {
    /// Number of voxels along each axis
    pub resolution: [i32; 3],
    /// Half-extent of the grid along each axis
    pub half_size: [f64; 3],
    /// Centre of the grid
    pub position: [f64; 3],
    /// Where the final LET grid is written, format chosen by extension
    pub output_path: PathBuf,
    /// Restricted LET flag, accepted but not applied
    pub restricted: bool,
    /// Delta-ray energy cut for restricted LET, accepted but not applied
    pub delta_restricted: f64,
    /// Handling of failed physics lookups
    pub lookup_failure: LookupFailurePolicy,
}

impl LetConfig {
    /// Start a [LetConfigBuilder] from the defaults
    pub fn builder() -> LetConfigBuilder {
        LetConfigBuilder::new()
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validated grid geometry for this configuration
    pub fn geometry(&self) -> Result<GridGeometry> {
        Ok(GridGeometry::new(
            self.resolution,
            self.half_size,
            self.position,
        )?)
    }
}

impl Default for LetConfig {
    fn default() -> Self {
        Self {
            resolution: [1, 1, 1],
            half_size: [1.0, 1.0, 1.0],
            position: [0.0, 0.0, 0.0],
            output_path: PathBuf::from("let.mhd"),
            restricted: false,
            delta_restricted: 0.0,
            lookup_failure: LookupFailurePolicy::default(),
        }
    }
}

impl std::fmt::Display for LetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "LetConfig {\n".to_string();
        s += &f!("    resolution: {}\n", self.resolution.triplet());
        s += &f!("    half-size: {}\n", self.half_size.triplet());
        s += &f!("    position: {}\n", self.position.triplet());
        s += &f!("    output: {}\n", self.output_path.display());
        s += &f!("    restricted: {}\n", self.restricted);
        s += &f!("    lookup failure: {}\n}}", self.lookup_failure);
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;

    #[rstest]
    fn empty_json_is_default() {
        let config: LetConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LetConfig::default());
        assert_eq!(config.output_path, PathBuf::from("let.mhd"));
    }

    #[rstest]
    fn unknown_policy_is_rejected() {
        let result = serde_json::from_str::<LetConfig>(r#"{"lookup_failure": "retry"}"#);
        assert!(result.is_err());
    }

    #[rstest]
    #[case([0, 1, 1], [1.0; 3])]
    #[case([1, 1, 1], [1.0, 0.0, 1.0])]
    fn invalid_geometry(#[case] resolution: [i32; 3], #[case] half_size: [f64; 3]) {
        let config = LetConfig {
            resolution,
            half_size,
            ..Default::default()
        };
        assert!(matches!(config.geometry(), Err(Error::Grid(_))));
    }

    #[rstest]
    fn missing_file() {
        let result = LetConfig::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(Error::IOError(_))));
    }
}
