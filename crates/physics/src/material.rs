//! Material names and densities

// lettools modules
use lettools_utils::ValueExt;

// external crates
use serde::Deserialize;

/// A named material and its mass density
///
/// Names are kept exactly as given (e.g. `G4_WATER`) since they are matched
/// against the names reported by the transport code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Material {
    /// Material name as used by the transport code
    pub name: String,
    /// Mass density
    pub density: f64,
}

impl Material {
    /// New material from a name and density
    pub fn new(name: impl Into<String>, density: f64) -> Self {
        Self {
            name: name.into(),
            density,
        }
    }

    /// Densities must be finite and strictly positive to divide by
    pub fn has_valid_density(&self) -> bool {
        self.density.is_finite() && self.density > 0.0
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.density.sci(4, 2))
    }
}
