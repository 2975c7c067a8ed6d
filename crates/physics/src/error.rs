//! Result and Error types for the physics module

/// Type alias for `Result<T, physics::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `lettools-physics`
pub enum Error {
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    #[error("failed CSV operation")]
    CsvError(#[from] csv::Error),

    #[error("material \"{0}\" is not defined")]
    UnknownMaterial(String),

    #[error("no stopping power data for \"{particle}\" in \"{material}\"")]
    MissingStoppingPower { particle: String, material: String },

    #[error("invalid kinetic energy {0}")]
    InvalidEnergy(f64),

    #[error("invalid density {density} for material \"{name}\"")]
    InvalidDensity { name: String, density: f64 },

    #[error("invalid stopping power curve for \"{particle}\" in \"{material}\": {reason}")]
    InvalidCurve {
        particle: String,
        material: String,
        reason: String,
    },

    #[error("stopping power backend failed: {0}")]
    Backend(String),
}
