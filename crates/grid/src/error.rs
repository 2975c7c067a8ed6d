//! Result and Error types for lettools-grid

/// Type alias for Result<T, grid::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `lettools-grid` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("vtkio error")]
    VtkioError(#[from] vtkio::Error),

    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    #[error("invalid grid resolution {resolution:?}, every axis must be at least 1")]
    InvalidResolution { resolution: [i32; 3] },

    #[error("grid resolution {resolution:?} has more voxels than can be allocated")]
    TooManyVoxels { resolution: [i32; 3] },

    #[error("invalid grid half-size {half_size:?}, every axis must be positive and finite")]
    InvalidHalfSize { half_size: [f64; 3] },

    #[error("invalid grid position {position:?}, every axis must be finite")]
    InvalidPosition { position: [f64; 3] },

    #[error("grid geometries differ (expected {expected}, found {found})")]
    GeometryMismatch { expected: String, found: String },

    #[error("unable to infer grid format from \"{0}\"")]
    UnknownGridFormat(String),
}
