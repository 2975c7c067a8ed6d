//! Result and Error types for lettools-accumulator

/// Type alias for Result<T, accumulator::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `lettools-accumulator` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    #[error(transparent)]
    Grid(#[from] lettools_grid::Error),

    #[error("physics lookup failed for {particle} in {material} at {energy}")]
    PhysicsLookup {
        energy: f64,
        particle: String,
        material: String,
        #[source]
        source: lettools_physics::Error,
    },
}
