//! The physics capability consumed by the accumulator

// standard library
use std::sync::Arc;

// crate modules
use crate::error::Result;

/// Electronic stopping power and material density lookups
///
/// This is passed to the accumulator as a capability rather than living in
/// some global calculator, so any backend (or a test double) can be used.
///
/// ```rust
/// # use lettools_physics::{Result, StoppingPower};
/// /// Same stopping power for everything, water-like density
/// struct Constant(f64);
///
/// impl StoppingPower for Constant {
///     fn electronic_dedx(&self, _energy: f64, _particle: &str, _material: &str) -> Result<f64> {
///         Ok(self.0)
///     }
///
///     fn density(&self, _material: &str) -> Result<f64> {
///         Ok(1.0)
///     }
/// }
///
/// let physics = Constant(4.0);
/// assert_eq!(physics.electronic_dedx(150.0, "proton", "G4_WATER").unwrap(), 4.0);
/// ```
pub trait StoppingPower {
    /// Electronic dE/dx of `particle` with `kinetic_energy` in `material`
    fn electronic_dedx(&self, kinetic_energy: f64, particle: &str, material: &str) -> Result<f64>;

    /// Mass density of `material`
    fn density(&self, material: &str) -> Result<f64>;
}

impl<T: StoppingPower + ?Sized> StoppingPower for &T {
    fn electronic_dedx(&self, kinetic_energy: f64, particle: &str, material: &str) -> Result<f64> {
        (**self).electronic_dedx(kinetic_energy, particle, material)
    }

    fn density(&self, material: &str) -> Result<f64> {
        (**self).density(material)
    }
}

impl<T: StoppingPower + ?Sized> StoppingPower for Box<T> {
    fn electronic_dedx(&self, kinetic_energy: f64, particle: &str, material: &str) -> Result<f64> {
        (**self).electronic_dedx(kinetic_energy, particle, material)
    }

    fn density(&self, material: &str) -> Result<f64> {
        (**self).density(material)
    }
}

impl<T: StoppingPower + ?Sized> StoppingPower for Arc<T> {
    fn electronic_dedx(&self, kinetic_energy: f64, particle: &str, material: &str) -> Result<f64> {
        (**self).electronic_dedx(kinetic_energy, particle, material)
    }

    fn density(&self, material: &str) -> Result<f64> {
        (**self).density(material)
    }
}
