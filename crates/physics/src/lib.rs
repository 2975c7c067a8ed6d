//! Stopping power lookups and material data
#![doc = include_str!("../readme.md")]

mod error;
mod lookup;
mod material;
mod table;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use lookup::StoppingPower;

#[doc(inline)]
pub use material::Material;

#[doc(inline)]
pub use table::{normalise_particle, StoppingPowerTable};
