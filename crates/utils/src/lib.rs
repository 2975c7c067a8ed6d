//! Common formatting helpers for extended `std` types
//!
//! These are left public for convenience.
//!
//! Consistent scientific notation and compact printing of 3-vectors are used
//! for log messages and text outputs everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod triplet_ext;
mod value_ext;

// Flatten
pub use triplet_ext::TripletExt;
pub use value_ext::ValueExt;
