//! Voxel grids, geometry, and writers
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod geometry;
mod grid;

pub mod vtk;
pub mod writer;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use geometry::GridGeometry;

#[doc(inline)]
pub use grid::VoxelGrid;

#[doc(inline)]
pub use writer::{write_grid, FileWriter, GridFormat, GridWriter};
