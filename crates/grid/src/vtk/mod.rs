//! Conversion of voxel grids to VTK formats for plotting
//!
//! Every [VoxelGrid](crate::VoxelGrid) is a regular box, so it maps directly
//! onto a VTK rectilinear grid with one cell per voxel. The flattened voxel
//! ordering (x fastest) is already the VTK cell ordering.
//!
//! ```rust, no_run
//! # use lettools_grid::VoxelGrid;
//! # use lettools_grid::vtk::{grid_to_vtk, write_vtk, VtkFormat};
//! let grid = VoxelGrid::new([10, 10, 10], [5.0; 3], [0.0; 3]).unwrap();
//!
//! // Convert with the default settings and write to a legacy binary file
//! let vtk = grid_to_vtk(&grid);
//! write_vtk(vtk, "let.vtk", VtkFormat::Legacy).unwrap();
//! ```

mod builder;
mod convert;

#[doc(inline)]
pub use builder::GridToVtkBuilder;

#[doc(inline)]
pub use convert::GridToVtk;

// re-exported so that callers do not need vtkio as a direct dependency
#[doc(inline)]
pub use vtkio::model::ByteOrder;

#[doc(inline)]
pub use vtkio::xml::Compressor;

// standard library
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::VoxelGrid;

// external crates
use vtkio::Vtk;

/// Supported VTK output flavours
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VtkFormat {
    /// Legacy `.vtk` binary, using the byte order set on the [Vtk]
    #[default]
    Legacy,
    /// Legacy `.vtk` ASCII
    LegacyAscii,
    /// XML rectilinear grid, `.vtr`
    Xml,
}

/// Convert a [VoxelGrid] to a vtkio `Vtk` with the default settings
///
/// See [GridToVtk] for configuration options.
pub fn grid_to_vtk(grid: &VoxelGrid) -> Vtk {
    GridToVtk::default().convert(grid)
}

/// Write a `Vtk` to a file in one of the [VtkFormat]s
///
/// XML files are compressed with LZMA. For other compression methods use
/// [GridToVtk::write()] with a configured converter.
pub fn write_vtk(vtk: Vtk, path: impl AsRef<Path>, format: VtkFormat) -> Result<()> {
    convert::export(vtk, path.as_ref(), format, Compressor::LZMA)
}
