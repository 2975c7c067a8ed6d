// standard library
use std::ops::RangeInclusive;
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::vtk::{ByteOrder, Compressor, GridToVtkBuilder, VtkFormat};
use crate::VoxelGrid;

// external crates
use log::debug;
use vtkio::model::{
    Attribute, Attributes, Coordinates, DataArray, DataSet, ElementType, Extent, IOBuffer,
    RangeExtent, RectilinearGridPiece, Version, Vtk,
};

/// Convert voxel grids to vtk formats for plotting
///
/// The fields remain public for direct use, but for convenience and style
/// preference a builder pattern is also implemented.
///
/// ```rust
/// # use lettools_grid::VoxelGrid;
/// # use lettools_grid::vtk::GridToVtk;
/// let grid = VoxelGrid::new([2, 2, 2], [1.0; 3], [0.0; 3]).unwrap();
///
/// let converter = GridToVtk::builder().name("LET").build();
/// let vtk = converter.convert(&grid);
/// assert_eq!(vtk.title, "Voxel grid");
/// ```
///
/// Byte ordering is important for binary file compatability with plotting
/// software. ParaView does not care, but something like Visit only likes big
/// endian. This is the default.
#[derive(Debug, PartialEq)]
pub struct GridToVtk {
    /// Name of the cell data array
    pub name: String,
    /// Title written into the file header
    pub title: String,
    /// Byte ordering as big or little endian
    pub byte_order: ByteOrder,
    /// Compression method for xml file formats
    pub compressor: Compressor,
}

// Public API
impl GridToVtk {
    /// Start with the default configuration
    pub fn new() -> GridToVtk {
        Default::default()
    }

    /// Get an instance of the [GridToVtkBuilder]
    pub fn builder() -> GridToVtkBuilder {
        GridToVtkBuilder::default()
    }

    /// Convert a [VoxelGrid] to vtkio::Vtk object
    pub fn convert(&self, grid: &VoxelGrid) -> Vtk {
        Vtk {
            version: Version::Auto,
            title: self.title.clone(),
            byte_order: self.byte_order,
            file_path: None,
            data: DataSet::inline(RectilinearGridPiece {
                extent: Self::extent(grid),
                coords: Self::coordinates(grid),
                data: self.attributes(grid),
            }),
        }
    }

    /// Convert and write a [VoxelGrid] in one go
    pub fn write(&self, grid: &VoxelGrid, path: &Path, format: VtkFormat) -> Result<()> {
        export(self.convert(grid), path, format, self.compressor)
    }
}

impl Default for GridToVtk {
    fn default() -> Self {
        GridToVtkBuilder::default().build()
    }
}

impl GridToVtk {
    /// Defines number of voxels in each extent for the rectilinear grid
    fn extent(grid: &VoxelGrid) -> Extent {
        let [nx, ny, nz] = grid.geometry().resolution();
        let range_ext: RangeExtent = [
            RangeInclusive::new(0, nx as i32),
            RangeInclusive::new(0, ny as i32),
            RangeInclusive::new(0, nz as i32),
        ];
        Extent::Ranges(range_ext)
    }

    /// Defines coordiantes for rectilinear grid from the voxel bounds
    fn coordinates(grid: &VoxelGrid) -> Coordinates {
        let geometry = grid.geometry();
        Coordinates {
            x: IOBuffer::F64(geometry.axis_bounds(0)),
            y: IOBuffer::F64(geometry.axis_bounds(1)),
            z: IOBuffer::F64(geometry.axis_bounds(2)),
        }
    }

    /// One scalar cell array, already in VTK cell order
    fn attributes(&self, grid: &VoxelGrid) -> Attributes {
        let mut attributes: Attributes = Attributes::new();
        let cell_data = DataArray {
            name: self.name.clone(),
            elem: ElementType::Scalars {
                num_comp: 1,
                lookup_table: None,
            },
            data: IOBuffer::F64(grid.values().to_vec()),
        };
        attributes.cell.push(Attribute::DataArray(cell_data));
        attributes
    }
}

/// Shared export logic for all the VTK flavours
pub(crate) fn export(
    vtk: Vtk,
    path: &Path,
    format: VtkFormat,
    compressor: Compressor,
) -> Result<()> {
    debug!("Writing {format:?} VTK to {}", path.display());
    match format {
        VtkFormat::Legacy => match vtk.byte_order {
            ByteOrder::BigEndian => vtk.export_be(path)?,
            ByteOrder::LittleEndian => vtk.export_le(path)?,
        },
        VtkFormat::LegacyAscii => vtk.export_ascii(path)?,
        VtkFormat::Xml => vtk
            .try_into_xml_format(compressor, 9)
            .and_then(|xml| xml.export(path))
            .map_err(vtkio::Error::from)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtkio::model::Piece;

    #[test]
    fn rectilinear_layout() {
        let mut grid = VoxelGrid::new([2, 1, 1], [1.0, 0.5, 0.5], [1.0, 0.0, 0.0]).unwrap();
        grid.add_value(1, 7.0);

        let vtk = GridToVtk::builder().name("LET").build().convert(&grid);

        let DataSet::RectilinearGrid { pieces, .. } = vtk.data else {
            panic!("expected a rectilinear grid");
        };
        let Piece::Inline(piece) = &pieces[0] else {
            panic!("expected inline piece data");
        };

        assert_eq!(piece.coords.x, IOBuffer::F64(vec![0.0, 1.0, 2.0]));
        assert_eq!(piece.coords.y, IOBuffer::F64(vec![-0.5, 0.5]));

        let Attribute::DataArray(array) = &piece.data.cell[0] else {
            panic!("expected a data array");
        };
        assert_eq!(array.name, "LET");
        assert_eq!(array.data, IOBuffer::F64(vec![0.0, 7.0]));
    }
}
