//! MetaImage (`.mhd` + `.raw`) output
//!
//! The usual image format for voxelised dosimetry outputs. A small text
//! header describes the geometry and points to a separate binary payload.
//!
//! ```text
//! ObjectType = Image
//! NDims = 3
//! BinaryData = True
//! BinaryDataByteOrderMSB = False
//! CompressedData = False
//! TransformMatrix = 1 0 0 0 1 0 0 0 1
//! Offset = -4.5 -4.5 -4.5
//! CenterOfRotation = 0 0 0
//! AnatomicalOrientation = RAI
//! ElementSpacing = 1 1 1
//! DimSize = 10 10 10
//! ElementType = MET_DOUBLE
//! ElementDataFile = let.raw
//! ```
//!
//! The `Offset` is the centre of the first voxel, not the grid corner.

// standard library
use std::io::Write;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::writer::init_writer;
use crate::VoxelGrid;

// external crates
use byteorder::{LittleEndian, WriteBytesExt};

/// Write a grid as a MetaImage header and raw data file
///
/// The raw file sits next to the header with the same stem, i.e. `let.mhd`
/// is written alongside `let.raw`. Values are little-endian `f64`.
pub fn write_metaimage(grid: &VoxelGrid, path: impl AsRef<Path>) -> Result<()> {
    let header_path = path.as_ref();
    let raw_path = header_path.with_extension("raw");
    let raw_name = raw_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::UnknownGridFormat(header_path.display().to_string()))?;

    write_header(grid, header_path, raw_name)?;
    write_raw(grid, &raw_path)
}

fn write_header(grid: &VoxelGrid, path: &Path, raw_name: &str) -> Result<()> {
    let geometry = grid.geometry();
    let [nx, ny, nz] = geometry.resolution();
    let spacing = geometry.voxel_size();
    let offset = geometry.lower_corner() + spacing / 2.0;

    let mut writer = init_writer(path)?;
    writeln!(writer, "ObjectType = Image")?;
    writeln!(writer, "NDims = 3")?;
    writeln!(writer, "BinaryData = True")?;
    writeln!(writer, "BinaryDataByteOrderMSB = False")?;
    writeln!(writer, "CompressedData = False")?;
    writeln!(writer, "TransformMatrix = 1 0 0 0 1 0 0 0 1")?;
    writeln!(writer, "Offset = {} {} {}", offset.x, offset.y, offset.z)?;
    writeln!(writer, "CenterOfRotation = 0 0 0")?;
    writeln!(writer, "AnatomicalOrientation = RAI")?;
    writeln!(
        writer,
        "ElementSpacing = {} {} {}",
        spacing.x, spacing.y, spacing.z
    )?;
    writeln!(writer, "DimSize = {nx} {ny} {nz}")?;
    writeln!(writer, "ElementType = MET_DOUBLE")?;
    writeln!(writer, "ElementDataFile = {raw_name}")?;
    writer.flush()?;
    Ok(())
}

fn write_raw(grid: &VoxelGrid, path: &Path) -> Result<()> {
    let mut writer = init_writer(path)?;
    for value in grid {
        writer.write_f64::<LittleEndian>(*value)?;
    }
    writer.flush()?;
    Ok(())
}
