//! Text based outputs, mostly for inspection and scripting

// standard library
use std::io::Write;
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::writer::init_writer;
use crate::{GridGeometry, VoxelGrid};

// lettools modules
use lettools_utils::{TripletExt, ValueExt};

// external crates
use serde::Serialize;

/// Borrowed view of a grid for serialisation
#[derive(Serialize)]
struct GridRecord<'a> {
    geometry: &'a GridGeometry,
    values: &'a [f64],
}

/// Write a grid to a JSON file
///
/// This is a direct serialisation of the geometry and the flattened list of
/// voxel values.
///
/// ```text
/// {
///   "geometry": {
///     "resolution": [2, 1, 1],
///     "half_size": [1.0, 0.5, 0.5],
///     "position": [0.0, 0.0, 0.0]
///   },
///   "values": [0.0, 2.5e19]
/// }
/// ```
pub fn write_json(grid: &VoxelGrid, path: impl AsRef<Path>) -> Result<()> {
    let writer = init_writer(path)?;
    let record = GridRecord {
        geometry: grid.geometry(),
        values: grid.values(),
    };
    serde_json::to_writer_pretty(writer, &record)?;
    Ok(())
}

/// Write a grid to a human readable text file
///
/// A short header with the geometry is followed by one line per voxel with
/// the (i,j,k) indices, the voxel centre and the value.
///
/// ```text
/// Resolution: (2, 1, 1)
/// Half-size : (1, 0.5, 0.5)
/// Position  : (0, 0, 0)
///
/// index     i     j     k           x           y           z        value
///     0     0     0     0 -5.0000e-01  0.0000e+00  0.0000e+00  0.00000e+00
///     1     1     0     0  5.0000e-01  0.0000e+00  0.0000e+00  2.50000e+19
/// ```
pub fn write_ascii(grid: &VoxelGrid, path: impl AsRef<Path>) -> Result<()> {
    let geometry = grid.geometry();
    let mut writer = init_writer(path)?;

    writeln!(writer, "Resolution: {}", geometry.resolution().triplet())?;
    writeln!(writer, "Half-size : {}", geometry.half_size().triplet())?;
    writeln!(writer, "Position  : {}", geometry.position().triplet())?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>5} {:>5} {:>5} {:>5} {:>11} {:>11} {:>11} {:>12}",
        "index", "i", "j", "k", "x", "y", "z", "value"
    )?;

    for (index, value) in grid.iter().enumerate() {
        let (i, j, k) = geometry.index_to_ijk(index);
        // the index always comes from the grid itself
        let Some(centre) = geometry.voxel_centre(index) else {
            continue;
        };
        writeln!(
            writer,
            "{index:>5} {i:>5} {j:>5} {k:>5} {:>11} {:>11} {:>11} {:>12}",
            centre.x.sci(4, 2),
            centre.y.sci(4, 2),
            centre.z.sci(4, 2),
            value.sci(5, 2)
        )?;
    }

    writer.flush()?;
    Ok(())
}
