//! Integration tests for grid file outputs

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use byteorder::{LittleEndian, ReadBytesExt};
use lettools_grid::{write_grid, Error, FileWriter, GridFormat, GridWriter, VoxelGrid};
use rstest::{fixture, rstest};

/// Unique scratch path so tests can run in parallel
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lettools-grid-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[fixture]
fn grid() -> VoxelGrid {
    // 2x1x1 voxels, each 1.0 wide in x, centred on (1, 0, 0)
    let mut grid = VoxelGrid::new([2, 1, 1], [1.0, 0.5, 0.5], [1.0, 0.0, 0.0]).unwrap();
    grid.add_value(0, 0.25);
    grid.add_value(1, 2.5e19);
    grid
}

#[rstest]
fn metaimage_header_and_payload(grid: VoxelGrid) {
    let path = scratch("metaimage.mhd");
    write_grid(&grid, &path).unwrap();

    let header = fs::read_to_string(&path).unwrap();
    assert!(header.contains("DimSize = 2 1 1"));
    assert!(header.contains("ElementSpacing = 1 1 1"));
    assert!(header.contains("Offset = 0.5 0 0"));
    assert!(header.contains("ElementType = MET_DOUBLE"));
    assert!(header.contains("ElementDataFile = metaimage.raw"));

    let bytes = fs::read(path.with_extension("raw")).unwrap();
    assert_eq!(bytes.len(), 2 * std::mem::size_of::<f64>());

    let mut cursor = Cursor::new(bytes);
    assert_eq!(cursor.read_f64::<LittleEndian>().unwrap(), 0.25);
    assert_eq!(cursor.read_f64::<LittleEndian>().unwrap(), 2.5e19);
}

#[rstest]
fn json_values(grid: VoxelGrid) {
    let path = scratch("grid.json");
    write_grid(&grid, &path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["values"][0], 0.25);
    assert_eq!(json["values"][1], 2.5e19);
    assert_eq!(json["geometry"]["resolution"][0], 2);
}

#[rstest]
fn ascii_listing(grid: VoxelGrid) {
    let path = scratch("grid.txt");
    write_grid(&grid, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Resolution: (2, 1, 1)"));
    assert!(text.contains("2.50000e+19"));
    // three header lines, a blank line, column names, then one per voxel
    assert_eq!(text.lines().count(), 5 + 2);
}

#[rstest]
fn explicit_format_ignores_extension(grid: VoxelGrid) {
    let path = scratch("explicit.out");
    let writer = FileWriter::with_format(GridFormat::Json);
    grid.write(&path, &writer).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["values"].as_array().unwrap().len(), 2);
}

#[rstest]
#[case("grid.png")]
#[case("grid")]
fn unknown_extension(grid: VoxelGrid, #[case] name: &str) {
    let result = write_grid(&grid, scratch(name));
    assert!(matches!(result, Err(Error::UnknownGridFormat(_))));
}

#[rstest]
fn missing_directory_is_io_error(grid: VoxelGrid) {
    let path = scratch("does-not-exist").join("grid.mhd");
    let result = FileWriter::default().write(&grid, &path);
    assert!(matches!(result, Err(Error::IOError(_))));
}
