//! Loading stopping power tables from CSV

use std::io::Cursor;
use std::path::PathBuf;

use lettools_physics::{Error, StoppingPower, StoppingPowerTable};
use rstest::{fixture, rstest};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[fixture]
fn table() -> StoppingPowerTable {
    StoppingPowerTable::from_csv(data("materials.csv"), data("proton_dedx.csv")).unwrap()
}

#[rstest]
fn loads_bundled_data(table: StoppingPowerTable) {
    assert_eq!(table.n_materials(), 3);
    assert_eq!(table.n_curves(), 3);
    assert_eq!(table.density("G4_BONE_COMPACT_ICRU").unwrap(), 1.85);
}

#[rstest]
#[case("proton", "G4_WATER", 100.0, 7.289)]
#[case("Proton", "G4_BONE_COMPACT_ICRU", 10.0, 43.06)]
#[case("e-", "G4_WATER", 0.01, 4.115)]
fn tabulated_values(
    table: StoppingPowerTable,
    #[case] particle: &str,
    #[case] material: &str,
    #[case] energy: f64,
    #[case] expected: f64,
) {
    assert_eq!(table.electronic_dedx(energy, particle, material).unwrap(), expected);
}

#[rstest]
fn interpolated_values_are_bracketed(table: StoppingPowerTable) {
    let dedx = table.electronic_dedx(75.0, "proton", "G4_WATER").unwrap();
    assert!(dedx < 12.45 && dedx > 7.289);
}

#[rstest]
fn unordered_rows_are_grouped() {
    let csv = "particle, material, energy, dedx\n\
               alpha, G4_WATER, 100.0, 20.0\n\
               proton, G4_WATER, 1.0, 260.8\n\
               alpha, G4_WATER, 10.0, 100.0\n";

    let mut table = StoppingPowerTable::new();
    assert_eq!(table.read_curves(Cursor::new(csv)).unwrap(), 2);
    assert_eq!(table.electronic_dedx(10.0, "alpha", "G4_WATER").unwrap(), 100.0);
}

#[rstest]
fn malformed_rows_are_csv_errors() {
    let csv = "particle,material,energy,dedx\nproton,G4_WATER,ten,1.0\n";
    let mut table = StoppingPowerTable::new();
    let result = table.read_curves(Cursor::new(csv));
    assert!(matches!(result, Err(Error::CsvError(_))));
}

#[rstest]
fn invalid_material_rows_are_rejected() {
    let csv = "name,density\nG4_WATER,0.0\n";
    let mut table = StoppingPowerTable::new();
    let result = table.read_materials(Cursor::new(csv));
    assert!(matches!(result, Err(Error::InvalidDensity { .. })));
}

#[rstest]
fn missing_file_is_io_error() {
    let mut table = StoppingPowerTable::new();
    let result = table.load_curves(data("missing.csv"));
    assert!(matches!(result, Err(Error::IOError(_))));
}
