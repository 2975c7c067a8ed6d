//! Tabulated stopping powers with interpolation

// standard library
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::lookup::StoppingPower;
use crate::material::Material;

// lettools modules
use lettools_utils::f;

// external crates
use log::{debug, trace};
use serde::Deserialize;

/// One row of a stopping power CSV file
#[derive(Debug, Deserialize)]
struct CurveRecord {
    particle: String,
    material: String,
    energy: f64,
    dedx: f64,
}

/// Stopping power curve for one particle in one material, sorted by energy
#[derive(Debug, Clone, PartialEq)]
struct Curve {
    energies: Vec<f64>,
    dedx: Vec<f64>,
}

impl Curve {
    /// Interpolate the curve at `energy`
    ///
    /// Log-log between points where everything is positive, otherwise linear.
    /// Energies outside the tabulated range are clamped to the end points.
    fn interpolate(&self, energy: f64) -> f64 {
        let n = self.energies.len();
        if energy <= self.energies[0] {
            return self.dedx[0];
        }
        if energy >= self.energies[n - 1] {
            return self.dedx[n - 1];
        }

        // first point strictly above the energy, guaranteed to be in 1..n
        let hi = self.energies.partition_point(|e| *e <= energy);
        let lo = hi - 1;

        let (x0, x1) = (self.energies[lo], self.energies[hi]);
        let (y0, y1) = (self.dedx[lo], self.dedx[hi]);

        if x0 > 0.0 && y0 > 0.0 && y1 > 0.0 {
            let t = (energy / x0).ln() / (x1 / x0).ln();
            y0 * (y1 / y0).powf(t)
        } else {
            y0 + (y1 - y0) * (energy - x0) / (x1 - x0)
        }
    }
}

/// Particle names are matched case-insensitively and without whitespace
///
/// ```rust
/// # use lettools_physics::normalise_particle;
/// assert_eq!(normalise_particle(" Proton "), "proton");
/// assert_eq!(normalise_particle("GenericIon"), "genericion");
/// ```
pub fn normalise_particle(particle: &str) -> String {
    particle.trim().to_lowercase()
}

/// Stopping power lookup from tabulated curves
///
/// Curves are stored per (particle, material) pair and interpolated in
/// log-log space. Energies below or above the tabulated range use the first
/// or last value respectively.
///
/// Tables may be built programmatically:
///
/// ```rust
/// # use lettools_physics::{Material, StoppingPower, StoppingPowerTable};
/// let mut table = StoppingPowerTable::new();
/// table.add_material(Material::new("G4_WATER", 1.0)).unwrap();
/// table.add_curve("proton", "G4_WATER", &[(1.0, 26.0), (100.0, 0.73)]).unwrap();
///
/// // log-log interpolation at the geometric midpoint
/// let dedx = table.electronic_dedx(10.0, "proton", "G4_WATER").unwrap();
/// assert!((dedx - (26.0_f64 * 0.73).sqrt()).abs() < 1e-12);
///
/// // clamped outside of the tabulated range
/// assert_eq!(table.electronic_dedx(1000.0, "proton", "G4_WATER").unwrap(), 0.73);
/// ```
///
/// or loaded from CSV files with [load_materials()](StoppingPowerTable::load_materials)
/// and [load_curves()](StoppingPowerTable::load_curves):
///
/// ```text
/// name,density
/// G4_WATER,1.0
/// G4_BONE_COMPACT_ICRU,1.85
/// ```
///
/// ```text
/// particle,material,energy,dedx
/// proton,G4_WATER,1.0,26.0
/// proton,G4_WATER,100.0,0.73
/// ```
///
/// Rows for the same particle and material are collected into one curve, so
/// they do not need to be contiguous or sorted.
#[derive(Debug, Default, Clone)]
pub struct StoppingPowerTable {
    materials: HashMap<String, Material>,
    curves: HashMap<(String, String), Curve>,
}

impl StoppingPowerTable {
    /// Empty table, no materials or curves
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material, replacing any existing one with the same name
    ///
    /// Surrounding whitespace is removed from the name, the same as for
    /// lookups.
    pub fn add_material(&mut self, mut material: Material) -> Result<()> {
        material.name = material.name.trim().to_string();
        if !material.has_valid_density() {
            return Err(Error::InvalidDensity {
                name: material.name,
                density: material.density,
            });
        }

        debug!("Registered material {material}");
        self.materials.insert(material.name.clone(), material);
        Ok(())
    }

    /// Add a stopping power curve from `(energy, dedx)` points
    ///
    /// Points may be given in any order but energies must be unique, finite
    /// and non-negative, and there must be at least one point. Replaces any
    /// existing curve for the same particle and material.
    pub fn add_curve(&mut self, particle: &str, material: &str, points: &[(f64, f64)]) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidCurve {
            particle: particle.to_string(),
            material: material.to_string(),
            reason: reason.to_string(),
        };

        if points.is_empty() {
            return Err(invalid("no points"));
        }

        if points
            .iter()
            .any(|(e, d)| !e.is_finite() || !d.is_finite() || *e < 0.0)
        {
            return Err(invalid("energies must be finite and non-negative, dE/dx finite"));
        }

        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        if sorted.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(invalid("duplicate energies"));
        }

        let (energies, dedx) = sorted.into_iter().unzip();
        let key = (normalise_particle(particle), material.trim().to_string());
        debug!(
            "Added {} point stopping power curve for {} in {}",
            points.len(),
            key.0,
            key.1
        );
        self.curves.insert(key, Curve { energies, dedx });
        Ok(())
    }

    /// Read `name,density` rows from any reader
    pub fn read_materials<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut count = 0;
        for record in csv_reader.deserialize() {
            let material: Material = record?;
            self.add_material(material)?;
            count += 1;
        }
        Ok(count)
    }

    /// Read `particle,material,energy,dedx` rows from any reader
    ///
    /// Returns the number of curves read.
    pub fn read_curves<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut grouped: HashMap<(String, String), Vec<(f64, f64)>> = HashMap::new();
        for record in csv_reader.deserialize() {
            let row: CurveRecord = record?;
            grouped
                .entry((row.particle, row.material))
                .or_default()
                .push((row.energy, row.dedx));
        }

        let count = grouped.len();
        for ((particle, material), points) in grouped {
            self.add_curve(&particle, &material, &points)?;
        }
        Ok(count)
    }

    /// Load materials from a CSV file
    pub fn load_materials<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.read_materials(init_reader(path)?)
    }

    /// Load stopping power curves from a CSV file
    pub fn load_curves<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.read_curves(init_reader(path)?)
    }

    /// Convenience for loading both files into a new table
    pub fn from_csv<P: AsRef<Path>>(materials: P, curves: P) -> Result<Self> {
        let mut table = Self::new();
        table.load_materials(materials)?;
        table.load_curves(curves)?;
        Ok(table)
    }

    /// Registered material, if any
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name.trim())
    }

    /// Number of registered materials
    pub fn n_materials(&self) -> usize {
        self.materials.len()
    }

    /// Number of (particle, material) curves
    pub fn n_curves(&self) -> usize {
        self.curves.len()
    }
}

impl StoppingPower for StoppingPowerTable {
    fn electronic_dedx(&self, kinetic_energy: f64, particle: &str, material: &str) -> Result<f64> {
        if !kinetic_energy.is_finite() || kinetic_energy < 0.0 {
            return Err(Error::InvalidEnergy(kinetic_energy));
        }

        let key = (normalise_particle(particle), material.trim().to_string());
        let curve = self
            .curves
            .get(&key)
            .ok_or_else(|| Error::MissingStoppingPower {
                particle: particle.to_string(),
                material: material.to_string(),
            })?;

        let dedx = curve.interpolate(kinetic_energy);
        trace!("{}", f!("dE/dx({kinetic_energy}, {}, {}) = {dedx}", key.0, key.1));
        Ok(dedx)
    }

    fn density(&self, material: &str) -> Result<f64> {
        self.material(material)
            .map(|m| m.density)
            .ok_or_else(|| Error::UnknownMaterial(material.to_string()))
    }
}

/// Initialise a reader from anything that can be turned into a path
fn init_reader(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn water() -> StoppingPowerTable {
        let mut table = StoppingPowerTable::new();
        table.add_material(Material::new("G4_WATER", 1.0)).unwrap();
        table
            .add_curve("proton", "G4_WATER", &[(100.0, 1.0), (1.0, 100.0), (10.0, 10.0)])
            .unwrap();
        table
    }

    #[rstest]
    #[case(0.5, 100.0)]
    #[case(1.0, 100.0)]
    #[case(10.0, 10.0)]
    #[case(250.0, 1.0)]
    fn tabulated_and_clamped(water: StoppingPowerTable, #[case] energy: f64, #[case] expected: f64) {
        let dedx = water.electronic_dedx(energy, "proton", "G4_WATER").unwrap();
        assert_eq!(dedx, expected);
    }

    #[rstest]
    fn log_log_interpolation(water: StoppingPowerTable) {
        // dE/dx = 100/E exactly on this curve, so log-log is exact
        let dedx = water.electronic_dedx(5.0, "proton", "G4_WATER").unwrap();
        assert!((dedx - 20.0).abs() < 1e-10);
    }

    #[rstest]
    fn linear_interpolation_from_zero() {
        let mut table = StoppingPowerTable::new();
        table.add_curve("e-", "G4_AIR", &[(0.0, 2.0), (4.0, 6.0)]).unwrap();
        assert_eq!(table.electronic_dedx(1.0, "e-", "G4_AIR").unwrap(), 3.0);
    }

    #[rstest]
    fn particle_names_are_normalised(water: StoppingPowerTable) {
        let dedx = water.electronic_dedx(10.0, " PROTON", "G4_WATER").unwrap();
        assert_eq!(dedx, 10.0);
    }

    #[rstest]
    fn material_names_are_trimmed() {
        let mut table = StoppingPowerTable::new();
        table.add_material(Material::new(" G4_AIR\t", 0.0012)).unwrap();
        assert_eq!(table.density("G4_AIR").unwrap(), 0.0012);
        assert_eq!(table.density("  G4_AIR ").unwrap(), 0.0012);
        assert_eq!(table.material("G4_AIR").unwrap().name, "G4_AIR");
    }

    #[rstest]
    fn missing_data(water: StoppingPowerTable) {
        assert!(matches!(
            water.electronic_dedx(10.0, "alpha", "G4_WATER"),
            Err(Error::MissingStoppingPower { .. })
        ));
        assert!(matches!(
            water.density("G4_AIR"),
            Err(Error::UnknownMaterial(_))
        ));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_energy(water: StoppingPowerTable, #[case] energy: f64) {
        assert!(matches!(
            water.electronic_dedx(energy, "proton", "G4_WATER"),
            Err(Error::InvalidEnergy(_))
        ));
    }

    #[rstest]
    #[case(&[])]
    #[case(&[(1.0, 2.0), (1.0, 3.0)])]
    #[case(&[(-1.0, 2.0)])]
    #[case(&[(1.0, f64::NAN)])]
    fn invalid_curves(#[case] points: &[(f64, f64)]) {
        let mut table = StoppingPowerTable::new();
        let result = table.add_curve("proton", "G4_WATER", points);
        assert!(matches!(result, Err(Error::InvalidCurve { .. })));
        assert_eq!(table.n_curves(), 0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn invalid_density(#[case] density: f64) {
        let mut table = StoppingPowerTable::new();
        let result = table.add_material(Material::new("bad", density));
        assert!(matches!(result, Err(Error::InvalidDensity { .. })));
    }
}
