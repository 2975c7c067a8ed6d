//! Writers for persisting voxel grids
//!
//! Anything that implements [GridWriter] can be handed a grid and a path. The
//! [FileWriter] is the general purpose implementation that picks a
//! [GridFormat] from the file extension, but each format is also available as
//! a free function.
//!
//! ```rust, no_run
//! # use lettools_grid::{write_grid, VoxelGrid};
//! # use lettools_grid::writer::{write_ascii, write_json, write_metaimage};
//! let grid = VoxelGrid::new([10, 10, 10], [5.0; 3], [0.0; 3]).unwrap();
//!
//! // Format inferred from the extension
//! write_grid(&grid, "let.mhd").unwrap();
//!
//! // Or chosen explicitly
//! write_metaimage(&grid, "let.mhd").unwrap();
//! write_json(&grid, "let.json").unwrap();
//! write_ascii(&grid, "let.txt").unwrap();
//! ```

mod metaimage;
mod text;

#[doc(inline)]
pub use metaimage::write_metaimage;

#[doc(inline)]
pub use text::{write_ascii, write_json};

// standard library
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::vtk::{GridToVtk, VtkFormat};
use crate::VoxelGrid;

// external crates
use log::info;

/// Persists a [VoxelGrid] somewhere
///
/// The accumulator only ever needs this one operation, so tests and other
/// front ends can swap in their own storage.
pub trait GridWriter {
    /// Write `grid` to `path`
    fn write(&self, grid: &VoxelGrid, path: &Path) -> Result<()>;
}

impl<T: GridWriter + ?Sized> GridWriter for &T {
    fn write(&self, grid: &VoxelGrid, path: &Path) -> Result<()> {
        (**self).write(grid, path)
    }
}

impl<T: GridWriter + ?Sized> GridWriter for Box<T> {
    fn write(&self, grid: &VoxelGrid, path: &Path) -> Result<()> {
        (**self).write(grid, path)
    }
}

/// Output file formats for voxel grids
///
/// The `FromStr` trait is implemented for the usual file extensions.
///
/// ```rust
/// # use lettools_grid::GridFormat;
/// # use std::str::FromStr;
/// assert_eq!(GridFormat::from_str("mhd").unwrap(), GridFormat::MetaImage);
/// assert_eq!(GridFormat::from_str(".VTR").unwrap(), GridFormat::VtkXml);
/// assert!(GridFormat::from_str("png").is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat {
    /// MetaImage `.mhd` header with a raw little-endian `f64` payload
    #[default]
    MetaImage,
    /// Legacy binary VTK rectilinear grid, `.vtk`
    Vtk,
    /// XML VTK rectilinear grid, `.vtr`
    VtkXml,
    /// Geometry and values as JSON, `.json`
    Json,
    /// Human readable listing of every voxel, `.txt`
    Ascii,
}

impl GridFormat {
    /// Infer the format from the extension of a path
    ///
    /// ```rust
    /// # use lettools_grid::GridFormat;
    /// assert_eq!(GridFormat::from_path("out/let.vtk").unwrap(), GridFormat::Vtk);
    /// assert!(GridFormat::from_path("out/let").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext.parse(),
            None => Err(Error::UnknownGridFormat(path.display().to_string())),
        }
    }

    /// Usual file extension for the format, without the dot
    pub fn extension(&self) -> &str {
        match self {
            GridFormat::MetaImage => "mhd",
            GridFormat::Vtk => "vtk",
            GridFormat::VtkXml => "vtr",
            GridFormat::Json => "json",
            GridFormat::Ascii => "txt",
        }
    }
}

impl std::str::FromStr for GridFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "mhd" => Ok(GridFormat::MetaImage),
            "vtk" => Ok(GridFormat::Vtk),
            "vtr" => Ok(GridFormat::VtkXml),
            "json" => Ok(GridFormat::Json),
            "txt" | "dat" => Ok(GridFormat::Ascii),
            _ => Err(Error::UnknownGridFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for GridFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// General purpose file writer
///
/// Writes to whichever [GridFormat] is set, or infers one from the path when
/// left as `None`. VTK outputs use the `vtk` converter settings.
///
/// ```rust, no_run
/// # use lettools_grid::{FileWriter, GridFormat, GridWriter, VoxelGrid};
/// # use lettools_grid::vtk::GridToVtk;
/// # use std::path::Path;
/// let grid = VoxelGrid::new([10, 10, 10], [5.0; 3], [0.0; 3]).unwrap();
///
/// let writer = FileWriter {
///     format: Some(GridFormat::VtkXml),
///     vtk: GridToVtk::builder().name("LET").build(),
/// };
/// writer.write(&grid, Path::new("let.vtr")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct FileWriter {
    /// Explicit output format, inferred from the extension if `None`
    pub format: Option<GridFormat>,
    /// Settings for VTK outputs
    pub vtk: GridToVtk,
}

impl FileWriter {
    /// Writer that always uses one format
    pub fn with_format(format: GridFormat) -> Self {
        Self {
            format: Some(format),
            ..Default::default()
        }
    }
}

impl GridWriter for FileWriter {
    fn write(&self, grid: &VoxelGrid, path: &Path) -> Result<()> {
        let format = match self.format {
            Some(format) => format,
            None => GridFormat::from_path(path)?,
        };

        info!("Writing {} voxel grid to {}", format, path.display());
        match format {
            GridFormat::MetaImage => write_metaimage(grid, path),
            GridFormat::Vtk => self.vtk.write(grid, path, VtkFormat::Legacy),
            GridFormat::VtkXml => self.vtk.write(grid, path, VtkFormat::Xml),
            GridFormat::Json => write_json(grid, path),
            GridFormat::Ascii => write_ascii(grid, path),
        }
    }
}

/// Write a grid with the format inferred from the file extension
pub fn write_grid(grid: &VoxelGrid, path: impl AsRef<Path>) -> Result<()> {
    FileWriter::default().write(grid, path.as_ref())
}

/// Initialise a buffered writer from anything that can be turned into a path
fn init_writer(path: impl AsRef<Path>) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
