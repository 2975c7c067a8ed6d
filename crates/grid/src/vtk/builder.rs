// internal modules
use crate::vtk::convert::GridToVtk;
use crate::vtk::{ByteOrder, Compressor};

/// Builder implementation for GridToVtk configuration
///
/// The fields of [GridToVtk] are left public for direct use but the module
/// also implements a builder for chained setter calls. Any number of
/// parameters can be set this way (including none).
///
/// To get the final [GridToVtk] from the builder, call
/// [build()](GridToVtkBuilder::build).
///
/// ```rust
/// # use lettools_grid::vtk::{ByteOrder, Compressor, GridToVtk};
/// let converter = GridToVtk::builder()
///     .name("Dose-averaged LET")
///     .title("LET actor output")
///     .byte_order(ByteOrder::LittleEndian)
///     .compressor(Compressor::ZLib)
///     .build();
///
/// assert_eq!(converter.name, "Dose-averaged LET");
/// ```
#[derive(Debug)]
pub struct GridToVtkBuilder {
    /// Name of the cell data array
    name: String,
    /// Title written into the file header
    title: String,
    /// Byte ordering as big or little endian
    byte_order: ByteOrder,
    /// Compression method for xml file formats
    compressor: Compressor,
}

impl GridToVtkBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [GridToVtk] type
    pub fn build(self) -> GridToVtk {
        GridToVtk {
            name: self.name,
            title: self.title,
            byte_order: self.byte_order,
            compressor: self.compressor,
        }
    }

    /// Name of the cell data array shown by plotting tools
    ///
    /// Visit is not fond of whitespace in array names, ParaView does not care.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Title written into the file header
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the byte ordering
    ///
    /// Visit only reads big endian, even though most systems are little
    /// endian. Defaults to big endian for convenience.
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Compression applied to `.vtr` output, ignored for legacy formats
    ///
    /// LZMA gives the smallest files for the mostly-empty grids typical of
    /// LET maps. `Compressor::None` is useful when debugging.
    pub fn compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = compressor;
        self
    }
}

impl Default for GridToVtkBuilder {
    fn default() -> Self {
        Self {
            name: "values".to_string(),
            title: "Voxel grid".to_string(),
            byte_order: ByteOrder::BigEndian,
            compressor: Compressor::LZMA,
        }
    }
}
