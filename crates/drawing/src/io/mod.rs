pub mod geojson;
pub mod obj;
pub mod ply;
pub mod stl;

pub use obj::ObjExporter;
pub use ply::PlyExporter;
pub use stl::{StlAsciiExporter, StlBinaryExporter};

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::{error::Result, mesh::Mesh, traits::MeshExporter};

/// Mesh file formats the converter can write.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ExportFormat {
    /// Wavefront OBJ with per-vertex normals
    #[default]
    Obj,
    /// ASCII STL
    Stl,
    /// Binary STL
    StlBinary,
    /// ASCII PLY with per-vertex normals
    Ply,
}

impl ExportFormat {
    pub fn exporter(&self) -> Box<dyn MeshExporter> {
        match self {
            Self::Obj => Box::new(ObjExporter),
            Self::Stl => Box::new(StlAsciiExporter),
            Self::StlBinary => Box::new(StlBinaryExporter),
            Self::Ply => Box::new(PlyExporter),
        }
    }

    /// Guess the format from a file extension. `.stl` selects ASCII STL.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            "ply" => Some(Self::Ply),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        self.exporter().extension()
    }
}

impl Mesh {
    /// Encode the mesh into `writer` in the given format
    pub fn write_to(&self, format: ExportFormat, writer: &mut dyn Write) -> Result<()> {
        format.exporter().write_mesh(self, writer)
    }

    /// Encode the mesh into memory
    pub fn to_bytes(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(format, &mut bytes)?;
        Ok(bytes)
    }

    /// Save the mesh to a file
    pub fn save(&self, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(format, &mut writer)?;
        writer.flush()?;
        tracing::info!(path = %path.display(), %format, "saved mesh");
        Ok(())
    }
}
