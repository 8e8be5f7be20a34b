use std::io::Write;

use crate::{error::Result, mesh::Mesh};

/// Trait for mesh file encoders
pub trait MeshExporter: Send + Sync {
    /// Encode `mesh` into `writer`
    fn write_mesh(&self, mesh: &Mesh, writer: &mut dyn Write) -> Result<()>;

    /// File extension without the leading dot
    fn extension(&self) -> &'static str;
}
