use std::io::Write;

use crate::{error::Result, mesh::Mesh, traits::MeshExporter};

const SOLID_NAME: &str = "drawing";

/// ASCII STL with per-face normals
#[derive(Debug, Clone, Copy, Default)]
pub struct StlAsciiExporter;

/// Binary STL: 80-byte header, little-endian triangle count, 50-byte records
#[derive(Debug, Clone, Copy, Default)]
pub struct StlBinaryExporter;

impl MeshExporter for StlAsciiExporter {
    fn write_mesh(&self, mesh: &Mesh, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "solid {SOLID_NAME}")?;
        for (index, face) in mesh.faces.iter().enumerate() {
            let [nx, ny, nz] = mesh.face_normal(index);
            writeln!(writer, "  facet normal {nx:e} {ny:e} {nz:e}")?;
            writeln!(writer, "    outer loop")?;
            for i in face {
                let [x, y, z] = mesh.vertices[*i as usize];
                writeln!(writer, "      vertex {x:e} {y:e} {z:e}")?;
            }
            writeln!(writer, "    endloop")?;
            writeln!(writer, "  endfacet")?;
        }
        writeln!(writer, "endsolid {SOLID_NAME}")?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "stl"
    }
}

impl MeshExporter for StlBinaryExporter {
    fn write_mesh(&self, mesh: &Mesh, writer: &mut dyn Write) -> Result<()> {
        let mut header = [0u8; 80];
        let label = b"binary STL written by drawing";
        header[..label.len()].copy_from_slice(label);
        writer.write_all(&header)?;
        writer.write_all(&(mesh.face_count() as u32).to_le_bytes())?;

        for (index, face) in mesh.faces.iter().enumerate() {
            let normal = mesh.face_normal(index);
            let corners = face.map(|i| mesh.vertices[i as usize]);
            for value in normal.iter().chain(corners.iter().flatten()) {
                writer.write_all(&value.to_le_bytes())?;
            }
            writer.write_all(&0u16.to_le_bytes())?;
        }
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "stl"
    }
}
