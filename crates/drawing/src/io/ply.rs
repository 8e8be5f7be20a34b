use std::io::Write;

use crate::{error::Result, mesh::Mesh, traits::MeshExporter};

/// ASCII PLY with position and normal per vertex
#[derive(Debug, Clone, Copy, Default)]
pub struct PlyExporter;

impl MeshExporter for PlyExporter {
    fn write_mesh(&self, mesh: &Mesh, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "ply")?;
        writeln!(writer, "format ascii 1.0")?;
        writeln!(writer, "element vertex {}", mesh.vertex_count())?;
        for property in ["x", "y", "z", "nx", "ny", "nz"] {
            writeln!(writer, "property float {property}")?;
        }
        writeln!(writer, "element face {}", mesh.face_count())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
        writeln!(writer, "end_header")?;

        for (index, [x, y, z]) in mesh.vertices.iter().enumerate() {
            let [nx, ny, nz] = mesh.normals.get(index).copied().unwrap_or([0.0; 3]);
            writeln!(writer, "{x} {y} {z} {nx} {ny} {nz}")?;
        }
        for [a, b, c] in &mesh.faces {
            writeln!(writer, "3 {a} {b} {c}")?;
        }
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "ply"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::fixtures::tetrahedron;

    #[test]
    fn test_ply_header_and_body() {
        let mut out = Vec::new();
        PlyExporter.write_mesh(&tetrahedron(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let (header, body) = text.split_once("end_header\n").unwrap();
        assert!(header.starts_with("ply\nformat ascii 1.0\n"));
        assert!(header.contains("element vertex 4\n"));
        assert!(header.contains("element face 4\n"));

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].split_whitespace().count(), 6);
        assert_eq!(lines[4], "3 0 2 1");
    }
}
