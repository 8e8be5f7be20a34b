use std::io::Write;

use crate::{error::Result, mesh::Mesh, traits::MeshExporter};

/// Wavefront OBJ: `v`, `vn` and 1-based `f a//a b//b c//c` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjExporter;

impl MeshExporter for ObjExporter {
    fn write_mesh(&self, mesh: &Mesh, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "# {} vertices, {} faces", mesh.vertex_count(), mesh.face_count())?;
        writeln!(writer, "o drawing")?;
        for [x, y, z] in &mesh.vertices {
            writeln!(writer, "v {x} {y} {z}")?;
        }

        let with_normals = mesh.normals.len() == mesh.vertices.len();
        if with_normals {
            for [x, y, z] in &mesh.normals {
                writeln!(writer, "vn {x} {y} {z}")?;
            }
        }

        for face in &mesh.faces {
            let [a, b, c] = face.map(|i| i + 1);
            if with_normals {
                writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(writer, "f {a} {b} {c}")?;
            }
        }
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "obj"
    }
}
