pub mod extrude;
pub mod shape;

pub use extrude::extrude;
pub use shape::Shape;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::config::ExtrusionSettings;
use crate::types::TracedContours;

/// Fixed display material handed to viewers alongside the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub shininess: f32,
    pub opacity: f32,
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: 0x00ff88,
            shininess: 100.0,
            opacity: 0.9,
            transparent: true,
        }
    }
}

/// Indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    /// Counter-clockwise (outward facing) vertex index triples
    pub faces: Vec<[u32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub material: Material,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Unnormalized `(b - a) x (c - a)`; its length is twice the triangle area.
    fn face_cross(&self, face: [u32; 3]) -> [f32; 3] {
        let [a, b, c] = face.map(|i| self.vertices[i as usize]);
        let u = sub(b, a);
        let v = sub(c, a);
        cross(u, v)
    }

    /// Unit normal of face `index`, or zero for a degenerate triangle.
    pub fn face_normal(&self, index: usize) -> [f32; 3] {
        normalize(self.face_cross(self.faces[index]))
    }

    /// Recompute per-vertex normals as area-weighted averages of incident faces.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.vertices.len()];
        for &face in &self.faces {
            let n = self.face_cross(face);
            for i in face {
                let acc = &mut normals[i as usize];
                acc[0] += n[0];
                acc[1] += n[1];
                acc[2] += n[2];
            }
        }
        self.normals = normals.into_iter().map(normalize).collect();
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for k in 0..3 {
                min[k] = min[k].min(v[k]);
                max[k] = max[k].max(v[k]);
            }
            (min, max)
        }))
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: [f32; 3]) {
        for v in &mut self.vertices {
            v[0] += offset[0];
            v[1] += offset[1];
            v[2] += offset[2];
        }
    }
}

pub(crate) fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn cross(u: [f32; 3], v: [f32; 3]) -> [f32; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

pub(crate) fn normalize(n: [f32; 3]) -> [f32; 3] {
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > f32::EPSILON {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0; 3]
    }
}

/// Why a conversion produced no solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoModelReason {
    /// No contour survived noise filtering
    #[strum(to_string = "no contours found in the edge map")]
    EmptyContourSet,
    /// The dominant contour cannot form a polygon
    #[strum(to_string = "dominant contour has only {points} points")]
    DegenerateContour { points: usize },
}

/// Result of the mesh-building stage: a solid, or the reason there is none.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Generated(Mesh),
    NoModel(NoModelReason),
}

impl ModelOutcome {
    pub fn mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Generated(mesh) => Some(mesh),
            Self::NoModel(_) => None,
        }
    }

    pub fn into_mesh(self) -> Option<Mesh> {
        match self {
            Self::Generated(mesh) => Some(mesh),
            Self::NoModel(_) => None,
        }
    }

    pub fn reason(&self) -> Option<NoModelReason> {
        match self {
            Self::Generated(_) => None,
            Self::NoModel(reason) => Some(*reason),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Extrude the contour with the most points into a solid centred on Z = 0.
pub fn build_model(traced: &TracedContours, settings: &ExtrusionSettings) -> ModelOutcome {
    let Some(contour) = traced.dominant() else {
        tracing::warn!("no contours found for 3D model generation");
        return ModelOutcome::NoModel(NoModelReason::EmptyContourSet);
    };

    if contour.len() < Shape::MIN_POINTS {
        tracing::warn!(points = contour.len(), "main contour has too few points for a valid shape");
        return ModelOutcome::NoModel(NoModelReason::DegenerateContour {
            points: contour.len(),
        });
    }

    let shape = Shape::from_contour(contour, traced.image_width, traced.image_height);
    let mesh = extrude(&shape, settings);
    tracing::info!(
        contour_points = contour.len(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "generated 3D model"
    );
    ModelOutcome::Generated(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Contour, Point};

    fn traced(contours: Vec<Contour>) -> TracedContours {
        TracedContours {
            contours,
            image_width: 64,
            image_height: 64,
        }
    }

    fn square_contour(min: u32, max: u32) -> Contour {
        let mut points = Vec::new();
        for x in min..max {
            points.push(Point::new(x, min));
        }
        for y in min..max {
            points.push(Point::new(max, y));
        }
        for x in (min + 1..=max).rev() {
            points.push(Point::new(x, max));
        }
        for y in (min + 1..=max).rev() {
            points.push(Point::new(min, y));
        }
        Contour::new(points)
    }

    #[test]
    fn test_empty_contour_set_is_no_model() {
        let outcome = build_model(&traced(vec![]), &ExtrusionSettings::default());
        assert_eq!(outcome, ModelOutcome::NoModel(NoModelReason::EmptyContourSet));
        assert!(outcome.mesh().is_none());
    }

    #[test]
    fn test_two_point_contour_is_degenerate() {
        let contour = Contour::new(vec![Point::new(1, 1), Point::new(2, 2)]);
        let outcome = build_model(&traced(vec![contour]), &ExtrusionSettings::default());
        assert_eq!(
            outcome.reason(),
            Some(NoModelReason::DegenerateContour { points: 2 })
        );
        assert_eq!(
            NoModelReason::DegenerateContour { points: 2 }.to_string(),
            "dominant contour has only 2 points"
        );
    }

    #[test]
    fn test_largest_contour_is_extruded() {
        let small = square_contour(2, 6);
        let large = square_contour(12, 52);
        let outcome = build_model(
            &traced(vec![small, large]),
            &ExtrusionSettings::with_depth(50.0).without_bevel(),
        );
        let mesh = outcome.into_mesh().expect("square should extrude");
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min[0], -20.0);
        assert_eq!(max[0], 20.0);
        assert_eq!(min[1], -20.0);
        assert_eq!(max[1], 20.0);
        assert_eq!(min[2], -25.0);
        assert_eq!(max[2], 25.0);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert_eq!(mesh.material, Material::default());
    }

    #[test]
    fn test_mesh_helpers() {
        let mut mesh = Mesh {
            vertices: vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
            faces: vec![[0, 1, 2]],
            ..Default::default()
        };
        mesh.compute_normals();
        assert_eq!(mesh.face_normal(0), [0.0, 0.0, 1.0]);
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));

        mesh.translate([1.0, 1.0, -3.0]);
        assert_eq!(mesh.bounds(), Some(([1.0, 1.0, -3.0], [3.0, 3.0, -3.0])));
        assert_eq!(Mesh::default().bounds(), None);
    }
}
