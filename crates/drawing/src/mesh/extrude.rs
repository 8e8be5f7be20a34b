use std::f32::consts::{FRAC_PI_2, SQRT_2};

use geo::TriangulateEarcut;

use crate::config::ExtrusionSettings;
use crate::mesh::{Material, Mesh, Shape};

/// One ring of the swept outline: its Z position and outward rim offset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layer {
    z: f32,
    offset: f32,
}

/// Z layers from back to front: back bevel, body steps, front bevel.
fn layer_plan(settings: &ExtrusionSettings) -> Vec<Layer> {
    let steps = settings.steps.max(1);
    let (segments, thickness, size, bevel_offset) = if settings.bevel_enabled {
        (
            settings.bevel_segments,
            settings.bevel_thickness,
            settings.bevel_size,
            settings.bevel_offset,
        )
    } else {
        (0, 0.0, 0.0, 0.0)
    };

    let bevel = |b: u32| {
        let t = b as f32 / segments as f32;
        (thickness * (t * FRAC_PI_2).cos(), size * (t * FRAC_PI_2).sin() + bevel_offset)
    };

    let mut layers = Vec::with_capacity((2 * segments + steps + 1) as usize);
    for b in 0..segments {
        let (z, offset) = bevel(b);
        layers.push(Layer { z: -z, offset });
    }
    for s in 0..=steps {
        layers.push(Layer {
            z: settings.depth / steps as f32 * s as f32,
            offset: size + bevel_offset,
        });
    }
    for b in (0..segments).rev() {
        let (z, offset) = bevel(b);
        layers.push(Layer {
            z: settings.depth + z,
            offset,
        });
    }
    layers
}

fn unit(v: [f32; 2]) -> Option<[f32; 2]> {
    let len = (v[0] * v[0] + v[1] * v[1]).sqrt();
    (len > f32::EPSILON).then(|| [v[0] / len, v[1] / len])
}

/// Outward normal of an edge direction on a counter-clockwise ring.
fn outward(d: [f32; 2]) -> [f32; 2] {
    [d[1], -d[0]]
}

/// Direction and length a ring vertex moves per unit of rim offset, so that
/// both adjacent edges shift by one unit. Sharp corners are capped at √2.
fn miter(prev: [f32; 2], cur: [f32; 2], next: [f32; 2]) -> [f32; 2] {
    let incoming = unit([cur[0] - prev[0], cur[1] - prev[1]]);
    let outgoing = unit([next[0] - cur[0], next[1] - cur[1]]);

    match (incoming, outgoing) {
        (None, None) => [0.0, 0.0],
        (Some(d), None) | (None, Some(d)) => outward(d),
        (Some(a), Some(b)) => {
            let (n1, n2) = (outward(a), outward(b));
            let sum = [n1[0] + n2[0], n1[1] + n2[1]];
            // the outline doubles back on itself: push the tip forward
            let Some(m) = unit(sum) else {
                return a;
            };
            let cos_half = m[0] * n1[0] + m[1] * n1[1];
            let scale = (1.0 / cos_half).min(SQRT_2);
            [m[0] * scale, m[1] * scale]
        }
    }
}

fn miters(ring: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let n = ring.len();
    (0..n)
        .map(|i| miter(ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]))
        .collect()
}

/// Sweep `shape` along +Z by `settings.depth`, bevel the rims if enabled,
/// close both ends with triangulated caps and centre the result on Z = 0.
pub fn extrude(shape: &Shape, settings: &ExtrusionSettings) -> Mesh {
    let triangulation = shape.to_polygon().earcut_triangles_raw();
    let mut ring: Vec<[f32; 2]> = triangulation
        .vertices
        .chunks_exact(2)
        .map(|c| [c[0], c[1]])
        .collect();
    // geo keeps the closing coordinate; every layer shares one start vertex
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    let n = ring.len();
    let directions = miters(&ring);
    let layers = layer_plan(settings);

    let mut mesh = Mesh {
        material: Material::default(),
        ..Default::default()
    };

    for layer in &layers {
        for (p, d) in ring.iter().zip(&directions) {
            mesh.vertices.push([
                p[0] + d[0] * layer.offset,
                p[1] + d[1] * layer.offset,
                layer.z,
            ]);
        }
    }

    // sides: one quad per ring edge between consecutive layers
    for l in 0..layers.len().saturating_sub(1) {
        let base = (l * n) as u32;
        let above = ((l + 1) * n) as u32;
        for i in 0..n {
            let j = (i + 1) % n;
            if ring[i] == ring[j] {
                continue;
            }
            let (i, j) = (i as u32, j as u32);
            mesh.faces.push([base + i, base + j, above + j]);
            mesh.faces.push([base + i, above + j, above + i]);
        }
    }

    // caps get their own vertices so their normals stay flat
    let cap_triangles: Vec<[u32; 3]> = triangulation
        .triangle_indices
        .chunks_exact(3)
        .filter_map(|t| {
            // indices into the closing coordinate wrap to the start
            let [a, b, c] = [t[0] % n, t[1] % n, t[2] % n];
            if a == b || b == c || a == c {
                return None;
            }
            let (pa, pb, pc) = (ring[a], ring[b], ring[c]);
            let cross = (pb[0] - pa[0]) * (pc[1] - pa[1]) - (pb[1] - pa[1]) * (pc[0] - pa[0]);
            Some(if cross < 0.0 {
                [a as u32, c as u32, b as u32]
            } else {
                [a as u32, b as u32, c as u32]
            })
        })
        .collect();

    let front_start = (layers.len() - 1) * n;

    let back_base = mesh.vertices.len() as u32;
    let back_ring: Vec<[f32; 3]> = mesh.vertices[..n].to_vec();
    mesh.vertices.extend(back_ring);
    for [a, b, c] in &cap_triangles {
        mesh.faces.push([back_base + a, back_base + c, back_base + b]);
    }

    let front_base = mesh.vertices.len() as u32;
    let front_ring: Vec<[f32; 3]> = mesh.vertices[front_start..front_start + n].to_vec();
    mesh.vertices.extend(front_ring);
    for [a, b, c] in &cap_triangles {
        mesh.faces.push([front_base + a, front_base + b, front_base + c]);
    }

    mesh.translate([0.0, 0.0, -settings.depth / 2.0]);
    mesh.compute_normals();

    tracing::debug!(
        ring = n,
        layers = layers.len(),
        cap_triangles = cap_triangles.len(),
        "extruded shape"
    );
    mesh
}
