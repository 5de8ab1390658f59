use glam::Vec3;
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Geometry module provides the generated primitives the scenes are built
/// from: a subdivided icosahedron projected onto a sphere, and a flat
/// position buffer of points distributed in an annulus around the origin.

/// Indexed triangle mesh with per-vertex normals
#[derive(Debug, Clone)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Creates an icosahedron subdivided `detail` times, with every vertex
/// projected onto a sphere of the given radius. Normals point radially.
pub fn icosphere(radius: f32, detail: u32) -> MeshData {
    // Base icosahedron from three orthogonal golden-ratio rectangles
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|p| Vec3::from_array(*p).normalize())
    .collect();

    let mut indices: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..detail {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut next = Vec::with_capacity(indices.len() * 4);

        for [a, b, c] in indices {
            let ab = midpoint(&mut positions, &mut midpoints, a, b);
            let bc = midpoint(&mut positions, &mut midpoints, b, c);
            let ca = midpoint(&mut positions, &mut midpoints, c, a);

            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }

        indices = next;
    }

    let normals: Vec<[f32; 3]> = positions.iter().map(|p| p.to_array()).collect();
    let positions: Vec<[f32; 3]> = positions.iter().map(|p| (*p * radius).to_array()).collect();

    MeshData {
        positions,
        normals,
        indices: indices.into_iter().flatten().collect(),
    }
}

fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }

    let mid = ((positions[a as usize] + positions[b as usize]) * 0.5).normalize();
    let index = positions.len() as u32;
    positions.push(mid);
    cache.insert(key, index);
    index
}

/// Fills a flat xyz position buffer with `count` points distributed in an
/// annulus around the Y axis: radius uniform in [inner, outer), angle
/// uniform in [0, 2π), height uniform in [-half_height, half_height).
///
/// The returned buffer length is always 3 × count.
pub fn annulus_positions(
    count: usize,
    inner: f32,
    outer: f32,
    half_height: f32,
    rng: &mut impl Rng,
) -> Vec<f32> {
    let mut positions = Vec::with_capacity(count * 3);

    for _ in 0..count {
        let radius = rng.gen_range(inner..outer);
        let theta = rng.gen_range(0.0..TAU);
        let height = rng.gen_range(-half_height..half_height);

        positions.push(theta.cos() * radius);
        positions.push(height);
        positions.push(theta.sin() * radius);
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn icosphere_detail_one_has_expected_counts() {
        let mesh = icosphere(1.7, 1);

        // 12 base vertices + 30 edge midpoints; 20 faces split into 4
        assert_eq!(mesh.vertex_count(), 42);
        assert_eq!(mesh.index_count(), 80 * 3);
    }

    #[test]
    fn icosphere_vertices_lie_on_sphere() {
        let mesh = icosphere(1.7, 1);

        for p in &mesh.positions {
            let len = Vec3::from_array(*p).length();
            assert!(
                (len - 1.7).abs() < 1e-4,
                "vertex should sit on the sphere, |v| = {}",
                len
            );
        }
    }

    #[test]
    fn icosphere_normals_are_unit_radial() {
        let mesh = icosphere(3.0, 1);

        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let n = Vec3::from_array(*n);
            assert!((n.length() - 1.0).abs() < 1e-4);

            let radial = Vec3::from_array(*p).normalize();
            assert!(n.dot(radial) > 0.999);
        }
    }

    #[test]
    fn icosphere_indices_in_range() {
        let mesh = icosphere(1.0, 2);
        let count = mesh.vertex_count() as u32;

        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn annulus_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let positions = annulus_positions(500, 1.0, 5.0, 1.0, &mut rng);

        assert_eq!(positions.len(), 1500);

        for chunk in positions.chunks_exact(3) {
            let radius = (chunk[0] * chunk[0] + chunk[2] * chunk[2]).sqrt();
            assert!(
                (1.0 - 1e-4..5.0).contains(&radius),
                "radius out of bounds: {}",
                radius
            );
            assert!((-1.0..1.0).contains(&chunk[1]), "height out of bounds");
        }
    }

    #[test]
    fn annulus_buffer_length_is_three_per_point() {
        let mut rng = StdRng::seed_from_u64(0);
        for count in [0, 1, 16, 1600] {
            let positions = annulus_positions(count, 1.0, 5.0, 1.0, &mut rng);
            assert_eq!(positions.len(), count * 3);
        }
    }
}
