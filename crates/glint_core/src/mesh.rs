//! Triangle mesh geometry with submesh partitions.
//!
//! A mesh owns its vertex data and one or more submeshes. Each submesh is an
//! ordered list of triangle vertex indices, and its position in the submesh
//! list matches the owning object's material list. The flattened `indices`
//! array is the concatenation of every submesh, so triangle `i` of the mesh is
//! `indices[3i..3i + 3]`.

use glint_math::{Aabb, Vec2, Vec3};

use crate::scene::SceneError;

/// A mesh consisting of vertex positions, normals, UVs and submeshes.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - see `ensure_normals`)
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates (optional - one per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// All triangles, submesh by submesh
    indices: Vec<u32>,

    /// Triangle index lists, one per material slot
    submeshes: Vec<Vec<u32>>,

    /// Local-space bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a single-submesh mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self::with_submeshes(positions, normals, None, vec![indices])
    }

    /// Create a mesh from several submeshes.
    ///
    /// The flattened index list is built by concatenating the submeshes in
    /// order.
    pub fn with_submeshes(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
        submeshes: Vec<Vec<u32>>,
    ) -> Self {
        let bounds = Aabb::from_point_cloud(&positions);
        let indices = submeshes.concat();
        Self {
            positions,
            normals,
            uvs,
            indices,
            submeshes,
            bounds,
        }
    }

    /// Attach per-vertex UV coordinates.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// A square of side `size` in the XY plane, centred on the origin and
    /// facing +Z, with UVs spanning [0, 1].
    pub fn quad(size: f32) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ];
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        Self::new(positions, vec![0, 1, 2, 0, 2, 3], Some(vec![Vec3::Z; 4])).with_uvs(uvs)
    }

    /// An axis-aligned cube of side `size` centred on the origin.
    ///
    /// Faces are split into three submeshes: the X faces, the Y faces and the
    /// Z faces.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut submeshes = vec![Vec::new(); 3];

        let faces = [
            (Vec3::X, Vec3::Y, 0),
            (-Vec3::X, Vec3::Y, 0),
            (Vec3::Y, Vec3::Z, 1),
            (-Vec3::Y, Vec3::Z, 1),
            (Vec3::Z, Vec3::X, 2),
            (-Vec3::Z, Vec3::X, 2),
        ];

        for (normal, u, submesh) in faces {
            // u x v == normal keeps the winding counter-clockwise from outside
            let v = normal.cross(u);
            let center = normal * h;
            let base = positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                positions.push(center + u * (su * h) + v * (sv * h));
                normals.push(normal);
                uvs.push(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
            }
            submeshes[submesh].extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::with_submeshes(positions, Some(normals), Some(uvs), submeshes)
    }

    /// Compute smooth vertex normals by averaging area-weighted face normals.
    ///
    /// Faces are counter-clockwise when seen from the side the normal
    /// points to.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has one normal per vertex, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    /// Check the mesh for inconsistent index and attribute arrays.
    pub fn validate(&self) -> Result<(), SceneError> {
        let vertex_count = self.positions.len();

        for (submesh, indices) in self.submeshes.iter().enumerate() {
            if indices.len() % 3 != 0 {
                return Err(SceneError::InvalidMesh(format!(
                    "submesh {} has {} indices, not a multiple of 3",
                    submesh,
                    indices.len()
                )));
            }
            if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(SceneError::InvalidMesh(format!(
                    "submesh {} references vertex {} but the mesh has {} vertices",
                    submesh, bad, vertex_count
                )));
            }
        }

        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count {
                return Err(SceneError::InvalidMesh(format!(
                    "{} normals for {} vertices",
                    normals.len(),
                    vertex_count
                )));
            }
        }

        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertex_count {
                return Err(SceneError::InvalidMesh(format!(
                    "{} uvs for {} vertices",
                    uvs.len(),
                    vertex_count
                )));
            }
        }

        Ok(())
    }

    /// Vertex indices of triangle `triangle_index`, in winding order.
    pub fn triangle(&self, triangle_index: usize) -> Option<[u32; 3]> {
        let start = triangle_index.checked_mul(3)?;
        match self.indices.get(start..start.checked_add(3)?) {
            Some(&[a, b, c]) => Some([a, b, c]),
            _ => None,
        }
    }

    /// The flattened triangle index list.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Triangle indices of one submesh.
    pub fn submesh(&self, index: usize) -> Option<&[u32]> {
        self.submeshes.get(index).map(Vec::as_slice)
    }

    /// Number of submeshes.
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex normal, or `None` when the mesh has no normals.
    pub fn normal(&self, vertex: u32) -> Option<Vec3> {
        self.normals.as_ref()?.get(vertex as usize).copied()
    }

    /// Vertex UV, zero when the mesh has none.
    pub fn uv(&self, vertex: u32) -> Vec2 {
        self.uvs
            .as_ref()
            .and_then(|uvs| uvs.get(vertex as usize).copied())
            .unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_positions() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new(triangle_positions(), vec![0, 1, 2], None);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.submesh_count(), 1);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn test_submeshes_are_concatenated() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let mesh = Mesh::with_submeshes(positions, None, None, vec![vec![0, 1, 2], vec![1, 3, 2]]);

        assert_eq!(mesh.indices(), &[0, 1, 2, 1, 3, 2]);
        assert_eq!(mesh.triangle(0), Some([0, 1, 2]));
        assert_eq!(mesh.triangle(1), Some([1, 3, 2]));
        assert_eq!(mesh.triangle(2), None);
        assert_eq!(mesh.submesh(1), Some(&[1, 3, 2][..]));
    }

    #[test]
    fn test_compute_normals_ccw() {
        // Counter-clockwise seen from +Z
        let mut mesh = Mesh::new(triangle_positions(), vec![0, 1, 2], None);
        mesh.compute_normals();

        for normal in mesh.normals.as_ref().unwrap() {
            assert!((*normal - Vec3::Z).length() < 0.001);
        }
    }

    #[test]
    fn test_ensure_normals_replaces_mismatched() {
        let mut mesh = Mesh::new(triangle_positions(), vec![0, 1, 2], Some(vec![Vec3::X]));
        mesh.ensure_normals();
        assert_eq!(mesh.normals.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_validate() {
        assert!(Mesh::new(triangle_positions(), vec![0, 1, 2], None).validate().is_ok());
        assert!(Mesh::new(triangle_positions(), vec![0, 1], None).validate().is_err());
        assert!(Mesh::new(triangle_positions(), vec![0, 1, 3], None).validate().is_err());
        assert!(Mesh::new(triangle_positions(), vec![0, 1, 2], Some(vec![Vec3::Z]))
            .validate()
            .is_err());
    }

    #[test]
    fn test_quad() {
        let quad = Mesh::quad(2.0);
        assert!(quad.validate().is_ok());
        assert_eq!(quad.triangle_count(), 2);
        assert_eq!(quad.uv(2), Vec2::ONE);

        // Winding agrees with the stored normals
        let mut recomputed = quad.clone();
        recomputed.compute_normals();
        for normal in recomputed.normals.unwrap() {
            assert!((normal - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn test_cube() {
        let cube = Mesh::cube(2.0);
        assert!(cube.validate().is_ok());
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.submesh_count(), 3);
        assert!((cube.bounds.max.x - 1.0).abs() < 1e-6);

        let mut recomputed = cube.clone();
        recomputed.compute_normals();
        for (a, b) in recomputed.normals.unwrap().iter().zip(cube.normals.as_ref().unwrap()) {
            assert!((*a - *b).length() < 1e-5);
        }
    }
}
