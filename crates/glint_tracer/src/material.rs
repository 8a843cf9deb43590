//! Material lookup for hit triangles.
//!
//! An object's material list lines up with its mesh's submeshes, so finding
//! the material for a hit means finding which submesh owns the hit triangle.
//! `submesh_index_by_scan` does this by walking every submesh;
//! `SubmeshTable` answers the same question from a precomputed map and is
//! what the tracer uses.

use std::collections::HashMap;

use glint_core::{Color, Material, Mesh, ObjectId, Scene, SceneObject};
use glint_math::Vec2;

/// Index of the first submesh containing the triangle's exact vertex index
/// triple. Falls back to 0 when no submesh contains it.
pub fn submesh_index_by_scan(mesh: &Mesh, triangle_index: usize) -> usize {
    let Some(triangle) = mesh.triangle(triangle_index) else {
        return 0;
    };

    (0..mesh.submesh_count())
        .find(|&submesh| {
            mesh.submesh(submesh)
                .unwrap_or_default()
                .chunks_exact(3)
                .any(|candidate| candidate == &triangle[..])
        })
        .unwrap_or(0)
}

/// Material slot that shades a triangle.
///
/// Single-submesh meshes and `single_material_only` always use slot 0.
pub fn resolve_material_index(mesh: &Mesh, triangle_index: usize, single_material_only: bool) -> usize {
    if single_material_only || mesh.submesh_count() <= 1 {
        return 0;
    }
    submesh_index_by_scan(mesh, triangle_index)
}

/// Material that shades a triangle of `object`.
pub fn resolve_material(object: &SceneObject, triangle_index: usize, single_material_only: bool) -> &Material {
    object.material(resolve_material_index(
        &object.mesh,
        triangle_index,
        single_material_only,
    ))
}

/// Surface color at a texture coordinate: the bilinear texture sample when
/// the material has a texture, its flat color otherwise.
pub fn sample_color(material: &Material, uv: Vec2) -> Color {
    match &material.texture {
        Some(texture) => texture.sample_bilinear(uv.x, uv.y),
        None => material.color,
    }
}

/// Precomputed triangle-to-submesh map for one mesh.
#[derive(Debug, Clone, Default)]
pub struct SubmeshTable {
    lookup: HashMap<[u32; 3], usize>,
}

impl SubmeshTable {
    /// Map every vertex triple to the first submesh that contains it.
    pub fn build(mesh: &Mesh) -> Self {
        let mut lookup = HashMap::with_capacity(mesh.triangle_count());
        for submesh in 0..mesh.submesh_count() {
            let indices = mesh.submesh(submesh).unwrap_or_default();
            for triangle in indices.chunks_exact(3) {
                lookup
                    .entry([triangle[0], triangle[1], triangle[2]])
                    .or_insert(submesh);
            }
        }
        Self { lookup }
    }

    /// Submesh of a triangle, or 0 when it cannot be found.
    pub fn submesh_of(&self, mesh: &Mesh, triangle_index: usize) -> usize {
        mesh.triangle(triangle_index)
            .and_then(|triangle| self.lookup.get(&triangle).copied())
            .unwrap_or(0)
    }
}

/// Per-frame material lookup over a whole scene.
///
/// Builds a `SubmeshTable` for every object whose mesh has more than one
/// submesh. Objects are identified by `ObjectId`, so the resolver must be
/// used with the scene it was built from.
#[derive(Debug, Clone)]
pub struct MaterialResolver {
    tables: Vec<Option<SubmeshTable>>,
    single_material_only: bool,
}

impl MaterialResolver {
    pub fn new(scene: &Scene, single_material_only: bool) -> Self {
        let tables = if single_material_only {
            Vec::new()
        } else {
            scene
                .objects()
                .map(|(_, object)| {
                    (object.mesh.submesh_count() > 1).then(|| SubmeshTable::build(&object.mesh))
                })
                .collect()
        };

        Self {
            tables,
            single_material_only,
        }
    }

    /// Material slot for a triangle of the object with id `id`.
    pub fn material_index(&self, id: ObjectId, object: &SceneObject, triangle_index: usize) -> usize {
        if self.single_material_only {
            return 0;
        }
        match self.tables.get(id.0) {
            Some(Some(table)) => table.submesh_of(&object.mesh, triangle_index),
            Some(None) => 0,
            // Object added after the resolver was built
            None => resolve_material_index(&object.mesh, triangle_index, false),
        }
    }

    /// Material for a triangle of the object with id `id`.
    pub fn resolve<'s>(&self, id: ObjectId, object: &'s SceneObject, triangle_index: usize) -> &'s Material {
        object.material(self.material_index(id, object, triangle_index))
    }
}
