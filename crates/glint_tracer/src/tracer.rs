//! Recursive ray tracing.
//!
//! A ray that hits a surface takes the surface color, blends in what lies
//! behind it when the surface is translucent, adds a mirror bounce when the
//! material is reflective, and is finally multiplied by the direct light at
//! the hit. Rays that escape, or that reach the depth limit, take the
//! environment color.

use std::sync::Arc;

use glint_core::{color, Color, Scene};
use glint_math::{reflect, Ray, Vec3};

use crate::config::RenderConfig;
use crate::intersect::{Hit, SceneIntersector};
use crate::lighting::LightingEngine;
use crate::material::{sample_color, MaterialResolver};
use crate::normal::smooth_normal;

/// Traces rays through one scene with fixed settings.
///
/// Lights and material tables are captured at construction; build a new
/// tracer for each frame. The tracer is `Sync`, so one instance serves
/// every render thread.
pub struct RayTracer<'a> {
    scene: &'a Scene,
    intersector: &'a dyn SceneIntersector,
    config: &'a RenderConfig,
    materials: Arc<MaterialResolver>,
    lighting: LightingEngine<'a>,
}

impl<'a> RayTracer<'a> {
    pub fn new(scene: &'a Scene, intersector: &'a dyn SceneIntersector, config: &'a RenderConfig) -> Self {
        let materials = Arc::new(MaterialResolver::new(scene, config.single_material_only));
        let lighting = LightingEngine::new(scene, intersector, materials.clone(), config.collision_mask);

        log::debug!(
            "Tracer ready: {} objects, {} lights, max depth {}",
            scene.object_count(),
            lighting.lights().len(),
            config.max_depth
        );

        Self {
            scene,
            intersector,
            config,
            materials,
            lighting,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// Color seen along `ray`. `depth` counts the bounces taken so far;
    /// camera rays start at 0. The result is always opaque.
    pub fn trace(&self, ray: &Ray, depth: u32) -> Color {
        if depth >= self.config.max_depth {
            return self.environment(ray.direction);
        }

        match self
            .intersector
            .nearest_hit(ray, self.config.far_distance, self.config.collision_mask)
        {
            Some(hit) => self.shade(ray, &hit, depth),
            None => self.environment(ray.direction),
        }
    }

    fn shade(&self, ray: &Ray, hit: &Hit, depth: u32) -> Color {
        let Some((id, object)) = hit
            .object
            .and_then(|id| self.scene.object(id).map(|object| (id, object)))
        else {
            log::debug!("Hit at {:?} has no owning object", hit.point);
            return self.config.error_color;
        };

        let material = self.materials.resolve(id, object, hit.triangle_index);
        let surface = sample_color(material, hit.uv);
        let alpha = surface.w;
        let mut result = surface;

        if alpha < 1.0 {
            let behind = Ray::new(hit.point - hit.normal * self.config.transparency_offset, ray.direction);
            result = surface * alpha + (1.0 - alpha) * self.trace(&behind, depth + 1);
        }

        if material.reflective {
            let mirrored = Ray::new(
                hit.point + hit.normal * self.config.surface_offset,
                reflect(ray.direction, hit.normal),
            );
            result += alpha * material.shininess * self.trace(&mirrored, depth + 1);
        }

        if self.config.use_lighting {
            let normal = if self.config.smooth_edges {
                smooth_normal(hit, &object.mesh)
            } else {
                hit.normal
            };
            let light = self
                .lighting
                .illuminate(hit.point + hit.normal * self.config.surface_offset, normal);
            result *= light;
        }

        color::with_alpha(result, 1.0)
    }

    /// Color for a ray that leaves the scene.
    ///
    /// Environment samples are pushed toward white by a tenth of their
    /// missing alpha.
    fn environment(&self, direction: Vec3) -> Color {
        match &self.scene.environment {
            Some(environment) => {
                let sample = environment.sample(direction);
                let filled = sample + color::WHITE * ((1.0 - sample.w) / 10.0);
                color::with_alpha(filled, 1.0)
            }
            None => color::with_alpha(self.config.fallback_color, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::BvhIntersector;
    use crate::testing::{quad_object, ScriptedIntersector};
    use glint_core::{ConstantEnvironment, Light, Material, Mesh, SceneObject, Transform};
    use glint_math::{Quat, Vec4};

    fn assert_color_eq(a: Color, b: Color, tolerance: f32) {
        assert!((a - b).abs().max_element() < tolerance, "{a:?} != {b:?}");
    }

    fn unlit() -> RenderConfig {
        RenderConfig {
            use_lighting: false,
            ..Default::default()
        }
    }

    fn camera_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z)
    }

    #[test]
    fn test_depth_limit_returns_environment_without_query() {
        let scene = Scene::new("empty");
        let intersector = ScriptedIntersector::new(vec![]);
        let config = RenderConfig::default();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        assert_eq!(tracer.trace(&camera_ray(), config.max_depth), color::BLUE);
        assert_eq!(tracer.trace(&camera_ray(), config.max_depth + 3), color::BLUE);
        assert_eq!(intersector.queries(), 0);
    }

    #[test]
    fn test_miss_without_environment_is_fallback() {
        let scene = Scene::new("empty");
        let intersector = ScriptedIntersector::new(vec![]);
        let config = RenderConfig::default();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        assert_eq!(tracer.trace(&camera_ray(), 0), config.fallback_color);
        assert_eq!(intersector.queries(), 1);
    }

    #[test]
    fn test_environment_fill() {
        let sky = Vec4::new(0.2, 0.4, 0.6, 0.5);
        let scene = Scene::new("sky").with_environment(Arc::new(ConstantEnvironment::new(sky)));
        let intersector = ScriptedIntersector::new(vec![]);
        let config = RenderConfig::default();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        assert_color_eq(tracer.trace(&camera_ray(), 0), Vec4::new(0.25, 0.45, 0.65, 1.0), 1e-6);
    }

    #[test]
    fn test_ownerless_hit_is_error_color() {
        let scene = Scene::new("broken");
        let mut hit = ScriptedIntersector::hit_on(glint_core::ObjectId(3), 1.0);
        hit.object = None;
        let intersector = ScriptedIntersector::new(vec![hit]);
        let config = RenderConfig::default();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        assert_eq!(tracer.trace(&camera_ray(), 0), color::RED);

        // An id the scene does not know is just as broken
        let stale =
            ScriptedIntersector::new(vec![ScriptedIntersector::hit_on(glint_core::ObjectId(3), 1.0)]);
        let tracer = RayTracer::new(&scene, &stale, &config);
        assert_eq!(tracer.trace(&camera_ray(), 0), color::RED);
    }

    #[test]
    fn test_opaque_surface_unlit() {
        let mut scene = Scene::new("flat");
        let id = scene.add_object(quad_object(Material::new("green", color::rgb(0.1, 0.7, 0.2))));
        let intersector = ScriptedIntersector::new(vec![ScriptedIntersector::hit_on(id, 2.0)]);
        let config = unlit();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        assert_eq!(tracer.trace(&camera_ray(), 0), color::rgb(0.1, 0.7, 0.2));
        assert_eq!(intersector.queries(), 1);
    }

    #[test]
    fn test_transparency_blend() {
        let mut scene = Scene::new("glass");
        let glass = Vec4::new(0.8, 0.2, 0.4, 0.25);
        let behind = color::rgb(0.1, 0.5, 0.9);
        let front = scene.add_object(quad_object(Material::new("glass", glass)));
        let back = scene.add_object(quad_object(Material::new("back", behind)));
        let intersector = ScriptedIntersector::new(vec![
            ScriptedIntersector::hit_on(front, 1.0),
            ScriptedIntersector::hit_on(back, 2.0),
        ]);
        let config = unlit();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        let expected = color::with_alpha(glass * 0.25 + behind * 0.75, 1.0);
        assert_color_eq(tracer.trace(&camera_ray(), 0), expected, 1e-6);

        // The ray behind the surface continues in the same direction from
        // just past the hit point
        let rays = intersector.rays();
        assert_eq!(rays.len(), 2);
        assert_eq!(rays[1].direction, rays[0].direction);
        assert!((rays[1].origin.z - (-1.0 - config.transparency_offset)).abs() < 1e-6);
    }

    #[test]
    fn test_transparent_at_depth_limit_blends_environment() {
        let mut scene = Scene::new("glass");
        let glass = Vec4::new(1.0, 1.0, 1.0, 0.5);
        let front = scene.add_object(quad_object(Material::new("glass", glass)));
        let intersector = ScriptedIntersector::new(vec![ScriptedIntersector::hit_on(front, 1.0)]);
        let config = RenderConfig {
            max_depth: 1,
            ..unlit()
        };
        let tracer = RayTracer::new(&scene, &intersector, &config);

        let expected = color::with_alpha(glass * 0.5 + color::BLUE * 0.5, 1.0);
        assert_color_eq(tracer.trace(&camera_ray(), 0), expected, 1e-6);
        assert_eq!(intersector.queries(), 1);
    }

    #[test]
    fn test_reflection_only_when_flagged() {
        let mut scene = Scene::new("mirror");
        let mirror = scene.add_object(quad_object(
            Material::new("mirror", color::grey(0.2)).with_reflection(0.5),
        ));
        let matte = scene.add_object(quad_object(Material::new("matte", color::grey(0.2))));
        let target = scene.add_object(quad_object(Material::new("target", color::RED)));
        let config = unlit();

        let reflecting = ScriptedIntersector::new(vec![
            ScriptedIntersector::hit_on(mirror, 1.0),
            ScriptedIntersector::hit_on(target, 1.0),
        ]);
        let tracer = RayTracer::new(&scene, &reflecting, &config);
        let expected = color::with_alpha(color::grey(0.2) + 0.5 * color::RED, 1.0);
        assert_color_eq(tracer.trace(&camera_ray(), 0), expected, 1e-6);

        // Mirror ray leaves along the reflected direction
        let rays = reflecting.rays();
        assert!((rays[1].direction - Vec3::Z).length() < 1e-6);

        // A matte surface never looks at what a mirror would see
        let non_reflecting = ScriptedIntersector::new(vec![
            ScriptedIntersector::hit_on(matte, 1.0),
            ScriptedIntersector::hit_on(target, 1.0),
        ]);
        let tracer = RayTracer::new(&scene, &non_reflecting, &config);
        assert_eq!(tracer.trace(&camera_ray(), 0), color::grey(0.2));
        assert_eq!(non_reflecting.queries(), 1);
    }

    #[test]
    fn test_reflection_scaled_by_alpha() {
        let mut scene = Scene::new("tinted mirror");
        let tint = Vec4::new(0.0, 0.0, 0.0, 0.5);
        let mirror =
            scene.add_object(quad_object(Material::new("mirror", tint).with_reflection(1.0)));
        let intersector = ScriptedIntersector::new(vec![ScriptedIntersector::hit_on(mirror, 1.0)]);
        let config = RenderConfig {
            max_depth: 1,
            ..unlit()
        };
        let tracer = RayTracer::new(&scene, &intersector, &config);

        // Transparency and reflection both reach the depth limit
        let blended = tint * 0.5 + color::BLUE * 0.5;
        let expected = color::with_alpha(blended + 0.5 * color::BLUE, 1.0);
        assert_color_eq(tracer.trace(&camera_ray(), 0), expected, 1e-6);
    }

    #[test]
    fn test_lighting_multiplies_surface() {
        let mut scene = Scene::new("lit").with_ambient(color::grey(0.1));
        let id = scene.add_object(quad_object(Material::new("white", color::rgb(1.0, 0.5, 0.25))));
        scene.add_light(Light::directional(0.5).facing(-Vec3::Z));
        let intersector = ScriptedIntersector::new(vec![ScriptedIntersector::hit_on(id, 1.0)]);
        let config = RenderConfig::default();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        let expected = color::rgb(1.0, 0.5, 0.25) * 0.6;
        assert_color_eq(tracer.trace(&camera_ray(), 0), color::with_alpha(expected, 1.0), 1e-5);
    }

    #[test]
    fn test_single_material_only() {
        let mut scene = Scene::new("cube");
        let cube = SceneObject::new(
            "cube",
            Arc::new(Mesh::cube(1.0)),
            vec![
                Arc::new(Material::new("x", color::RED)),
                Arc::new(Material::new("y", color::rgb(0.0, 1.0, 0.0))),
                Arc::new(Material::new("z", color::BLUE)),
            ],
        );
        let id = scene.add_object(cube);

        // Triangle 10 is one of the Z faces
        let mut hit = ScriptedIntersector::hit_on(id, 1.0);
        hit.triangle_index = 10;

        let config = unlit();
        let intersector = ScriptedIntersector::new(vec![hit]);
        let tracer = RayTracer::new(&scene, &intersector, &config);
        assert_eq!(tracer.trace(&camera_ray(), 0), color::BLUE);

        let single = RenderConfig {
            single_material_only: true,
            ..unlit()
        };
        let intersector = ScriptedIntersector::new(vec![hit]);
        let tracer = RayTracer::new(&scene, &intersector, &single);
        assert_eq!(tracer.trace(&camera_ray(), 0), color::RED);
    }

    #[test]
    fn test_lit_quad_end_to_end() {
        let flat = color::rgb(0.6, 0.3, 0.9);
        let mut scene = Scene::new("quad");
        let floor = SceneObject::new(
            "floor",
            Arc::new(Mesh::quad(10.0)),
            vec![Arc::new(Material::new("floor", flat))],
        )
        .with_transform(
            Transform::default().with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        );
        scene.add_object(floor);
        scene.add_light(Light::directional(0.75).facing(-Vec3::Y));
        let intersector = BvhIntersector::build(&scene);
        let config = RenderConfig::default();
        let tracer = RayTracer::new(&scene, &intersector, &config);

        let ray = Ray::new(Vec3::new(0.5, 3.0, 0.5), -Vec3::Y);
        let expected = color::with_alpha(flat * 0.75, 1.0);
        assert_color_eq(tracer.trace(&ray, 0), expected, 1e-3);

        // Above and looking away from the quad
        let up = Ray::new(Vec3::new(0.5, 3.0, 0.5), Vec3::Y);
        assert_eq!(tracer.trace(&up, 0), config.fallback_color);
    }

    #[test]
    fn test_smooth_edges_off_uses_flat_normal() {
        let mut scene = Scene::new("bent");
        // Vertex normals tilted 60 degrees away from the face normal
        let tilted = Vec3::new(0.0, 3f32.sqrt() / 2.0, 0.5);
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
            Some(vec![tilted; 3]),
        );
        let white = Arc::new(Material::new("white", color::WHITE));
        let id = scene.add_object(SceneObject::new("bent", Arc::new(mesh), vec![white]));
        scene.add_light(Light::directional(1.0).facing(-Vec3::Z));

        let mut hit = ScriptedIntersector::hit_on(id, 1.0);
        hit.point = Vec3::new(0.0, -0.5, 0.0);

        let flat_config = RenderConfig {
            smooth_edges: false,
            ..Default::default()
        };
        let intersector = ScriptedIntersector::new(vec![hit]);
        let tracer = RayTracer::new(&scene, &intersector, &flat_config);
        assert_color_eq(tracer.trace(&camera_ray(), 0), color::WHITE, 1e-5);

        let smooth_config = RenderConfig::default();
        let intersector = ScriptedIntersector::new(vec![hit]);
        let tracer = RayTracer::new(&scene, &intersector, &smooth_config);
        let third = 1.0 - 60.0 / 90.0;
        assert_color_eq(tracer.trace(&camera_ray(), 0), color::grey(third), 1e-3);
    }
}
