use glam::Vec3;

use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Half-line in world space. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Nearest intersection reported by [`raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub distance: f32,
    pub point: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance along the ray to the first sphere surface crossing.
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let near = -b - sq;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + sq;
        (far >= 0.0).then_some(far)
    }
}

/// Intersect `ray` against the bounding spheres of `targets`; nearest hit wins.
///
/// Inactive entities, entities without a mesh, and ids missing from the scene
/// are skipped. An empty target list is simply a miss.
pub fn raycast(ray: &Ray, scene: &Scene, targets: &[EntityId]) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;
    for &id in targets {
        let Some(entity) = scene.get(id) else { continue };
        if !entity.active {
            continue;
        }
        let Some(radius) = entity.mesh.as_ref().and_then(|m| m.bounding_radius()) else {
            continue;
        };
        let world_radius = radius * entity.scale.max_element();
        if let Some(t) = ray.intersect_sphere(entity.pos, world_radius) {
            if best.map_or(true, |b| t < b.distance) {
                best = Some(RayHit { entity: id, distance: t, point: ray.at(t) });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use crate::components::mesh::MeshComponent;

    fn sphere(id: u32, pos: Vec3, radius: f32) -> Entity {
        Entity::new(EntityId(id)).with_pos(pos).with_mesh(MeshComponent::sphere(radius))
    }

    #[test]
    fn sphere_hit_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 2.0);
        assert_eq!(t, Some(8.0));
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert_eq!(ray.intersect_sphere(Vec3::ZERO, 2.0), None);
    }

    #[test]
    fn nearest_target_wins() {
        let mut scene = Scene::new();
        scene.spawn(sphere(1, Vec3::new(0.0, 0.0, -50.0), 5.0));
        scene.spawn(sphere(2, Vec3::new(0.0, 0.0, -20.0), 5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = raycast(&ray, &scene, &[EntityId(1), EntityId(2)]);
        assert_eq!(hit.map(|h| h.entity), Some(EntityId(2)));
        assert!((hit.map(|h| h.distance).unwrap_or(0.0) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn only_listed_targets_are_tested() {
        let mut scene = Scene::new();
        scene.spawn(sphere(1, Vec3::new(0.0, 0.0, -20.0), 5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(raycast(&ray, &scene, &[]).is_none());
        assert!(raycast(&ray, &scene, &[EntityId(9)]).is_none());
    }

    #[test]
    fn world_scale_grows_the_target() {
        let mut scene = Scene::new();
        scene.spawn(sphere(1, Vec3::new(4.0, 0.0, -20.0), 1.0).with_scale(Vec3::splat(5.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(raycast(&ray, &scene, &[EntityId(1)]).is_some());
    }
}
